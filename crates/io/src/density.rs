use crate::{ParseError, ReadError};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines, Write};
use std::path::Path;
use voxdens_core::DensityHistogram;

/// Renders a histogram as one comma-separated line, without the newline.
pub fn format_histogram(hist: &DensityHistogram) -> String {
    // Most cells are small counts; 2 bytes each is a good first guess.
    let mut out = String::with_capacity(hist.len() * 2);
    for (i, count) in hist.counts().iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        // Writing to a String cannot fail.
        let _ = write!(out, "{}", count);
    }
    out
}

/// Writes a histogram as one newline-terminated line.
pub fn write_histogram<W: Write>(writer: &mut W, hist: &DensityHistogram) -> io::Result<()> {
    let mut line = format_histogram(hist);
    line.push('\n');
    writer.write_all(line.as_bytes())
}

/// Parses one line of a density file back into a histogram of the given resolution.
pub fn parse_density_line(line: &str, resolution: usize) -> Result<DensityHistogram, ParseError> {
    let expected = resolution.saturating_pow(3);
    let mut counts = Vec::with_capacity(expected.min(1 << 20));
    for (index, token) in line.split(',').enumerate() {
        let count = token
            .trim()
            .parse::<u64>()
            .map_err(|_| ParseError::InvalidCount {
                index,
                token: token.to_string(),
            })?;
        counts.push(count);
    }

    let found = counts.len();
    DensityHistogram::from_counts(resolution, counts)
        .ok_or(ParseError::VoxelCount { expected, found })
}

/// Iterates the histograms of a density file, one per line.
pub struct DensityReader<R> {
    lines: Lines<R>,
    resolution: usize,
    line: usize,
}

impl<R: BufRead> DensityReader<R> {
    pub fn new(reader: R, resolution: usize) -> Self {
        Self {
            lines: reader.lines(),
            resolution,
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for DensityReader<R> {
    type Item = Result<(usize, DensityHistogram), ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.lines.next()?;
        self.line += 1;
        let line = self.line;
        let text = match next {
            Ok(text) => text,
            Err(e) => return Some(Err(ReadError::from_line_error(e, line))),
        };
        Some(
            parse_density_line(&text, self.resolution)
                .map(|hist| (line, hist))
                .map_err(|source| ReadError::Malformed { line, source }),
        )
    }
}

pub fn open_densities(
    path: impl AsRef<Path>,
    resolution: usize,
) -> io::Result<DensityReader<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(DensityReader::new(BufReader::new(file), resolution))
}
