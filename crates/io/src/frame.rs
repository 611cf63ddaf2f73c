use crate::{ParseError, ReadError};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;
use voxdens_core::Frame;

/// Parses one line of comma-separated `x,y,z,...` coordinates.
///
/// Every token must be a finite number. A blank line is a single empty token
/// and is rejected like any other short record.
pub fn parse_frame(line: &str) -> Result<Frame, ParseError> {
    let tokens: Vec<&str> = line.split(',').collect();
    if tokens.len() % 3 != 0 {
        return Err(ParseError::TokenCount {
            found: tokens.len(),
        });
    }

    let mut coords = Vec::with_capacity(tokens.len());
    for (index, token) in tokens.iter().enumerate() {
        let value = token
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ParseError::InvalidNumber {
                index,
                token: token.to_string(),
            })?;
        coords.push(value);
    }

    Ok(Frame::from_interleaved(&coords))
}

/// Iterates the frames of a position stream, one per line.
///
/// Each item carries the 1-indexed line number it came from.
pub struct FrameReader<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for FrameReader<R> {
    type Item = Result<(usize, Frame), ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.lines.next()?;
        self.line += 1;
        let line = self.line;
        let text = match next {
            Ok(text) => text,
            Err(e) => return Some(Err(ReadError::from_line_error(e, line))),
        };
        Some(
            parse_frame(&text)
                .map(|frame| (line, frame))
                .map_err(|source| ReadError::Malformed { line, source }),
        )
    }
}

/// Opens a position file for buffered frame-by-frame reading.
pub fn open_frames(path: impl AsRef<Path>) -> io::Result<FrameReader<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(FrameReader::new(BufReader::new(file)))
}
