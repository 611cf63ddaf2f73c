use crate::{BinnerConfig, DensityError};
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};
use voxdens_core::{Aabb, Grid};
use voxdens_filters::bin_frame;
use voxdens_io::{format_histogram, parse_frame, write_histogram, FrameReader, ReadError};

/// Totals for one binning run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunSummary {
    /// Frames read and written.
    pub frames: usize,
    /// Particles parsed across all frames.
    pub particles: u64,
    /// Particles that landed in a voxel.
    pub binned: u64,
    /// Bounding box of every finite position seen, in or out of the domain.
    pub extent: Aabb,
}

impl RunSummary {
    pub fn discarded(&self) -> u64 {
        self.particles - self.binned
    }

    fn record(&mut self, particles: usize, binned: u64, extent: &Aabb) {
        self.frames += 1;
        self.particles += particles as u64;
        self.binned += binned;
        self.extent.merge(extent);
    }
}

/// Reads position frames from `input` and writes one histogram line per frame to `output`.
///
/// Output is flushed after every frame. On a malformed frame the run stops with
/// [`DensityError::MalformedFrame`]; lines already written stay in `output`.
pub fn bin_stream<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    grid: &Grid,
) -> Result<RunSummary, DensityError> {
    log_start(grid, false);
    let mut summary = RunSummary::default();

    for item in FrameReader::new(input) {
        let (line, frame) = item.map_err(DensityError::from_frame_read)?;
        let hist = bin_frame(&frame, grid);
        write_histogram(&mut output, &hist).map_err(DensityError::Write)?;
        output.flush().map_err(DensityError::Write)?;

        let binned = hist.total();
        debug!(
            line,
            particles = frame.len(),
            binned,
            discarded = frame.len() as u64 - binned,
            "frame binned"
        );
        summary.record(frame.len(), binned, &frame.aabb());
    }

    log_finish(&summary, grid);
    Ok(summary)
}

struct BinnedLine {
    line: usize,
    particles: usize,
    binned: u64,
    extent: Aabb,
    text: String,
}

/// Same contract and byte-identical output as [`bin_stream`], with frames binned
/// in batches of `batch_size` on the rayon pool.
///
/// Each batch is written in input order after it has been binned. A malformed
/// frame stops the run after the frames preceding it have been written and flushed.
pub fn bin_stream_parallel<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    grid: &Grid,
    batch_size: usize,
) -> Result<RunSummary, DensityError> {
    if batch_size == 0 {
        return Err(DensityError::InvalidBatchSize);
    }
    log_start(grid, true);

    let mut lines = input.lines();
    let mut line_no = 0usize;
    let mut summary = RunSummary::default();

    loop {
        let mut batch = Vec::with_capacity(batch_size);
        let mut read_err: Option<io::Error> = None;
        for text in lines.by_ref().take(batch_size) {
            line_no += 1;
            match text {
                Ok(text) => batch.push((line_no, Ok(text))),
                Err(e) => match ReadError::from_line_error(e, line_no) {
                    ReadError::Malformed { line, source } => batch.push((line, Err(source))),
                    ReadError::Io(e) => {
                        read_err = Some(e);
                        break;
                    }
                },
            }
        }
        if batch.is_empty() && read_err.is_none() {
            break;
        }

        let results: Vec<Result<BinnedLine, DensityError>> = batch
            .par_iter()
            .map(|(line, text)| -> Result<BinnedLine, DensityError> {
                let frame = text
                    .as_ref()
                    .map_err(|e| e.clone())
                    .and_then(|text| parse_frame(text))
                    .map_err(|source| DensityError::MalformedFrame {
                        line: *line,
                        source,
                    })?;
                let hist = bin_frame(&frame, grid);
                let mut text = format_histogram(&hist);
                text.push('\n');
                Ok(BinnedLine {
                    line: *line,
                    particles: frame.len(),
                    binned: hist.total(),
                    extent: frame.aabb(),
                    text,
                })
            })
            .collect();

        for result in results {
            let binned = match result {
                Ok(binned) => binned,
                Err(e) => {
                    output.flush().map_err(DensityError::Write)?;
                    return Err(e);
                }
            };
            output
                .write_all(binned.text.as_bytes())
                .map_err(DensityError::Write)?;
            debug!(
                line = binned.line,
                particles = binned.particles,
                binned = binned.binned,
                "frame binned"
            );
            summary.record(binned.particles, binned.binned, &binned.extent);
        }
        output.flush().map_err(DensityError::Write)?;

        if let Some(e) = read_err {
            return Err(DensityError::Read(e));
        }
    }

    log_finish(&summary, grid);
    Ok(summary)
}

/// Bins the position file at `input` into a density file at `output`.
///
/// The output file is created or truncated. I/O errors carry the offending path.
pub fn bin_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &BinnerConfig,
) -> Result<RunSummary, DensityError> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let grid = config.grid()?;

    let reader = File::open(input)
        .map(BufReader::new)
        .map_err(|e| DensityError::file(input, e))?;
    let writer = File::create(output)
        .map(BufWriter::new)
        .map_err(|e| DensityError::file(output, e))?;
    info!(input = %input.display(), output = %output.display(), "opened files");

    let result = if config.parallel {
        bin_stream_parallel(reader, writer, &grid, config.batch_size)
    } else {
        bin_stream(reader, writer, &grid)
    };
    result.map_err(|e| e.with_paths(input, Some(output)))
}

fn log_start(grid: &Grid, parallel: bool) {
    info!(
        side_length = grid.side_length(),
        resolution = grid.resolution(),
        voxels = grid.voxel_count(),
        parallel,
        "binning frames"
    );
}

fn log_finish(summary: &RunSummary, grid: &Grid) {
    info!(
        frames = summary.frames,
        particles = summary.particles,
        binned = summary.binned,
        discarded = summary.discarded(),
        "binning finished"
    );
    if summary.particles > 0 && summary.binned == 0 {
        warn!(
            side_length = grid.side_length(),
            extent_min = ?summary.extent.min,
            extent_max = ?summary.extent.max,
            "every particle fell outside the domain; check domain_side_length"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;
    use tempfile::tempdir;
    use voxdens_io::ParseError;

    fn grid() -> Grid {
        Grid::cube(100.0, 10).unwrap()
    }

    fn run(input: &str) -> (Result<RunSummary, DensityError>, String) {
        let mut out = Vec::new();
        let result = bin_stream(Cursor::new(input), &mut out, &grid());
        (result, String::from_utf8(out).unwrap())
    }

    fn run_parallel(input: &str, batch: usize) -> (Result<RunSummary, DensityError>, String) {
        let mut out = Vec::new();
        let result = bin_stream_parallel(Cursor::new(input), &mut out, &grid(), batch);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn reference_scenario_line() {
        let (result, out) = run("5,5,5,95,95,95,150,50,50\n");
        let summary = result.unwrap();
        assert_eq!(summary.frames, 1);
        assert_eq!(summary.particles, 3);
        assert_eq!(summary.binned, 2);
        assert_eq!(summary.discarded(), 1);

        assert!(out.ends_with('\n'));
        let values: Vec<u64> = out
            .trim_end_matches('\n')
            .split(',')
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(values.len(), 1000);
        assert_eq!(values[0], 1);
        assert_eq!(values[999], 1);
        assert_eq!(values.iter().sum::<u64>(), 2);
    }

    #[test]
    fn one_output_line_per_input_line() {
        let (result, out) = run("1,1,1\n150,150,150\n2,2,2,3,3,3\n");
        assert_eq!(result.unwrap().frames, 3);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].split(',').all(|v| v == "0"));
        assert!(lines.iter().all(|l| l.split(',').count() == 1000));
    }

    #[test]
    fn blank_line_is_malformed_frame() {
        for batch in [None, Some(1), Some(8)] {
            let input = "1,1,1\n\n2,2,2\n";
            let (result, out) = match batch {
                None => run(input),
                Some(b) => run_parallel(input, b),
            };
            assert!(
                matches!(
                    result,
                    Err(DensityError::MalformedFrame {
                        line: 2,
                        source: ParseError::TokenCount { found: 1 }
                    })
                ),
                "batch {:?}",
                batch
            );
            assert_eq!(out.lines().count(), 1);
        }
    }

    #[test]
    fn non_finite_coordinate_is_malformed_frame() {
        for input in ["1,1,1\nnan,1,1\n", "1,1,1\n1,inf,1\n", "1,1,1\n1,1,1e400\n"] {
            let (result, out) = run(input);
            assert!(
                matches!(
                    result,
                    Err(DensityError::MalformedFrame {
                        line: 2,
                        source: ParseError::InvalidNumber { .. }
                    })
                ),
                "input {:?}",
                input
            );
            assert_eq!(out.lines().count(), 1);
        }
    }

    #[test]
    fn invalid_utf8_is_malformed_frame() {
        let input = b"1,1,1\n2,\xfe,2\n3,3,3\n".to_vec();
        let mut seq_out = Vec::new();
        let seq = bin_stream(Cursor::new(input.clone()), &mut seq_out, &grid());
        let mut par_out = Vec::new();
        let par = bin_stream_parallel(Cursor::new(input), &mut par_out, &grid(), 4);
        for result in [seq, par] {
            assert!(matches!(
                result,
                Err(DensityError::MalformedFrame {
                    line: 2,
                    source: ParseError::InvalidUtf8
                })
            ));
        }
        assert_eq!(seq_out, par_out);
        assert_eq!(String::from_utf8(seq_out).unwrap().lines().count(), 1);
    }

    #[test]
    fn malformed_frame_keeps_prefix() {
        let (result, out) = run("1,1,1\n1,2\n3,3,3\n");
        let err = result.unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(matches!(err, DensityError::MalformedFrame { line: 2, .. }));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn empty_input_writes_nothing() {
        let (result, out) = run("");
        assert_eq!(result.unwrap().frames, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn parallel_matches_sequential() {
        let input: String = (0..37)
            .map(|i| {
                let c = (i * 7 % 120) as f64 - 10.0;
                format!("{c},{},{},{},{},{}\n", c / 2.0, 99.5, -c, 0.0, c + 0.25)
            })
            .collect();
        let (seq, seq_out) = run(&input);
        for batch in [1, 4, 37, 100] {
            let (par, par_out) = run_parallel(&input, batch);
            assert_eq!(par_out, seq_out, "batch size {}", batch);
            assert_eq!(par.unwrap(), seq.as_ref().unwrap().clone());
        }
    }

    #[test]
    fn parallel_malformed_frame_keeps_prefix() {
        let input = "1,1,1\n2,2,2\n3,3\n4,4,4\n5,5,5\n";
        let (result, out) = run_parallel(input, 4);
        assert!(matches!(
            result.unwrap_err(),
            DensityError::MalformedFrame { line: 3, .. }
        ));
        assert_eq!(out.lines().count(), 2);
    }

    /// Records how much had been written at each flush.
    #[derive(Default)]
    struct FlushLog {
        buf: Vec<u8>,
        flushed_at: Vec<usize>,
    }

    impl Write for FlushLog {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushed_at.push(self.buf.len());
            Ok(())
        }
    }

    #[test]
    fn parallel_flushes_prefix_before_malformed_frame() {
        let mut out = FlushLog::default();
        let result = bin_stream_parallel(
            Cursor::new("1,1,1\n2,2,2\n3,3\n4,4,4\n"),
            &mut out,
            &grid(),
            8,
        );
        assert!(matches!(
            result,
            Err(DensityError::MalformedFrame { line: 3, .. })
        ));
        assert_eq!(String::from_utf8_lossy(&out.buf).lines().count(), 2);
        assert_eq!(out.flushed_at.last(), Some(&out.buf.len()));
    }

    #[test]
    fn sequential_flushes_every_frame() {
        let mut out = FlushLog::default();
        bin_stream(Cursor::new("1,1,1\n2,2,2\n"), &mut out, &grid()).unwrap();
        assert_eq!(out.flushed_at.len(), 2);
        assert_eq!(out.flushed_at.last(), Some(&out.buf.len()));
    }

    #[test]
    fn parallel_rejects_zero_batch() {
        let (result, _) = run_parallel("1,1,1\n", 0);
        assert!(matches!(result, Err(DensityError::InvalidBatchSize)));
    }

    #[test]
    fn all_discarded_run_still_writes_lines() {
        let (result, out) = run("500,500,500\n-1,-1,-1\n");
        let summary = result.unwrap();
        assert_eq!(summary.binned, 0);
        assert_eq!(summary.extent.min, [-1.0, -1.0, -1.0]);
        assert_eq!(summary.extent.max, [500.0, 500.0, 500.0]);
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn bin_file_roundtrip() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("results.txt");
        let output = dir.path().join("densities_result.txt");
        std::fs::write(&input, "0,0,0\n99,99,99,50,50,50\n").unwrap();

        let cfg = BinnerConfig {
            grid_resolution: 2,
            ..BinnerConfig::default()
        };
        let summary = bin_file(&input, &output, &cfg).unwrap();
        assert_eq!(summary.frames, 2);
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, "1,0,0,0,0,0,0,0\n0,0,0,0,0,0,0,2\n");
    }

    #[test]
    fn bin_file_missing_input_reports_path() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("missing.txt");
        let output = dir.path().join("out.txt");
        match bin_file(&input, &output, &BinnerConfig::default()) {
            Err(DensityError::File { path, .. }) => assert_eq!(path, input),
            other => panic!("expected file error, got {:?}", other),
        }
    }

    #[test]
    fn bin_file_rejects_bad_grid_before_touching_files() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.txt");
        let cfg = BinnerConfig {
            grid_resolution: 0,
            ..BinnerConfig::default()
        };
        assert!(matches!(
            bin_file(dir.path().join("in.txt"), &output, &cfg),
            Err(DensityError::Domain(_))
        ));
        assert!(!output.exists());
    }

    proptest! {
        #[test]
        fn parallel_equals_sequential_for_any_batch(
            frames in prop::collection::vec(
                prop::collection::vec(
                    (-20.0f64..120.0, -20.0f64..120.0, -20.0f64..120.0),
                    1..30
                ),
                0..20
            ),
            batch in 1usize..8,
        ) {
            let input: String = frames
                .iter()
                .map(|f| {
                    let mut line = f
                        .iter()
                        .map(|p| format!("{},{},{}", p.0, p.1, p.2))
                        .collect::<Vec<_>>()
                        .join(",");
                    line.push('\n');
                    line
                })
                .collect();

            let (seq, seq_out) = run(&input);
            let (par, par_out) = run_parallel(&input, batch);
            prop_assert_eq!(seq_out.lines().count(), frames.len());
            prop_assert_eq!(&seq_out, &par_out);
            prop_assert_eq!(seq.unwrap(), par.unwrap());
        }
    }
}
