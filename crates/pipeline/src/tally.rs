use crate::DensityError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;
use voxdens_core::{Aabb, SimulationDomain};
use voxdens_filters::count_in_box;
use voxdens_io::{parse_frame, ReadError};

/// In-box particle count for one frame of a position stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TallyReport {
    /// 1-indexed frame (line) number.
    pub frame: usize,
    pub particles: usize,
    pub in_bounds: usize,
}

/// Counts the particles of frame `frame` (1-indexed) that lie inside the closed box `bounds`.
///
/// Only the requested line is parsed; lines before it are skipped unread.
pub fn tally_stream<R: BufRead>(
    input: R,
    frame: usize,
    bounds: &Aabb,
) -> Result<TallyReport, DensityError> {
    let mut available = 0;
    for text in input.lines() {
        available += 1;
        let text = match text {
            Ok(text) => text,
            Err(e) => match ReadError::from_line_error(e, available) {
                ReadError::Malformed { .. } if available != frame => continue,
                err => return Err(DensityError::from_frame_read(err)),
            },
        };
        if available != frame {
            continue;
        }

        let parsed = parse_frame(&text)
            .map_err(|source| DensityError::MalformedFrame { line: frame, source })?;
        let report = TallyReport {
            frame,
            particles: parsed.len(),
            in_bounds: count_in_box(&parsed, bounds),
        };
        info!(
            frame,
            particles = report.particles,
            in_bounds = report.in_bounds,
            "frame tallied"
        );
        return Ok(report);
    }

    Err(DensityError::FrameNotFound { frame, available })
}

/// Tallies frame `frame` of the file at `path` against the closed cube `[0, side_length]^3`.
pub fn tally_file(
    path: impl AsRef<Path>,
    frame: usize,
    side_length: f64,
) -> Result<TallyReport, DensityError> {
    let path = path.as_ref();
    let bounds = SimulationDomain::new(side_length)?.closed_bounds();
    let reader = File::open(path)
        .map(BufReader::new)
        .map_err(|e| DensityError::file(path, e))?;
    tally_stream(reader, frame, &bounds).map_err(|e| e.with_paths(path, None))
}
