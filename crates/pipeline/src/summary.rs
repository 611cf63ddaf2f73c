use crate::DensityError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;
use voxdens_core::VoxelIndex;
use voxdens_io::DensityReader;

/// The single busiest voxel of a density file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakVoxel {
    /// 1-indexed frame (line) number.
    pub frame: usize,
    pub voxel: VoxelIndex,
    pub count: u64,
}

/// Statistics over a whole density file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DensitySummary {
    pub frames: usize,
    /// Largest per-voxel count over all frames. Renderers divide by this to
    /// normalize voxel intensity.
    pub max_region_density: u64,
    /// First voxel to reach `max_region_density`, if any voxel is non-zero.
    pub peak: Option<PeakVoxel>,
    /// Binned particle count per frame, in file order.
    pub frame_totals: Vec<u64>,
}

impl DensitySummary {
    /// `count / max_region_density` in `[0, 1]`; 0 when every voxel is empty.
    pub fn normalized(&self, count: u64) -> f64 {
        if self.max_region_density == 0 {
            return 0.0;
        }
        (count as f64 / self.max_region_density as f64).min(1.0)
    }
}

/// Reads a density stream of the given resolution and collects [`DensitySummary`] statistics.
pub fn summarize_densities<R: BufRead>(
    input: R,
    resolution: usize,
) -> Result<DensitySummary, DensityError> {
    let mut summary = DensitySummary::default();

    for item in DensityReader::new(input, resolution) {
        let (line, hist) = item.map_err(DensityError::from_density_read)?;
        summary.frames += 1;
        summary.frame_totals.push(hist.total());

        let max = hist.max_count();
        if max > summary.max_region_density {
            summary.max_region_density = max;
            summary.peak = hist
                .iter_voxels()
                .find(|&(_, c)| c == max)
                .map(|(voxel, count)| PeakVoxel {
                    frame: line,
                    voxel,
                    count,
                });
        }
    }

    info!(
        frames = summary.frames,
        max_region_density = summary.max_region_density,
        "densities summarized"
    );
    Ok(summary)
}

pub fn summarize_file(
    path: impl AsRef<Path>,
    resolution: usize,
) -> Result<DensitySummary, DensityError> {
    let path = path.as_ref();
    let reader = File::open(path)
        .map(BufReader::new)
        .map_err(|e| DensityError::file(path, e))?;
    summarize_densities(reader, resolution).map_err(|e| e.with_paths(path, None))
}
