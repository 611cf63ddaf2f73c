use crate::grid::{flat_index, voxel_at};
use crate::{Grid, VoxelIndex};

/// Dense per-voxel particle counts for one frame.
///
/// Cells are stored flat, x-major then y then z, which is also the order the
/// counts are serialized in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensityHistogram {
    resolution: usize,
    counts: Vec<u64>,
}

impl DensityHistogram {
    /// An all-zero histogram covering every voxel of `grid`.
    pub fn for_grid(grid: &Grid) -> Self {
        Self {
            resolution: grid.resolution(),
            counts: vec![0; grid.voxel_count()],
        }
    }

    /// Wraps existing counts. Returns `None` unless `counts.len() == resolution^3`.
    pub fn from_counts(resolution: usize, counts: Vec<u64>) -> Option<Self> {
        let expected = resolution.checked_pow(3)?;
        if resolution == 0 || counts.len() != expected {
            return None;
        }
        Some(Self { resolution, counts })
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Number of cells, `resolution^3`.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn increment(&mut self, voxel: VoxelIndex) {
        let i = self.index_of(voxel);
        self.counts[i] += 1;
    }

    pub fn get(&self, voxel: VoxelIndex) -> u64 {
        self.counts[self.index_of(voxel)]
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Sum over all cells.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Largest single-cell count, 0 for an empty frame.
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn occupied_voxels(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// `(voxel, count)` pairs in serialization order.
    pub fn iter_voxels(&self) -> impl Iterator<Item = (VoxelIndex, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(move |(flat, &c)| (voxel_at(self.resolution, flat), c))
    }

    fn index_of(&self, voxel: VoxelIndex) -> usize {
        assert!(
            voxel.ix < self.resolution && voxel.iy < self.resolution && voxel.iz < self.resolution,
            "voxel index out of bounds for histogram"
        );
        flat_index(self.resolution, voxel)
    }
}
