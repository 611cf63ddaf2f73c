use crate::{Aabb, DomainError, SimulationDomain};

/// Integer coordinates of one voxel, each axis in `[0, resolution)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoxelIndex {
    pub ix: usize,
    pub iy: usize,
    pub iz: usize,
}

impl VoxelIndex {
    pub fn new(ix: usize, iy: usize, iz: usize) -> Self {
        Self { ix, iy, iz }
    }
}

/// Uniform voxel partition of a [`SimulationDomain`].
///
/// Built once per run and shared read-only by every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    domain: SimulationDomain,
    resolution: usize,
    voxel_count: usize,
}

impl Grid {
    pub fn new(domain: SimulationDomain, resolution: usize) -> Result<Self, DomainError> {
        if resolution == 0 {
            return Err(DomainError::ZeroResolution);
        }
        let voxel_count = resolution
            .checked_pow(3)
            .ok_or(DomainError::ResolutionTooLarge(resolution))?;
        Ok(Self {
            domain,
            resolution,
            voxel_count,
        })
    }

    /// Shorthand for `Grid::new(SimulationDomain::new(side_length)?, resolution)`.
    pub fn cube(side_length: f64, resolution: usize) -> Result<Self, DomainError> {
        Self::new(SimulationDomain::new(side_length)?, resolution)
    }

    pub fn domain(&self) -> &SimulationDomain {
        &self.domain
    }

    pub fn side_length(&self) -> f64 {
        self.domain.side_length()
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn voxel_size(&self) -> f64 {
        self.domain.side_length() / self.resolution as f64
    }

    /// Total number of voxels, `resolution^3`.
    pub fn voxel_count(&self) -> usize {
        self.voxel_count
    }

    /// Voxel index along one axis, `floor((coord / side_length) * resolution)`.
    ///
    /// Returns `None` when the index falls outside `[0, resolution)`. NaN and
    /// infinite coordinates always land outside.
    pub fn axis_index(&self, coord: f64) -> Option<usize> {
        let idx = ((coord / self.domain.side_length()) * self.resolution as f64).floor();
        if idx >= 0.0 && idx < self.resolution as f64 {
            Some(idx as usize)
        } else {
            None
        }
    }

    /// Classifies a position into its voxel, or `None` if it lies outside the
    /// domain on any axis.
    pub fn classify(&self, position: [f64; 3]) -> Option<VoxelIndex> {
        Some(VoxelIndex {
            ix: self.axis_index(position[0])?,
            iy: self.axis_index(position[1])?,
            iz: self.axis_index(position[2])?,
        })
    }

    /// Row-major offset with x varying slowest and z fastest.
    pub fn flat_index(&self, voxel: VoxelIndex) -> usize {
        assert!(
            voxel.ix < self.resolution && voxel.iy < self.resolution && voxel.iz < self.resolution,
            "voxel index out of bounds"
        );
        flat_index(self.resolution, voxel)
    }

    pub fn voxel_at(&self, flat: usize) -> VoxelIndex {
        assert!(flat < self.voxel_count, "flat index out of bounds");
        voxel_at(self.resolution, flat)
    }

    /// Closed bounds of a voxel in domain coordinates.
    pub fn voxel_bounds(&self, voxel: VoxelIndex) -> Aabb {
        let size = self.voxel_size();
        let min = [
            voxel.ix as f64 * size,
            voxel.iy as f64 * size,
            voxel.iz as f64 * size,
        ];
        let mut aabb = Aabb::empty();
        aabb.expand_with_point(min);
        aabb.expand_with_point([min[0] + size, min[1] + size, min[2] + size]);
        aabb
    }

    pub fn voxel_center(&self, voxel: VoxelIndex) -> [f64; 3] {
        let size = self.voxel_size();
        [
            (voxel.ix as f64 + 0.5) * size,
            (voxel.iy as f64 + 0.5) * size,
            (voxel.iz as f64 + 0.5) * size,
        ]
    }

    /// Every voxel in serialization order.
    pub fn voxels(&self) -> impl Iterator<Item = VoxelIndex> + '_ {
        (0..self.voxel_count).map(move |flat| voxel_at(self.resolution, flat))
    }
}

pub(crate) fn flat_index(resolution: usize, voxel: VoxelIndex) -> usize {
    (voxel.ix * resolution + voxel.iy) * resolution + voxel.iz
}

pub(crate) fn voxel_at(resolution: usize, flat: usize) -> VoxelIndex {
    VoxelIndex {
        ix: flat / (resolution * resolution),
        iy: (flat / resolution) % resolution,
        iz: flat % resolution,
    }
}
