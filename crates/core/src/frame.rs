use crate::Aabb;

/// Particle positions of one simulation timestep, in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    positions: Vec<[f64; 3]>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_positions(positions: Vec<[f64; 3]>) -> Self {
        Self { positions }
    }

    /// Builds a frame from flattened `x, y, z, x, y, z, ...` coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` is not a multiple of 3.
    pub fn from_interleaved(data: &[f64]) -> Self {
        assert_eq!(
            data.len() % 3,
            0,
            "interleaved xyz input must have a multiple of 3 values"
        );

        Self {
            positions: data.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, i: usize) -> [f64; 3] {
        self.positions[i]
    }

    pub fn positions(&self) -> &[[f64; 3]] {
        &self.positions
    }

    pub fn iter_positions(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        self.positions.iter().copied()
    }

    /// Bounding box of the finite positions.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_positions(&self.positions)
    }

    pub fn to_interleaved(&self) -> Vec<f64> {
        self.positions.iter().flat_map(|p| p.iter().copied()).collect()
    }
}
