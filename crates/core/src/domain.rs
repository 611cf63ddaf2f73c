use crate::{Aabb, DomainError};

/// The simulated cube `[0, side_length)^3`. All three axes share one side length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationDomain {
    side_length: f64,
}

impl SimulationDomain {
    pub fn new(side_length: f64) -> Result<Self, DomainError> {
        if !side_length.is_finite() || side_length <= 0.0 {
            return Err(DomainError::InvalidSideLength(side_length));
        }
        Ok(Self { side_length })
    }

    pub fn side_length(&self) -> f64 {
        self.side_length
    }

    /// Half-open membership test: the upper face is outside the domain.
    pub fn contains(&self, point: &[f64; 3]) -> bool {
        point
            .iter()
            .all(|&c| c >= 0.0 && c < self.side_length)
    }

    /// The closed box used by the bound-check tally.
    pub fn closed_bounds(&self) -> Aabb {
        Aabb::cube(self.side_length)
    }
}
