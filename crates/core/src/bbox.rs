/// Inclusive axis-aligned box over particle positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Aabb {
    pub min: [f64; 3],
    pub max: [f64; 3],
    empty: bool,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
            empty: true,
        }
    }

    /// The closed cube `[0, side]^3`.
    pub fn cube(side: f64) -> Self {
        Self {
            min: [0.0; 3],
            max: [side; 3],
            empty: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn expand_with_point(&mut self, point: [f64; 3]) {
        if !point.iter().all(|v| v.is_finite()) {
            return;
        }

        if self.empty {
            self.min = point;
            self.max = point;
            self.empty = false;
            return;
        }

        for (axis, &val) in point.iter().enumerate() {
            self.min[axis] = self.min[axis].min(val);
            self.max[axis] = self.max[axis].max(val);
        }
    }

    /// Grows `self` to cover `other`. Used to accumulate the extent of a run
    /// across frames; merging an empty box is a no-op.
    pub fn merge(&mut self, other: &Aabb) {
        if other.empty {
            return;
        }
        self.expand_with_point(other.min);
        self.expand_with_point(other.max);
    }

    /// Closed-interval membership on every axis, the test behind frame tallies.
    /// Non-finite points are never contained.
    pub fn contains(&self, point: &[f64; 3]) -> bool {
        if self.empty || !point.iter().all(|v| v.is_finite()) {
            return false;
        }

        (0..3).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
    }

    pub fn from_positions(positions: &[[f64; 3]]) -> Self {
        let mut aabb = Self::empty();
        for &p in positions {
            aabb.expand_with_point(p);
        }
        aabb
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
