use voxdens_core::{Aabb, Frame};

/// Counts the particles of `frame` inside the closed box `bounds`.
///
/// Unlike the binner, points on the upper faces are counted.
pub fn count_in_box(frame: &Frame, bounds: &Aabb) -> usize {
    frame
        .positions()
        .iter()
        .filter(|p| bounds.contains(p))
        .count()
}
