/// Rejected domain or grid parameters.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// The side length is zero, negative, NaN or infinite.
    #[error("domain side length must be positive and finite, got {0}")]
    InvalidSideLength(f64),

    #[error("grid resolution must be at least 1")]
    ZeroResolution,

    /// `resolution^3` does not fit in `usize`.
    #[error("grid resolution {0} is too large: resolution^3 overflows")]
    ResolutionTooLarge(usize),
}
