#![forbid(unsafe_code)]
//! Umbrella crate re-exporting the voxdens workspace crates.

pub use voxdens_core;
pub use voxdens_filters;
pub use voxdens_io;
pub use voxdens_pipeline;
