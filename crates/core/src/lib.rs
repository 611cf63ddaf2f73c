#![forbid(unsafe_code)]

pub mod bbox;
pub mod domain;
pub mod error;
pub mod frame;
pub mod grid;
pub mod histogram;

pub use bbox::Aabb;
pub use domain::SimulationDomain;
pub use error::DomainError;
pub use frame::Frame;
pub use grid::{Grid, VoxelIndex};
pub use histogram::DensityHistogram;
