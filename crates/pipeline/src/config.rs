use crate::DensityError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use voxdens_core::{DomainError, Grid};

/// Run parameters for the density binner.
///
/// Loaded from JSON; missing fields take their defaults, unknown fields are rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BinnerConfig {
    /// Side of the cubic simulation box. Must match the simulator that wrote the input.
    pub domain_side_length: f64,
    /// Voxels per axis.
    pub grid_resolution: usize,
    /// Bin batches of frames on the rayon pool. Output order is unchanged.
    pub parallel: bool,
    /// Frames per parallel batch.
    pub batch_size: usize,
}

impl Default for BinnerConfig {
    fn default() -> Self {
        BinnerConfig {
            domain_side_length: 100.0,
            grid_resolution: 10,
            parallel: false,
            batch_size: 256,
        }
    }
}

impl BinnerConfig {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DensityError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| DensityError::file(path, e))?;
        Self::from_json_str(&raw).map_err(|source| DensityError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn grid(&self) -> Result<Grid, DomainError> {
        Grid::cube(self.domain_side_length, self.grid_resolution)
    }
}
