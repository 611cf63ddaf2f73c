#![forbid(unsafe_code)]

pub mod binner;
pub mod config;
pub mod error;
pub mod summary;
pub mod tally;

pub use binner::{bin_file, bin_stream, bin_stream_parallel, RunSummary};
pub use config::BinnerConfig;
pub use error::DensityError;
pub use summary::{summarize_densities, summarize_file, DensitySummary, PeakVoxel};
pub use tally::{tally_file, tally_stream, TallyReport};
