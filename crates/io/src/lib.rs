#![forbid(unsafe_code)]

pub mod density;
pub mod error;
pub mod frame;

pub use density::{
    format_histogram, open_densities, parse_density_line, write_histogram, DensityReader,
};
pub use error::{ParseError, ReadError};
pub use frame::{open_frames, parse_frame, FrameReader};
