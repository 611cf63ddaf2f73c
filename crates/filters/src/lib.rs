#![forbid(unsafe_code)]

pub mod density;
pub mod tally;

pub use density::bin_frame;
pub use tally::count_in_box;
