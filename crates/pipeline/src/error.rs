use std::io;
use std::path::{Path, PathBuf};
use voxdens_core::DomainError;
use voxdens_io::{ParseError, ReadError};

/// Everything that can stop a binning, tally or summary run.
#[derive(thiserror::Error, Debug)]
pub enum DensityError {
    /// A position line could not be parsed. `line` is 1-indexed.
    #[error("malformed frame at line {line}: {source}")]
    MalformedFrame { line: usize, source: ParseError },

    /// A density line could not be parsed. `line` is 1-indexed.
    #[error("malformed density record at line {line}: {source}")]
    MalformedDensity { line: usize, source: ParseError },

    #[error("failed to read input: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),

    #[error("{}: {source}", .path.display())]
    File { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("frame {frame} not found: input has {available} frames")]
    FrameNotFound { frame: usize, available: usize },

    #[error("batch size must be at least 1")]
    InvalidBatchSize,
}

impl DensityError {
    pub(crate) fn file(path: &Path, source: io::Error) -> Self {
        DensityError::File {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn from_frame_read(err: ReadError) -> Self {
        match err {
            ReadError::Io(e) => DensityError::Read(e),
            ReadError::Malformed { line, source } => DensityError::MalformedFrame { line, source },
        }
    }

    pub(crate) fn from_density_read(err: ReadError) -> Self {
        match err {
            ReadError::Io(e) => DensityError::Read(e),
            ReadError::Malformed { line, source } => {
                DensityError::MalformedDensity { line, source }
            }
        }
    }

    /// Attaches file paths to stream-level I/O errors.
    pub(crate) fn with_paths(self, input: &Path, output: Option<&Path>) -> Self {
        match (self, output) {
            (DensityError::Read(e), _) => DensityError::file(input, e),
            (DensityError::Write(e), Some(out)) => DensityError::file(out, e),
            (other, _) => other,
        }
    }

    /// The 1-indexed input line this error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            DensityError::MalformedFrame { line, .. }
            | DensityError::MalformedDensity { line, .. } => Some(*line),
            _ => None,
        }
    }
}
