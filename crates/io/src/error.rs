use std::io;

/// Why a single line could not be decoded.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A frame line whose token count is not a multiple of 3.
    #[error("expected a multiple of 3 coordinates, found {found}")]
    TokenCount { found: usize },

    /// A frame token that is not a real number. `index` is the 0-based token position.
    #[error("token {index} ({token:?}) is not a number")]
    InvalidNumber { index: usize, token: String },

    /// A density token that is not a non-negative integer.
    #[error("count {index} ({token:?}) is not a non-negative integer")]
    InvalidCount { index: usize, token: String },

    #[error("expected {expected} voxel counts, found {found}")]
    VoxelCount { expected: usize, found: usize },

    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

/// Failure while pulling the next record out of a line-oriented reader.
#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error(transparent)]
    Io(#[from] io::Error),

    /// `line` is 1-indexed.
    #[error("line {line}: {source}")]
    Malformed { line: usize, source: ParseError },
}

impl ReadError {
    /// Classifies a failed line read. Undecodable bytes are a bad record at
    /// `line`; anything else is an I/O failure.
    pub fn from_line_error(err: io::Error, line: usize) -> Self {
        if err.kind() == io::ErrorKind::InvalidData {
            ReadError::Malformed {
                line,
                source: ParseError::InvalidUtf8,
            }
        } else {
            ReadError::Io(err)
        }
    }
}
