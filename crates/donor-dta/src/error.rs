//! Error types for the donor-dta crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing `.dta` files.
#[derive(Debug, Error)]
pub enum DtaError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("invalid dta format: {0}")]
    InvalidFormat(String),

    #[error("expected tag {expected} at offset {offset}")]
    UnexpectedTag { expected: &'static str, offset: usize },

    #[error("unsupported dta release: {release}")]
    UnsupportedRelease { release: String },

    #[error("big-endian (MSF) dta files are not supported")]
    BigEndianUnsupported,

    #[error("unsupported variable type code {code} for variable {name}")]
    UnsupportedType { name: String, code: u16 },

    #[error("strL variables are not supported (variable {name})")]
    StrlUnsupported { name: String },

    #[error("invalid variable name: {name}")]
    InvalidVariableName { name: String },

    #[error("row has {actual} values but dataset has {expected} variables")]
    RowLengthMismatch { expected: usize, actual: usize },

    #[error("value for variable {name} does not match its storage type")]
    ValueTypeMismatch { name: String },

    #[error("read past end of file at offset {offset}")]
    OutOfBounds { offset: usize },
}

impl DtaError {
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat(message.into())
    }
}

/// Result type for dta operations.
pub type Result<T> = std::result::Result<T, DtaError>;
