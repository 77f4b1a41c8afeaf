use thiserror::Error;

/// Shared error type for the donor pipeline crates.
#[derive(Debug, Error)]
pub enum DonorError {
    /// A required raw column is absent from the input (configuration error).
    #[error("required column missing from input: {name}")]
    MissingColumn { name: String },
    /// A column exists but holds a value the pipeline cannot use.
    #[error("invalid value in column {column}: {message}")]
    InvalidValue { column: String, message: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DonorError {
    pub fn missing_column(name: impl Into<String>) -> Self {
        Self::MissingColumn { name: name.into() }
    }

    pub fn invalid_value(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            column: column.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DonorError>;
