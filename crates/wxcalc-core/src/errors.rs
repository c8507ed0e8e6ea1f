use crate::units::{ConversionError, ParseError};
use thiserror::Error;

/// Error type for unit, quantity and schema operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Expected a numeric value, got {0}")]
    NotNumeric(String),
    #[error("Invalid field schema: {0}")]
    InvalidSchema(String),
    #[error("Failed to read TOML: {0}")]
    TomlRead(#[from] toml::de::Error),
    #[error("Failed to write TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

/// Convenience type for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;
