use thiserror::Error;
use wxcalc_core::units::ConversionError;

/// Error type for calculation failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("missing required argument '{0}'")]
    MissingArgument(String),
    #[error("argument '{argument}': {source}")]
    Units {
        argument: String,
        #[source]
        source: ConversionError,
    },
    #[error("arguments have incompatible lengths {0} and {1}")]
    LengthMismatch(usize, usize),
    #[error("profile needs at least {required} levels, got {found}")]
    InsufficientProfile { required: usize, found: usize },
    #[error("pressure must decrease monotonically with height")]
    NonMonotonic,
    #[error("{0} did not converge after {1} iterations")]
    DidNotConverge(&'static str, usize),
    #[error("invalid argument '{0}': {1}")]
    InvalidArgument(String, String),
    #[error("ODE integration failed: {0}")]
    Integration(String),
}

impl CalcError {
    pub(crate) fn invalid(argument: &str, reason: impl Into<String>) -> Self {
        CalcError::InvalidArgument(argument.to_string(), reason.into())
    }
}

/// Convenience type for `Result<T, CalcError>`.
pub type CalcResult<T> = Result<T, CalcError>;
