use thiserror::Error;
use wxcalc_core::CoreError;
use wxcalc_thermo::CalcError;

/// Error type for calling a calculation by name.
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("extra argument '{name}': {source}")]
    ExtraArgument {
        name: String,
        #[source]
        source: CoreError,
    },
    #[error("{function} failed: {source}")]
    Call {
        function: String,
        #[source]
        source: CalcError,
    },
}

impl InvokeError {
    pub(crate) fn call(function: &str, source: CalcError) -> Self {
        InvokeError::Call {
            function: function.to_string(),
            source,
        }
    }
}

/// Error type for loading dispatch settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid setting '{0}': {1}")]
    Invalid(&'static str, String),
}
