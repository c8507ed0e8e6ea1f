//! Tunable behaviour of the dispatcher.

use crate::errors::SettingsError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use wxcalc_core::normalize::DEFAULT_WARN_FRACTION;

/// Settings for a [`crate::dispatch::Dispatcher`].
///
/// Every field has a default, so a TOML file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Fraction of non-missing values that may fall outside a field's
    /// plausible range before a warning is logged.
    ///
    /// Default: 0.01
    pub range_warning_fraction: f64,

    /// Decimal places kept for results computed record by record.
    ///
    /// Default: 4
    pub row_result_precision: u32,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            range_warning_fraction: DEFAULT_WARN_FRACTION,
            row_result_precision: 4,
        }
    }
}

impl DispatchSettings {
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&self.range_warning_fraction) {
            return Err(SettingsError::Invalid(
                "range_warning_fraction",
                format!("{} is not within [0, 1]", self.range_warning_fraction),
            ));
        }
        if self.row_result_precision > 15 {
            return Err(SettingsError::Invalid(
                "row_result_precision",
                format!("{} exceeds 15 decimal places", self.row_result_precision),
            ));
        }
        Ok(())
    }

    /// Rounds a per-record result to the configured precision.
    pub fn round(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.row_result_precision as i32);
        (value * scale).round() / scale
    }
}
