//! Physical dimensions for unit validation.
//!
//! Dimensions are stored as integer exponents of the SI base quantities that
//! appear in surface and upper-air meteorology: mass, length, time and
//! temperature. Angles and ratios (percent, kg/kg) are dimensionless.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Exponents of mass, length, time and temperature.
///
/// Wind speed is L·T⁻¹, pressure M·L⁻¹·T⁻² and CAPE L²·T⁻².
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Dimension {
    pub mass: i8,
    pub length: i8,
    pub time: i8,
    pub temperature: i8,
}

impl Dimension {
    #[must_use]
    pub const fn dimensionless() -> Self {
        Self::new(0, 0, 0, 0)
    }

    #[must_use]
    pub const fn new(mass: i8, length: i8, time: i8, temperature: i8) -> Self {
        Self {
            mass,
            length,
            time,
            temperature,
        }
    }

    /// Length dimension (L¹).
    pub const LENGTH: Self = Self::new(0, 1, 0, 0);

    /// Temperature dimension (Θ¹).
    pub const TEMPERATURE: Self = Self::new(0, 0, 0, 1);

    /// Velocity dimension (L·T⁻¹).
    pub const VELOCITY: Self = Self::new(0, 1, -1, 0);

    /// Pressure dimension (M·L⁻¹·T⁻²).
    pub const PRESSURE: Self = Self::new(1, -1, -2, 0);

    /// Specific energy dimension (L²·T⁻²), shared by J/kg and geopotential.
    pub const SPECIFIC_ENERGY: Self = Self::new(0, 2, -2, 0);

    /// Frequency dimension (T⁻¹), used for vorticity and divergence.
    pub const FREQUENCY: Self = Self::new(0, 0, -1, 0);

    /// Temperature tendency (Θ·T⁻¹), used for temperature advection.
    pub const TEMPERATURE_RATE: Self = Self::new(0, 0, -1, 1);

    /// Density (M·L⁻³).
    pub const DENSITY: Self = Self::new(1, -3, 0, 0);

    /// Returns true if this dimension is dimensionless.
    #[must_use]
    pub const fn is_dimensionless(&self) -> bool {
        self.mass == 0 && self.length == 0 && self.time == 0 && self.temperature == 0
    }

    /// Quantities convert into each other only when every exponent matches.
    #[must_use]
    pub const fn is_compatible(&self, other: &Self) -> bool {
        self.mass == other.mass
            && self.length == other.length
            && self.time == other.time
            && self.temperature == other.temperature
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return f.write_str("dimensionless");
        }
        let rendered: Vec<String> = [
            ("M", self.mass),
            ("L", self.length),
            ("T", self.time),
            ("Θ", self.temperature),
        ]
        .into_iter()
        .filter(|(_, exponent)| *exponent != 0)
        .map(|(symbol, exponent)| match exponent {
            1 => symbol.to_string(),
            _ => format!("{symbol}^{exponent}"),
        })
        .collect();
        f.write_str(&rendered.join(" "))
    }
}
