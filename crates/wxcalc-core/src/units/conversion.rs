//! Unit conversion calculations.
//!
//! [`Unit`] is a closed set of the units that appear in station observations
//! and in the outputs of the calculation library. Conversions are affine and
//! go through SI base units, which handles the temperature scales as well as
//! the purely multiplicative units.
//!
//! # Example
//!
//! ```
//! use wxcalc_core::units::Unit;
//!
//! let factor = Unit::Hectopascal.conversion_factor(Unit::Pascal).unwrap();
//! assert_eq!(factor, 100.0);
//!
//! let kelvin = Unit::DegreeCelsius.convert(25.0, Unit::Kelvin).unwrap();
//! assert!((kelvin - 298.15).abs() < 1e-9);
//! ```

use super::dimension::Dimension;
use super::parser::ParseError;
use super::registry::{UnitInfo, UNIT_REGISTRY, UNIT_TABLE};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for unit conversion failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// Units have incompatible dimensions.
    #[error("cannot convert from '{from_unit}' to '{to_unit}': incompatible dimensions ({from} vs {to})")]
    IncompatibleDimensions {
        from: Dimension,
        to: Dimension,
        from_unit: Unit,
        to_unit: Unit,
    },
    /// The conversion has an offset and so has no single multiplicative factor.
    #[error("conversion from '{from_unit}' to '{to_unit}' is affine and has no single factor")]
    NotMultiplicative { from_unit: Unit, to_unit: Unit },
}

/// A supported physical unit.
///
/// The discriminant indexes [`UNIT_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Unit {
    Kelvin,
    DegreeCelsius,
    DegreeFahrenheit,
    Percent,
    Dimensionless,
    KilogramPerKilogram,
    GramPerKilogram,
    Pascal,
    Hectopascal,
    Kilopascal,
    Meter,
    Kilometer,
    MeterPerSecond,
    KilometerPerHour,
    Knot,
    Degree,
    Radian,
    JoulePerKilogram,
    MeterSquaredPerSecondSquared,
    PerSecond,
    KelvinPerSecond,
    KilogramPerCubicMeter,
}

impl Unit {
    /// Number of supported units.
    pub const COUNT: usize = 22;

    /// Every supported unit, in discriminant order.
    pub const ALL: [Unit; Self::COUNT] = [
        Unit::Kelvin,
        Unit::DegreeCelsius,
        Unit::DegreeFahrenheit,
        Unit::Percent,
        Unit::Dimensionless,
        Unit::KilogramPerKilogram,
        Unit::GramPerKilogram,
        Unit::Pascal,
        Unit::Hectopascal,
        Unit::Kilopascal,
        Unit::Meter,
        Unit::Kilometer,
        Unit::MeterPerSecond,
        Unit::KilometerPerHour,
        Unit::Knot,
        Unit::Degree,
        Unit::Radian,
        Unit::JoulePerKilogram,
        Unit::MeterSquaredPerSecondSquared,
        Unit::PerSecond,
        Unit::KelvinPerSecond,
        Unit::KilogramPerCubicMeter,
    ];

    /// Parses a unit spelling such as `"hPa"`, `"℃"` or `"m s^-1"`.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyUnit);
        }
        UNIT_REGISTRY
            .lookup(trimmed)
            .ok_or_else(|| ParseError::UnknownUnit(trimmed.to_string()))
    }

    /// Returns the table row for this unit.
    #[must_use]
    pub fn info(self) -> &'static UnitInfo {
        &UNIT_TABLE[self as usize]
    }

    /// Returns the canonical symbol.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        self.info().symbol
    }

    /// Returns the physical dimension of this unit.
    #[must_use]
    pub fn dimension(self) -> Dimension {
        self.info().dimension
    }

    /// Returns true if this unit is physically dimensionless.
    #[must_use]
    pub fn is_dimensionless(self) -> bool {
        self.dimension().is_dimensionless()
    }

    /// Returns true for temperature scales measured from absolute zero.
    #[must_use]
    pub fn is_absolute_temperature(self) -> bool {
        self == Unit::Kelvin
    }

    /// Returns true if this unit can be converted to the target unit.
    #[must_use]
    pub fn is_compatible(self, other: Unit) -> bool {
        self.dimension().is_compatible(&other.dimension())
    }

    /// Multiplicative factor from this unit to `other`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions differ or if either unit carries an
    /// offset (degC, degF), since such conversions are not a pure scaling.
    pub fn conversion_factor(self, other: Unit) -> Result<f64, ConversionError> {
        self.check_compatible(other)?;
        if self.info().offset != 0.0 || other.info().offset != 0.0 {
            return Err(ConversionError::NotMultiplicative {
                from_unit: self,
                to_unit: other,
            });
        }
        Ok(self.info().scale / other.info().scale)
    }

    /// Converts a value from this unit to the target unit.
    pub fn convert(self, value: f64, other: Unit) -> Result<f64, ConversionError> {
        self.check_compatible(other)?;
        Ok(self.converter(other)(value))
    }

    /// Returns a function converting values from this unit to `other`.
    ///
    /// The caller must have checked compatibility.
    pub(crate) fn converter(self, other: Unit) -> impl Fn(f64) -> f64 {
        let from = *self.info();
        let to = *other.info();
        move |value| (value * from.scale + from.offset - to.offset) / to.scale
    }

    pub(crate) fn check_compatible(self, other: Unit) -> Result<(), ConversionError> {
        if self.is_compatible(other) {
            Ok(())
        } else {
            Err(ConversionError::IncompatibleDimensions {
                from: self.dimension(),
                to: other.dimension(),
                from_unit: self,
                to_unit: other,
            })
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Unit {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::parse(s)
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let spelling = String::deserialize(deserializer)?;
        Unit::parse(&spelling).map_err(serde::de::Error::custom)
    }
}
