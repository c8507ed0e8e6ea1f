//! Unit-tagged numeric arrays.
//!
//! A [`Quantity`] pairs an [`Array1<f64>`] magnitude with a [`Unit`]. Scalars
//! are length-1 quantities, so the same calculation code serves whole columns
//! and single records.

use crate::units::{ConversionError, Unit};
use ndarray::Array1;
use std::fmt;

/// A numeric array tagged with a physical unit.
///
/// Missing observations are carried as NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    magnitude: Array1<f64>,
    unit: Unit,
}

impl Quantity {
    pub fn new(magnitude: Array1<f64>, unit: Unit) -> Self {
        Self { magnitude, unit }
    }

    /// A single-value quantity.
    pub fn scalar(value: f64, unit: Unit) -> Self {
        Self::new(Array1::from_elem(1, value), unit)
    }

    pub fn from_vec(values: Vec<f64>, unit: Unit) -> Self {
        Self::new(Array1::from_vec(values), unit)
    }

    /// A unitless quantity.
    pub fn dimensionless(magnitude: Array1<f64>) -> Self {
        Self::new(magnitude, Unit::Dimensionless)
    }

    pub fn magnitude(&self) -> &Array1<f64> {
        &self.magnitude
    }

    pub fn into_magnitude(self) -> Array1<f64> {
        self.magnitude
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn len(&self) -> usize {
        self.magnitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitude.is_empty()
    }

    /// True for length-1 quantities, which broadcast against any length.
    pub fn is_scalar(&self) -> bool {
        self.len() == 1
    }

    /// Returns the first value, if any.
    pub fn first(&self) -> Option<f64> {
        self.magnitude.first().copied()
    }

    /// Converts this quantity to another unit.
    ///
    /// # Errors
    ///
    /// Fails when the units have different dimensions.
    pub fn to(&self, unit: Unit) -> Result<Quantity, ConversionError> {
        Ok(Quantity::new(self.values_in(unit)?, unit))
    }

    /// Returns the magnitudes expressed in `unit`.
    pub fn values_in(&self, unit: Unit) -> Result<Array1<f64>, ConversionError> {
        self.unit.check_compatible(unit)?;
        if self.unit == unit {
            return Ok(self.magnitude.clone());
        }
        let convert = self.unit.converter(unit);
        Ok(self.magnitude.mapv(convert))
    }

    /// Applies `f` to every value, keeping the unit.
    pub fn mapv(&self, f: impl Fn(f64) -> f64) -> Quantity {
        Quantity::new(self.magnitude.mapv(f), self.unit)
    }

    /// Iterates over the magnitudes.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.magnitude.iter().copied()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (true, Some(value)) = (self.is_scalar(), self.first()) {
            write!(f, "{value} {}", self.unit)
        } else {
            write!(f, "{} {}", self.magnitude, self.unit)
        }
    }
}
