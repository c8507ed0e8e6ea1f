//! Calling convention shared by every registered calculation.
//!
//! A [`CalcFunction`] declares its parameters with the unit a bare number is
//! assumed to carry. Callers pass unit-tagged [`Quantity`] arguments by name in
//! an [`Args`] bag; the function converts them to the units it needs.

use crate::errors::{CalcError, CalcResult};
use ndarray::Array1;
use serde::Serialize;
use std::collections::BTreeMap;
use wxcalc_core::units::Unit;
use wxcalc_core::Quantity;

/// A declared parameter of a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Param {
    pub name: &'static str,
    /// Unit assumed for bare numbers passed to this parameter
    pub unit: Unit,
    pub required: bool,
}

impl Param {
    pub const fn required(name: &'static str, unit: Unit) -> Self {
        Self {
            name,
            unit,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, unit: Unit) -> Self {
        Self {
            name,
            unit,
            required: false,
        }
    }
}

/// Result of a calculation.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcOutput {
    Single(Quantity),
    /// Two related results, such as CAPE and CIN
    Pair(Quantity, Quantity),
}

impl CalcOutput {
    /// The first (or only) result.
    pub fn principal(&self) -> &Quantity {
        match self {
            CalcOutput::Single(q) | CalcOutput::Pair(q, _) => q,
        }
    }
}

/// Named, unit-tagged arguments for a calculation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: BTreeMap<String, Quantity>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Quantity) {
        self.values.insert(name.into(), value);
    }

    /// Builder form of [`Args::insert`].
    pub fn with(mut self, name: impl Into<String>, value: Quantity) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Quantity> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn require(&self, name: &str) -> CalcResult<&Quantity> {
        self.get(name)
            .ok_or_else(|| CalcError::MissingArgument(name.to_string()))
    }

    /// A single value converted to `unit`.
    ///
    /// # Errors
    ///
    /// Fails if the argument is missing, has the wrong dimension or holds more
    /// than one value.
    pub fn scalar(&self, name: &str, unit: Unit) -> CalcResult<f64> {
        scalar_in(self.require(name)?, name, unit)
    }
}

/// Converts an argument to `unit`, naming it in any error.
pub(crate) fn values_in(quantity: &Quantity, name: &str, unit: Unit) -> CalcResult<Array1<f64>> {
    quantity
        .values_in(unit)
        .map_err(|source| CalcError::Units {
            argument: name.to_string(),
            source,
        })
}

pub(crate) fn scalar_in(quantity: &Quantity, name: &str, unit: Unit) -> CalcResult<f64> {
    if !quantity.is_scalar() {
        return Err(CalcError::invalid(
            name,
            format!("expected a single value, got {}", quantity.len()),
        ));
    }
    let values = values_in(quantity, name, unit)?;
    Ok(values[0])
}

/// A calculation in the static registry.
#[derive(Debug, Clone, Copy)]
pub struct CalcFunction {
    pub name: &'static str,
    /// One-line description
    pub summary: &'static str,
    pub params: &'static [Param],
    /// Names of the results, one per output of a pair
    pub outputs: &'static [&'static str],
    pub eval: fn(&Args) -> CalcResult<CalcOutput>,
}

impl CalcFunction {
    /// Runs the calculation after checking required arguments are present.
    pub fn call(&self, args: &Args) -> CalcResult<CalcOutput> {
        if let Some(missing) = self
            .params
            .iter()
            .find(|p| p.required && !args.contains(p.name))
        {
            return Err(CalcError::MissingArgument(missing.name.to_string()));
        }
        (self.eval)(args)
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn required_params(&self) -> impl Iterator<Item = &'static str> {
        self.params.iter().filter(|p| p.required).map(|p| p.name)
    }

    pub fn is_pair(&self) -> bool {
        self.outputs.len() == 2
    }

    /// Parameter list as `a, b, c=None`.
    pub fn signature(&self) -> String {
        self.params
            .iter()
            .map(|p| {
                if p.required {
                    p.name.to_string()
                } else {
                    format!("{}=None", p.name)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
