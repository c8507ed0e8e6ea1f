//! One call of a calculation over whole columns.

use crate::derive::fill_missing;
use crate::errors::InvokeError;
use log::warn;
use serde_json::Value;
use std::collections::BTreeMap;
use wxcalc_core::normalize::Quantities;
use wxcalc_core::record::value_to_quantity;
use wxcalc_core::schema::FieldSchema;
use wxcalc_core::units::Unit;
use wxcalc_core::Quantity;
use wxcalc_thermo::{lookup, Args, CalcOutput, Param};

/// Caller-supplied arguments that do not come from the records, such as grid
/// spacing. Values are numbers, numeric strings or quantity strings
/// (`"1000 m"`).
pub type ExtraArgs = BTreeMap<String, Value>;

/// Unit assumed for a bare number passed to `param`.
///
/// The schema unit wins so numbers read from records and numbers passed
/// alongside them agree.
pub(crate) fn default_unit(param: &Param, schema: &FieldSchema) -> Unit {
    schema.unit_of(param.name).unwrap_or(param.unit)
}

/// Reads an extra argument as a quantity for `param`.
pub(crate) fn extra_quantity(
    param: &Param,
    value: &Value,
    schema: &FieldSchema,
) -> Result<Quantity, InvokeError> {
    value_to_quantity(value, default_unit(param, schema)).map_err(|source| {
        InvokeError::ExtraArgument {
            name: param.name.to_string(),
            source,
        }
    })
}

/// Calls `name` once with whole-column quantities.
///
/// Derived quantities are added to `quantities` first. Each declared
/// parameter takes the matching quantity, else the matching extra argument,
/// else is left out for the calculation to report.
///
/// # Errors
///
/// [`InvokeError::UnknownFunction`] if no calculation has this name. Any
/// other error means the caller should retry record by record.
pub fn call_vectorized(
    name: &str,
    quantities: &mut Quantities,
    extra: &ExtraArgs,
    schema: &FieldSchema,
) -> Result<CalcOutput, InvokeError> {
    let function = lookup(name).ok_or_else(|| InvokeError::UnknownFunction(name.to_string()))?;
    fill_missing(quantities);

    let mut args = Args::new();
    for param in function.params {
        if let Some(quantity) = quantities.get(param.name) {
            args.insert(param.name, quantity.clone());
        } else if let Some(value) = extra.get(param.name) {
            args.insert(param.name, extra_quantity(param, value, schema)?);
        }
    }

    function.call(&args).map_err(|source| {
        warn!("vectorized call of {name} failed: {source}");
        InvokeError::call(name, source)
    })
}
