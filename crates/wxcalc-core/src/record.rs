//! Raw tabular records and value coercion.

use crate::errors::{CoreError, CoreResult};
use crate::quantity::Quantity;
use crate::units::{parse_quantity, Unit};
use serde_json::Value;

/// One row of a dataset: column name to raw JSON scalar, in column order.
pub type Record = serde_json::Map<String, Value>;

/// Reads a raw value as a length-1 quantity.
///
/// Bare numbers take `default_unit`. Strings may carry their own unit
/// (`"1000 m"`), which then wins over the default.
///
/// # Errors
///
/// Null, booleans, containers and strings that do not start with a number
/// are rejected.
pub fn value_to_quantity(value: &Value, default_unit: Unit) -> CoreResult<Quantity> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .map(|v| Quantity::scalar(v, default_unit))
            .ok_or_else(|| CoreError::NotNumeric(number.to_string())),
        Value::String(text) => {
            let (magnitude, unit) = parse_quantity(text)?;
            Ok(Quantity::scalar(magnitude, unit.unwrap_or(default_unit)))
        }
        other => Err(CoreError::NotNumeric(other.to_string())),
    }
}

/// Coerces a raw cell to a float in `unit`.
///
/// Goes through [`value_to_quantity`], so `"25℃"` and `25` agree for a
/// Celsius field. Anything that cannot be read as a quantity of the right
/// dimension, including null, becomes NaN.
pub fn coerce_number(value: &Value, unit: Unit) -> f64 {
    value_to_quantity(value, unit)
        .ok()
        .and_then(|quantity| quantity.to(unit).ok())
        .and_then(|quantity| quantity.first())
        .unwrap_or(f64::NAN)
}

/// Collects the values of one column in `unit`, coercing each with
/// [`coerce_number`].
///
/// Records lacking the column contribute NaN.
pub fn column_values(records: &[Record], column: &str, unit: Unit) -> Vec<f64> {
    records
        .iter()
        .map(|record| {
            record
                .get(column)
                .map_or(f64::NAN, |value| coerce_number(value, unit))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!(25), Unit::DegreeCelsius), 25.0);
        assert_eq!(coerce_number(&json!(" 1013.2 "), Unit::Hectopascal), 1013.2);
        assert!(coerce_number(&json!(null), Unit::Meter).is_nan());
        assert!(coerce_number(&json!("n/a"), Unit::Meter).is_nan());
        assert!(coerce_number(&json!(true), Unit::Meter).is_nan());
    }

    #[test]
    fn test_coerce_number_with_unit_suffix() {
        assert_eq!(coerce_number(&json!("25℃"), Unit::DegreeCelsius), 25.0);
        let km = coerce_number(&json!("1.5 km"), Unit::Meter);
        assert!((km - 1500.0).abs() < 1e-9);
        assert!(coerce_number(&json!("5 m"), Unit::DegreeCelsius).is_nan());
    }

    #[test]
    fn test_value_to_quantity_default_unit() {
        let q = value_to_quantity(&json!(850), Unit::Hectopascal).unwrap();
        assert_eq!(q.unit(), Unit::Hectopascal);
        assert_eq!(q.first(), Some(850.0));
    }

    #[test]
    fn test_value_to_quantity_explicit_unit() {
        let q = value_to_quantity(&json!("1.5 km"), Unit::Meter).unwrap();
        assert_eq!(q.unit(), Unit::Kilometer);
        assert_eq!(q.first(), Some(1.5));
    }

    #[test]
    fn test_value_to_quantity_rejects_null() {
        assert!(matches!(
            value_to_quantity(&json!(null), Unit::Meter),
            Err(CoreError::NotNumeric(_))
        ));
        assert!(matches!(
            value_to_quantity(&json!("high"), Unit::Meter),
            Err(CoreError::Parse(_))
        ));
    }

    #[test]
    fn test_column_values_missing_key() {
        let records: Vec<Record> = vec![
            json!({"温度": 20}).as_object().unwrap().clone(),
            json!({"湿度": 50}).as_object().unwrap().clone(),
        ];
        let values = column_values(&records, "温度", Unit::DegreeCelsius);
        assert_eq!(values[0], 20.0);
        assert!(values[1].is_nan());
    }
}
