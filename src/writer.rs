//! Writing calculation results back into records.

use crate::outcome::Stats;
use serde_json::{Number, Value};
use wxcalc_core::units::Unit;
use wxcalc_core::{Quantity, Record};

/// Result values in the unit shown to users: absolute temperatures become
/// degrees Celsius, everything else keeps its unit.
fn display_values(result: &Quantity) -> Vec<f64> {
    if result.unit().is_absolute_temperature() {
        if let Ok(celsius) = result.to(Unit::DegreeCelsius) {
            return celsius.iter().collect();
        }
    }
    result.iter().collect()
}

/// Copies `records`, appending `column` with the matching result value.
///
/// A single value is broadcast to every record. Otherwise values are paired
/// with records in order; records past the end of the result get null, as do
/// non-finite values.
pub fn write_result(result: &Quantity, records: &[Record], column: &str) -> Vec<Record> {
    let values = display_values(result);
    let value_at = |i: usize| match values.as_slice() {
        [single] if records.len() != 1 => Some(*single),
        values => values.get(i).copied(),
    };
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let mut out = record.clone();
            let cell = value_at(i)
                .and_then(Number::from_f64)
                .map_or(Value::Null, Value::Number);
            out.insert(column.to_string(), cell);
            out
        })
        .collect()
}

/// Statistics over the numeric values of `column`.
pub fn summarize(records: &[Record], column: &str) -> Stats {
    let values: Vec<f64> = records
        .iter()
        .filter_map(|record| record.get(column).and_then(Value::as_f64))
        .collect();
    Stats::of(&values)
}
