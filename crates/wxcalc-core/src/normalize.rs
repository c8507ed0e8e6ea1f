//! Conversion of raw record columns into unit-tagged quantities.
//!
//! Every mapped column becomes a [`Quantity`] of the record count, in the unit
//! the schema declares for the field. Values outside the field's plausible
//! range are counted and reported as [`RangeWarning`]s; they are never
//! dropped or altered.

use crate::quantity::Quantity;
use crate::record::{column_values, Record};
use crate::resolver::ColumnMap;
use crate::schema::FieldSchema;
use crate::units::Unit;
use log::warn;
use std::collections::BTreeMap;
use std::fmt;

/// Default share of non-missing values that may fall out of range silently.
pub const DEFAULT_WARN_FRACTION: f64 = 0.01;

/// Canonical field name to quantity.
pub type Quantities = BTreeMap<String, Quantity>;

/// Advisory notice that a field has too many implausible values.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeWarning {
    pub field: String,
    pub column: String,
    /// Number of non-missing values outside the range
    pub out_of_range: usize,
    /// Number of non-missing values
    pub non_missing: usize,
    pub range: (f64, f64),
}

impl fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (column '{}'): {} of {} values outside plausible range ({}, {})",
            self.field, self.column, self.out_of_range, self.non_missing, self.range.0, self.range.1
        )
    }
}

/// Output of [`normalize_units`].
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub quantities: Quantities,
    pub warnings: Vec<RangeWarning>,
}

/// Builds one quantity per mapped field.
///
/// Cells that are missing, null or not numeric become NaN. Strings with a
/// unit suffix are converted to the field's unit. A field gets a
/// warning, also logged at `warn`, when out-of-range values exceed
/// `warn_fraction` of its non-missing values.
pub fn normalize_units(
    records: &[Record],
    column_map: &ColumnMap,
    schema: &FieldSchema,
    warn_fraction: f64,
) -> Normalized {
    let mut normalized = Normalized::default();

    for (canonical, column) in column_map.iter() {
        let spec = schema.get(canonical);
        let unit = spec.map_or(Unit::Dimensionless, |s| s.unit);
        let values = column_values(records, column, unit);

        if let Some((spec, range)) = spec.and_then(|s| s.range.map(|r| (s, r))) {
            let non_missing = values.iter().filter(|v| !v.is_nan()).count();
            let out_of_range = values.iter().filter(|v| spec.is_out_of_range(**v)).count();
            if out_of_range > 0 && out_of_range as f64 / non_missing as f64 > warn_fraction {
                let warning = RangeWarning {
                    field: canonical.to_string(),
                    column: column.to_string(),
                    out_of_range,
                    non_missing,
                    range,
                };
                warn!("{warning}");
                normalized.warnings.push(warning);
            }
        }

        normalized
            .quantities
            .insert(canonical.to_string(), Quantity::from_vec(values, unit));
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::build_column_map;
    use crate::schema::STATION_SCHEMA;
    use serde_json::json;

    fn humidity_records(total: usize, bad: usize) -> Vec<Record> {
        (0..total)
            .map(|i| {
                let rh = if i < bad { 150.0 } else { 60.0 };
                json!({"相对湿度": rh}).as_object().unwrap().clone()
            })
            .collect()
    }

    fn normalize(records: &[Record]) -> Normalized {
        let columns = crate::resolver::dataset_columns(records);
        let map = build_column_map(&columns, &STATION_SCHEMA);
        normalize_units(records, &map, &STATION_SCHEMA, DEFAULT_WARN_FRACTION)
    }

    #[test]
    fn test_units_attached_from_schema() {
        let records = vec![json!({"温度": 25, "气压": "1000"}).as_object().unwrap().clone()];
        let normalized = normalize(&records);
        let t = &normalized.quantities["temperature"];
        assert_eq!(t.unit(), Unit::DegreeCelsius);
        assert_eq!(t.first(), Some(25.0));
        let p = &normalized.quantities["pressure"];
        assert_eq!(p.unit(), Unit::Hectopascal);
        assert_eq!(p.first(), Some(1000.0));
    }

    #[test]
    fn test_unparsable_values_become_nan() {
        let records = vec![
            json!({"温度": "--"}).as_object().unwrap().clone(),
            json!({"温度": null}).as_object().unwrap().clone(),
            json!({"温度": 12.5}).as_object().unwrap().clone(),
        ];
        let t = &normalize(&records).quantities["temperature"];
        assert_eq!(t.len(), 3);
        assert!(t.magnitude()[0].is_nan());
        assert!(t.magnitude()[1].is_nan());
        assert_eq!(t.magnitude()[2], 12.5);
    }

    #[test]
    fn test_unit_suffixes_converted_to_field_unit() {
        let records = vec![
            json!({"温度": "25℃"}).as_object().unwrap().clone(),
            json!({"温度": "300 K"}).as_object().unwrap().clone(),
        ];
        let t = &normalize(&records).quantities["temperature"];
        assert_eq!(t.magnitude()[0], 25.0);
        assert!((t.magnitude()[1] - 26.85).abs() < 1e-9);
    }

    #[test]
    fn test_two_percent_out_of_range_warns() {
        let normalized = normalize(&humidity_records(100, 2));
        assert_eq!(normalized.warnings.len(), 1);
        let warning = &normalized.warnings[0];
        assert_eq!(warning.field, "relative_humidity");
        assert_eq!(warning.out_of_range, 2);
        assert_eq!(warning.non_missing, 100);
    }

    #[test]
    fn test_half_percent_out_of_range_is_silent() {
        let normalized = normalize(&humidity_records(200, 1));
        assert!(normalized.warnings.is_empty());
    }

    #[test]
    fn test_warning_does_not_alter_values() {
        let normalized = normalize(&humidity_records(10, 5));
        assert_eq!(normalized.warnings.len(), 1);
        let rh = &normalized.quantities["relative_humidity"];
        assert_eq!(rh.magnitude()[0], 150.0);
        assert_eq!(rh.magnitude()[9], 60.0);
    }
}
