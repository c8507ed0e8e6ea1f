//! Record-by-record retry after a failed vectorized call.

use crate::derive::fill_missing;
use crate::invoke::{default_unit, ExtraArgs};
use crate::outcome::Stats;
use crate::settings::DispatchSettings;
use log::debug;
use serde_json::Value;
use wxcalc_core::normalize::Quantities;
use wxcalc_core::record::value_to_quantity;
use wxcalc_core::resolver::ColumnMap;
use wxcalc_core::schema::FieldSchema;
use wxcalc_core::units::Unit;
use wxcalc_core::Record;
use wxcalc_thermo::{Args, CalcFunction};

/// Records processed one at a time, with a result or error column each.
#[derive(Debug, Clone, PartialEq)]
pub struct RowWise {
    pub processed: Vec<Record>,
    /// Mean and count of the successful results
    pub stats: Stats,
    pub errors: usize,
}

/// Everything a per-record call needs besides the record itself.
pub struct RowContext<'a> {
    pub column_map: &'a ColumnMap,
    pub schema: &'a FieldSchema,
    pub extra: &'a ExtraArgs,
    pub settings: &'a DispatchSettings,
}

impl RowContext<'_> {
    /// Raw value for `param`: the record key with the parameter's own name,
    /// then the mapped column, then the extra arguments.
    fn raw_value<'r>(&'r self, record: &'r Record, param: &str) -> Option<&'r Value> {
        record
            .get(param)
            .or_else(|| {
                self.column_map
                    .get(param)
                    .and_then(|column| record.get(column))
            })
            .or_else(|| self.extra.get(param))
    }

    /// Length-1 quantities for the declared parameters of `function`.
    ///
    /// Other mapped fields of the record are added as derivation inputs.
    fn record_quantities(
        &self,
        function: &CalcFunction,
        record: &Record,
    ) -> Result<Quantities, String> {
        let mut quantities = Quantities::new();
        for param in function.params {
            if let Some(value) = self.raw_value(record, param.name) {
                let quantity = value_to_quantity(value, default_unit(param, self.schema))
                    .map_err(|e| format!("argument '{}': {e}", param.name))?;
                quantities.insert(param.name.to_string(), quantity);
            }
        }
        for (field, column) in self.column_map.iter() {
            if quantities.contains_key(field) {
                continue;
            }
            let (Some(value), Some(unit)) = (record.get(column), self.schema.unit_of(field)) else {
                continue;
            };
            if let Ok(quantity) = value_to_quantity(value, unit) {
                quantities.insert(field.to_string(), quantity);
            }
        }
        fill_missing(&mut quantities);
        Ok(quantities)
    }

    /// Principal result of `function` for one record, in display units.
    fn evaluate(&self, function: &CalcFunction, record: &Record) -> Result<f64, String> {
        let quantities = self.record_quantities(function, record)?;
        let mut args = Args::new();
        for param in function.params {
            if let Some(quantity) = quantities.get(param.name) {
                args.insert(param.name, quantity.clone());
            }
        }
        let output = function.call(&args).map_err(|e| e.to_string())?;
        let result = output.principal();
        let value = if result.unit().is_absolute_temperature() {
            result
                .values_in(Unit::DegreeCelsius)
                .map_err(|e| e.to_string())?
                .first()
                .copied()
        } else {
            result.first()
        };
        match value {
            Some(v) if v.is_finite() => Ok(v),
            Some(v) => Err(format!("result is not finite ({v})")),
            None => Err("calculation returned no value".to_string()),
        }
    }
}

/// Runs `function` on each record independently.
///
/// A failing record gets `<name>_error` holding the error text; the others
/// get `<name>_result`. No record's failure stops the batch.
pub fn run_row_wise(function: &CalcFunction, records: &[Record], context: &RowContext) -> RowWise {
    let result_column = format!("{}_result", function.name);
    let error_column = format!("{}_error", function.name);

    let mut values = Vec::new();
    let mut errors = 0;
    let processed = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let mut out = record.clone();
            match context.evaluate(function, record) {
                Ok(value) => {
                    values.push(value);
                    out.insert(result_column.clone(), context.settings.round(value).into());
                }
                Err(e) => {
                    debug!("{} failed on record {index}: {e}", function.name);
                    errors += 1;
                    out.insert(error_column.clone(), Value::String(e));
                }
            }
            out
        })
        .collect();

    RowWise {
        processed,
        stats: Stats::mean_of(&values),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;
    use wxcalc_core::resolver::build_column_map;
    use wxcalc_core::schema::STATION_SCHEMA;
    use wxcalc_thermo::lookup;

    fn records(values: Value) -> Vec<Record> {
        values
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    fn run(name: &str, data: &[Record], extra: &ExtraArgs) -> RowWise {
        let columns: Vec<&String> = data.iter().flat_map(|r| r.keys()).collect();
        let column_map = build_column_map(&columns, &STATION_SCHEMA);
        let settings = DispatchSettings::default();
        let context = RowContext {
            column_map: &column_map,
            schema: &STATION_SCHEMA,
            extra,
            settings: &settings,
        };
        run_row_wise(lookup(name).unwrap(), data, &context)
    }

    #[test]
    fn test_row_failures_are_isolated() {
        let data = records(json!([
            {"温度": 25, "相对湿度": 70},
            {"温度": null, "相对湿度": 80},
            {"温度": "abc", "相对湿度": 80},
            {"温度": 10, "相对湿度": 50},
        ]));
        let rows = run("dewpoint", &data, &ExtraArgs::new());
        assert_eq!(rows.processed.len(), 4);
        assert_eq!(rows.errors, 2);
        assert!(rows.processed[1].contains_key("dewpoint_error"));
        assert!(rows.processed[2].contains_key("dewpoint_error"));
        let first = rows.processed[0]["dewpoint_result"].as_f64().unwrap();
        assert_relative_eq!(first, 19.155, epsilon = 0.01);
        assert_eq!(rows.stats.count, 2);
        assert!(rows.stats.min.is_none());
    }

    #[test]
    fn test_record_key_wins_over_mapped_column() {
        // `temperature` is read from its own key, not from `气温`
        let data = records(json!([
            {"temperature": 30, "气温": 0, "relative_humidity": 100},
        ]));
        let rows = run("dewpoint", &data, &ExtraArgs::new());
        let td = rows.processed[0]["dewpoint_result"].as_f64().unwrap();
        assert_relative_eq!(td, 30.0, epsilon = 1e-3);
    }

    #[test]
    fn test_result_is_rounded() {
        let data = records(json!([{"u": 1, "v": 1}]));
        let rows = run("wind_speed", &data, &ExtraArgs::new());
        assert_eq!(rows.processed[0]["wind_speed_result"], json!(1.4142));
        assert_relative_eq!(rows.stats.mean.unwrap(), 2f64.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn test_undefined_result_is_an_error() {
        let data = records(json!([{"温度": 10, "相对湿度": 50}]));
        let rows = run("heat_index", &data, &ExtraArgs::new());
        assert_eq!(rows.errors, 1);
        assert!(rows.processed[0]["heat_index_error"]
            .as_str()
            .unwrap()
            .contains("not finite"));
    }
}
