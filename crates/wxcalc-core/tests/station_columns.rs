//! End-to-end column resolution and normalization on station exports.

use approx::assert_relative_eq;
use serde_json::json;
use wxcalc_core::normalize::{normalize_units, DEFAULT_WARN_FRACTION};
use wxcalc_core::record::Record;
use wxcalc_core::resolver::{build_column_map, dataset_columns};
use wxcalc_core::schema::{FieldSchema, STATION_SCHEMA};
use wxcalc_core::units::Unit;

fn records(values: serde_json::Value) -> Vec<Record> {
    values
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect()
}

#[test]
fn test_mixed_station_export() {
    let data = records(json!([
        {"站号": "54511", "气温(℃)": 21.3, "相对湿度(%)": 55, "气压(hPa)": 1008.2, "风速(m/s)": 3.1},
        {"站号": "54511", "气温(℃)": 22.0, "相对湿度(%)": 52, "气压(hPa)": 1007.9, "风速(m/s)": null},
        {"站号": "54511", "气温(℃)": "缺测", "相对湿度(%)": 50, "气压(hPa)": 1007.5},
    ]));
    let columns = dataset_columns(&data);
    let map = build_column_map(&columns, &STATION_SCHEMA);

    assert_eq!(map.get("temperature"), Some("气温(℃)"));
    assert_eq!(map.get("relative_humidity"), Some("相对湿度(%)"));
    assert_eq!(map.get("pressure"), Some("气压(hPa)"));
    assert_eq!(map.get("wind_speed"), Some("风速(m/s)"));
    assert!(!map.contains("dewpoint"));

    let normalized = normalize_units(&data, &map, &STATION_SCHEMA, DEFAULT_WARN_FRACTION);
    assert!(normalized.warnings.is_empty());

    let t = &normalized.quantities["temperature"];
    assert_eq!(t.len(), 3);
    assert!(t.magnitude()[2].is_nan());

    let wind = &normalized.quantities["wind_speed"];
    assert_eq!(wind.unit(), Unit::MeterPerSecond);
    assert!(wind.magnitude()[1].is_nan());
    assert!(wind.magnitude()[2].is_nan());

    let p_pa = normalized.quantities["pressure"].values_in(Unit::Pascal).unwrap();
    assert_relative_eq!(p_pa[0], 100_820.0, max_relative = 1e-12);
}

#[test]
fn test_custom_schema_from_toml() {
    let schema = FieldSchema::from_toml_str(
        r#"
        [[field]]
        name = "temperature"
        aliases = ["t2m"]
        unit = "K"
        range = [180.0, 340.0]
        "#,
    )
    .unwrap();
    let data = records(json!([{"T2M": 290.0}, {"T2M": 15.0}]));
    let map = build_column_map(&dataset_columns(&data), &schema);
    let normalized = normalize_units(&data, &map, &schema, DEFAULT_WARN_FRACTION);

    assert_eq!(normalized.quantities["temperature"].unit(), Unit::Kelvin);
    assert_eq!(normalized.warnings.len(), 1);
    assert_eq!(normalized.warnings[0].column, "T2M");
}
