//! Field schema for mapping dataset columns onto canonical physical fields.
//!
//! Each canonical field (`temperature`, `pressure`, ...) declares the column
//! names it answers to, the unit its raw values are recorded in, whether it is
//! required, and a plausible range used only for warnings.
//!
//! Declaration order matters: the column resolver visits fields in order, and
//! within a field it tries the aliases in order.
//!
//! # Example
//!
//! ```
//! use wxcalc_core::schema::{FieldSchema, FieldSpec};
//! use wxcalc_core::units::Unit;
//!
//! let schema = FieldSchema::new()
//!     .field(
//!         FieldSpec::new("temperature", Unit::DegreeCelsius)
//!             .aliases(["气温", "温度"])
//!             .required()
//!             .range(-90.0, 60.0),
//!     )
//!     .field(FieldSpec::new("pressure", Unit::Hectopascal).aliases(["气压"]));
//!
//! assert_eq!(schema.unit_of("pressure"), Some(Unit::Hectopascal));
//! ```
//!
//! # TOML format
//!
//! ```toml
//! [[field]]
//! name = "temperature"
//! aliases = ["气温", "温度"]
//! unit = "degC"
//! required = true
//! range = [-90.0, 60.0]
//! ```

use crate::errors::{CoreError, CoreResult};
use crate::units::Unit;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Schema entry for a single canonical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Canonical field name (e.g. "relative_humidity")
    pub name: String,

    /// Column names accepted for this field, tried in order
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Unit the raw column values are recorded in
    pub unit: Unit,

    #[serde(default)]
    pub required: bool,

    /// Plausible `(min, max)`; values outside only trigger a warning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<(f64, f64)>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, unit: Unit) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            unit,
            required: false,
            range: None,
        }
    }

    /// Appends aliases, keeping declaration order.
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Returns true when `value` lies outside the plausible range.
    ///
    /// NaN and fields without a range are never out of range.
    pub fn is_out_of_range(&self, value: f64) -> bool {
        match self.range {
            Some((min, max)) => value < min || value > max,
            None => false,
        }
    }
}

/// Ordered collection of field specifications.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "field", default)]
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field. A later field with the same name replaces the earlier one
    /// in place.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        match self.fields.iter_mut().find(|f| f.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.fields.push(spec),
        }
        self
    }

    /// The schema used for Chinese and English station exports.
    pub fn station() -> Self {
        FieldSchema::new()
            .field(
                FieldSpec::new("temperature", Unit::DegreeCelsius)
                    .aliases(["气温", "温度", "气温(℃)", "temperature"])
                    .required()
                    .range(-90.0, 60.0),
            )
            .field(
                FieldSpec::new("relative_humidity", Unit::Percent)
                    .aliases(["相对湿度", "湿度", "相对湿度(%)", "relative_humidity"])
                    .required()
                    .range(0.0, 100.0),
            )
            .field(
                FieldSpec::new("pressure", Unit::Hectopascal)
                    .aliases(["气压", "气压(hPa)", "pressure"])
                    .range(100.0, 2000.0),
            )
            .field(
                FieldSpec::new("dewpoint", Unit::DegreeCelsius)
                    .aliases(["露点", "露点温度(℃)", "dewpoint"])
                    .range(-90.0, 60.0),
            )
            .field(
                FieldSpec::new("wind_speed", Unit::MeterPerSecond)
                    .aliases(["风速", "风速(m/s)", "wind_speed"])
                    .range(0.0, 100.0),
            )
            .field(
                FieldSpec::new("wind_direction", Unit::Degree)
                    .aliases(["风向", "风向(°)", "wind_direction"])
                    .range(0.0, 360.0),
            )
            .field(
                FieldSpec::new("specific_humidity", Unit::KilogramPerKilogram)
                    .aliases(["比湿", "比湿(g/kg)", "specific_humidity"])
                    .range(0.0, 0.05),
            )
            .field(
                FieldSpec::new("mixing_ratio", Unit::KilogramPerKilogram)
                    .aliases(["混合比", "混合比(g/kg)", "mixing_ratio"])
                    .range(0.0, 0.1),
            )
            .field(
                FieldSpec::new("height", Unit::Meter)
                    .aliases(["高度", "海拔", "高度(m)", "height"])
                    .range(0.0, 20000.0),
            )
            .field(
                FieldSpec::new("geopotential_height", Unit::Meter)
                    .aliases(["位势高度", "Φz", "geopotential_height"])
                    .range(0.0, 20000.0),
            )
            .field(
                FieldSpec::new("u", Unit::MeterPerSecond)
                    .aliases(["纬向风", "u风", "u_wind", "u-wind", "uwnd"])
                    .range(-150.0, 150.0),
            )
            .field(
                FieldSpec::new("v", Unit::MeterPerSecond)
                    .aliases(["经向风", "v风", "v_wind", "v-wind", "vwnd"])
                    .range(-150.0, 150.0),
            )
    }

    /// Parses a schema from TOML and validates it.
    pub fn from_toml_str(source: &str) -> CoreResult<Self> {
        let schema: FieldSchema = toml::from_str(source)?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn to_toml_string(&self) -> CoreResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Checks for duplicate names and inverted ranges.
    pub fn validate(&self) -> CoreResult<()> {
        let mut seen = HashSet::new();
        for spec in &self.fields {
            if spec.name.trim().is_empty() {
                return Err(CoreError::InvalidSchema("field with empty name".to_string()));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(CoreError::InvalidSchema(format!(
                    "field '{}' is declared more than once",
                    spec.name
                )));
            }
            if let Some((min, max)) = spec.range {
                if min > max {
                    return Err(CoreError::InvalidSchema(format!(
                        "field '{}' has range ({min}, {max}) with min > max",
                        spec.name
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Declared unit of a field.
    pub fn unit_of(&self, name: &str) -> Option<Unit> {
        self.get(name).map(|f| f.unit)
    }

    /// Fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    /// Names of the required fields.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The [`FieldSchema::station`] schema, built once.
pub static STATION_SCHEMA: LazyLock<FieldSchema> = LazyLock::new(FieldSchema::station);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_schema_order() {
        let names: Vec<&str> = STATION_SCHEMA.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names[0], "temperature");
        assert_eq!(names[1], "relative_humidity");
        assert_eq!(names.len(), 12);
        assert!(STATION_SCHEMA.validate().is_ok());
    }

    #[test]
    fn test_required_fields() {
        let required: Vec<&str> = STATION_SCHEMA.required_fields().collect();
        assert_eq!(required, vec!["temperature", "relative_humidity"]);
    }

    #[test]
    fn test_field_replaces_in_place() {
        let schema = FieldSchema::new()
            .field(FieldSpec::new("a", Unit::Meter))
            .field(FieldSpec::new("b", Unit::Kelvin))
            .field(FieldSpec::new("a", Unit::Kilometer));
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.unit_of("a"), Some(Unit::Kilometer));
        assert_eq!(schema.iter().next().unwrap().name, "a");
    }

    #[test]
    fn test_out_of_range() {
        let spec = FieldSpec::new("relative_humidity", Unit::Percent).range(0.0, 100.0);
        assert!(spec.is_out_of_range(120.0));
        assert!(!spec.is_out_of_range(55.0));
        assert!(!spec.is_out_of_range(f64::NAN));
        assert!(!FieldSpec::new("x", Unit::Meter).is_out_of_range(1e9));
    }

    #[test]
    fn test_from_toml() {
        let source = r#"
            [[field]]
            name = "temperature"
            aliases = ["气温", "温度"]
            unit = "℃"
            required = true
            range = [-90.0, 60.0]

            [[field]]
            name = "pressure"
            aliases = ["气压"]
            unit = "mbar"
        "#;
        let schema = FieldSchema::from_toml_str(source).unwrap();
        assert_eq!(schema.len(), 2);
        let temperature = schema.get("temperature").unwrap();
        assert_eq!(temperature.unit, Unit::DegreeCelsius);
        assert!(temperature.required);
        assert_eq!(temperature.range, Some((-90.0, 60.0)));
        assert_eq!(schema.unit_of("pressure"), Some(Unit::Hectopascal));
        assert!(!schema.get("pressure").unwrap().required);
    }

    #[test]
    fn test_toml_round_trip() {
        let text = STATION_SCHEMA.to_toml_string().unwrap();
        let parsed = FieldSchema::from_toml_str(&text).unwrap();
        assert_eq!(parsed, *STATION_SCHEMA);
    }

    #[test]
    fn test_from_toml_rejects_duplicates() {
        let source = r#"
            [[field]]
            name = "height"
            unit = "m"

            [[field]]
            name = "height"
            unit = "km"
        "#;
        assert!(matches!(
            FieldSchema::from_toml_str(source),
            Err(CoreError::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_from_toml_rejects_unknown_unit() {
        let source = r#"
            [[field]]
            name = "height"
            unit = "furlong"
        "#;
        assert!(matches!(
            FieldSchema::from_toml_str(source),
            Err(CoreError::TomlRead(_))
        ));
    }
}
