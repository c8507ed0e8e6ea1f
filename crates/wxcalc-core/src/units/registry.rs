//! Unit registry for meteorological units.
//!
//! Every supported [`Unit`] has a row in [`UNIT_TABLE`], indexed by the enum
//! discriminant. A row carries the dimension and the affine map to SI base
//! units:
//!
//! ```text
//! si_value = value * scale + offset
//! ```
//!
//! Only temperature scales carry a non-zero offset. For example:
//! - hPa has scale 100 (1 hPa = 100 Pa)
//! - degC has scale 1 and offset 273.15 (0 degC = 273.15 K)
//!
//! The [`UNIT_REGISTRY`] maps spelled-out symbols and aliases (`"hPa"`, `"mbar"`,
//! `"℃"`, `"m/s"`) onto the enum.

use super::conversion::Unit;
use super::dimension::Dimension;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Information about a known unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitInfo {
    /// Canonical symbol, used for display.
    pub symbol: &'static str,
    /// The physical dimension of this unit.
    pub dimension: Dimension,
    /// Multiplier to SI base units.
    pub scale: f64,
    /// Additive offset to SI base units, applied after scaling.
    pub offset: f64,
}

impl UnitInfo {
    const fn linear(symbol: &'static str, dimension: Dimension, scale: f64) -> Self {
        Self {
            symbol,
            dimension,
            scale,
            offset: 0.0,
        }
    }

    const fn affine(symbol: &'static str, dimension: Dimension, scale: f64, offset: f64) -> Self {
        Self {
            symbol,
            dimension,
            scale,
            offset,
        }
    }
}

/// Kelvin value of 0 degC.
pub const ZERO_CELSIUS_K: f64 = 273.15;

/// Metres per second in one knot.
pub const KNOT_M_S: f64 = 1852.0 / 3600.0;

/// Unit rows, in the same order as the [`Unit`] discriminants.
pub static UNIT_TABLE: [UnitInfo; Unit::COUNT] = [
    // Temperature
    UnitInfo::linear("K", Dimension::TEMPERATURE, 1.0),
    UnitInfo::affine("degC", Dimension::TEMPERATURE, 1.0, ZERO_CELSIUS_K),
    UnitInfo::affine(
        "degF",
        Dimension::TEMPERATURE,
        5.0 / 9.0,
        ZERO_CELSIUS_K - 32.0 * 5.0 / 9.0,
    ),
    // Ratios
    UnitInfo::linear("percent", Dimension::dimensionless(), 0.01),
    UnitInfo::linear("dimensionless", Dimension::dimensionless(), 1.0),
    UnitInfo::linear("kg/kg", Dimension::dimensionless(), 1.0),
    UnitInfo::linear("g/kg", Dimension::dimensionless(), 1e-3),
    // Pressure
    UnitInfo::linear("Pa", Dimension::PRESSURE, 1.0),
    UnitInfo::linear("hPa", Dimension::PRESSURE, 100.0),
    UnitInfo::linear("kPa", Dimension::PRESSURE, 1000.0),
    // Length
    UnitInfo::linear("m", Dimension::LENGTH, 1.0),
    UnitInfo::linear("km", Dimension::LENGTH, 1000.0),
    // Velocity
    UnitInfo::linear("m/s", Dimension::VELOCITY, 1.0),
    UnitInfo::linear("km/h", Dimension::VELOCITY, 1.0 / 3.6),
    UnitInfo::linear("knot", Dimension::VELOCITY, KNOT_M_S),
    // Angle
    UnitInfo::linear("degree", Dimension::dimensionless(), std::f64::consts::PI / 180.0),
    UnitInfo::linear("radian", Dimension::dimensionless(), 1.0),
    // Energy per mass
    UnitInfo::linear("J/kg", Dimension::SPECIFIC_ENERGY, 1.0),
    UnitInfo::linear("m^2/s^2", Dimension::SPECIFIC_ENERGY, 1.0),
    // Rates
    UnitInfo::linear("1/s", Dimension::FREQUENCY, 1.0),
    UnitInfo::linear("K/s", Dimension::TEMPERATURE_RATE, 1.0),
    // Density
    UnitInfo::linear("kg/m^3", Dimension::DENSITY, 1.0),
];

/// The global unit registry.
pub static UNIT_REGISTRY: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

/// Lookup table from unit spellings to [`Unit`].
#[derive(Debug)]
pub struct UnitRegistry {
    /// Map from exact spelling (after whitespace removal) to unit.
    exact: HashMap<&'static str, Unit>,
    /// Map from lower-cased spelling to unit, used when the exact lookup misses.
    folded: HashMap<String, Unit>,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitRegistry {
    /// Creates a new registry populated with every unit symbol and its aliases.
    pub fn new() -> Self {
        let mut registry = Self {
            exact: HashMap::new(),
            folded: HashMap::new(),
        };
        for unit in Unit::ALL {
            registry.insert(unit.info().symbol, unit);
        }
        registry.register_temperature_aliases();
        registry.register_ratio_aliases();
        registry.register_pressure_aliases();
        registry.register_length_aliases();
        registry.register_velocity_aliases();
        registry.register_angle_aliases();
        registry.register_rate_aliases();
        registry
    }

    /// Looks up a unit spelling.
    ///
    /// Whitespace is ignored and `**` is read as `^`. Exact spellings win over
    /// case-folded ones.
    pub fn lookup(&self, spelling: &str) -> Option<Unit> {
        let compact: String = spelling.chars().filter(|c| !c.is_whitespace()).collect();
        let compact = compact.replace("**", "^");
        if let Some(unit) = self.exact.get(compact.as_str()) {
            return Some(*unit);
        }
        self.folded.get(&compact.to_lowercase()).copied()
    }

    fn insert(&mut self, spelling: &'static str, unit: Unit) {
        self.exact.insert(spelling, unit);
        self.folded.entry(spelling.to_lowercase()).or_insert(unit);
    }

    fn register_temperature_aliases(&mut self) {
        for alias in ["kelvin", "degK"] {
            self.insert(alias, Unit::Kelvin);
        }
        for alias in ["celsius", "degree_Celsius", "deg_C", "°C", "℃", "C"] {
            self.insert(alias, Unit::DegreeCelsius);
        }
        for alias in ["fahrenheit", "degree_Fahrenheit", "deg_F", "°F", "℉", "F"] {
            self.insert(alias, Unit::DegreeFahrenheit);
        }
    }

    fn register_ratio_aliases(&mut self) {
        self.insert("%", Unit::Percent);
        for alias in ["1", "fraction"] {
            self.insert(alias, Unit::Dimensionless);
        }
        self.insert("kgkg^-1", Unit::KilogramPerKilogram);
        self.insert("gkg^-1", Unit::GramPerKilogram);
    }

    fn register_pressure_aliases(&mut self) {
        for alias in ["pascal", "pascals"] {
            self.insert(alias, Unit::Pascal);
        }
        for alias in ["hectopascal", "hectopascals", "mbar", "mb", "millibar"] {
            self.insert(alias, Unit::Hectopascal);
        }
        self.insert("kilopascal", Unit::Kilopascal);
    }

    fn register_length_aliases(&mut self) {
        for alias in ["meter", "meters", "metre", "metres", "gpm"] {
            self.insert(alias, Unit::Meter);
        }
        for alias in ["kilometer", "kilometers", "kilometre", "kilometres"] {
            self.insert(alias, Unit::Kilometer);
        }
    }

    fn register_velocity_aliases(&mut self) {
        for alias in ["ms^-1", "m/sec", "meter/second", "mps"] {
            self.insert(alias, Unit::MeterPerSecond);
        }
        for alias in ["kmh^-1", "kph", "km/hr"] {
            self.insert(alias, Unit::KilometerPerHour);
        }
        for alias in ["knots", "kt", "kts", "kn"] {
            self.insert(alias, Unit::Knot);
        }
    }

    fn register_angle_aliases(&mut self) {
        for alias in ["degrees", "deg", "°"] {
            self.insert(alias, Unit::Degree);
        }
        for alias in ["radians", "rad"] {
            self.insert(alias, Unit::Radian);
        }
    }

    fn register_rate_aliases(&mut self) {
        self.insert("Jkg^-1", Unit::JoulePerKilogram);
        self.insert("m^2s^-2", Unit::MeterSquaredPerSecondSquared);
        for alias in ["s^-1", "/s", "hertz", "Hz"] {
            self.insert(alias, Unit::PerSecond);
        }
        self.insert("Ks^-1", Unit::KelvinPerSecond);
        self.insert("kgm^-3", Unit::KilogramPerCubicMeter);
    }
}
