//! Unit parsing, lookup, and conversion for station weather variables.
//!
//! Units are a closed set ([`Unit`]) backed by an enum-indexed table of
//! dimensions and affine SI conversions. Spellings found in data files and
//! configuration (`"hPa"`, `"℃"`, `"m s^-1"`, `"%"`) are resolved through the
//! [`UNIT_REGISTRY`].
//!
//! # Quick Start
//!
//! ```
//! use wxcalc_core::units::Unit;
//!
//! let hpa = Unit::parse("mbar").unwrap();
//! assert_eq!(hpa, Unit::Hectopascal);
//!
//! // Compatible units share a dimension
//! assert!(hpa.is_compatible(Unit::Pascal));
//! assert!(!hpa.is_compatible(Unit::Meter));
//!
//! // Temperature conversions are affine
//! let c = Unit::Kelvin.convert(273.15, Unit::DegreeCelsius).unwrap();
//! assert!(c.abs() < 1e-12);
//! ```
//!
//! # Supported Units
//!
//! | Quantity | Units |
//! |----------|-------|
//! | Temperature | `K`, `degC`, `degF` |
//! | Ratio | `percent`, `dimensionless`, `kg/kg`, `g/kg` |
//! | Pressure | `Pa`, `hPa`, `kPa` |
//! | Length | `m`, `km` |
//! | Velocity | `m/s`, `km/h`, `knot` |
//! | Angle | `degree`, `radian` |
//! | Specific energy | `J/kg`, `m^2/s^2` |
//! | Rates | `1/s`, `K/s` |
//! | Density | `kg/m^3` |
//!
//! # Module Structure
//!
//! - [`dimension`]: Physical dimension types (M, L, T, Θ)
//! - [`registry`]: Unit table and spelling aliases
//! - [`parser`]: Quantity string parsing
//! - [`conversion`]: The [`Unit`] type and conversion API

pub mod conversion;
pub mod dimension;
pub mod parser;
pub mod registry;

pub use conversion::{ConversionError, Unit};
pub use dimension::Dimension;
pub use parser::{parse_quantity, ParseError};
pub use registry::{UnitInfo, UnitRegistry, UNIT_REGISTRY};
