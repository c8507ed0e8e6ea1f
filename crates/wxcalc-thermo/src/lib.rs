//! Unit-aware meteorological calculations.
//!
//! Every function accepts [`wxcalc_core::Quantity`] arguments in any unit of
//! the right dimension, converts them internally and returns results in SI or
//! conventional meteorological units (K, hPa, kg/kg, m/s). Length-1 arguments
//! broadcast against longer ones.
//!
//! Calculations are also reachable by name through [`registry::CALC_REGISTRY`],
//! which the dispatch layer uses to map tool names onto functions.

pub mod atmosphere;
pub mod constants;
mod elementwise;
pub mod errors;
pub mod function;
pub mod indices;
pub mod kinematics;
pub mod moisture;
pub mod parcel;
pub mod registry;
pub mod thermodynamics;
pub mod wind;

pub use errors::{CalcError, CalcResult};
pub use function::{Args, CalcFunction, CalcOutput, Param};
pub use registry::{lookup, CALC_REGISTRY};
