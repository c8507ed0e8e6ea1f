//! Units, quantities and column resolution for weather-station records.
//!
//! Raw records arrive with arbitrary, often Chinese-language, column names.
//! This crate maps those columns onto canonical physical fields via a
//! [`schema::FieldSchema`], and turns the raw values into unit-tagged
//! [`quantity::Quantity`] arrays ready for the calculation library.

pub mod errors;
pub mod normalize;
pub mod quantity;
pub mod record;
pub mod resolver;
pub mod schema;
pub mod units;

pub use errors::{CoreError, CoreResult};
pub use quantity::Quantity;
pub use record::Record;
pub use units::Unit;
