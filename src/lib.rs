//! Unit-aware dispatch of meteorological calculations over station records.
//!
//! Records arrive as loosely named JSON rows, often with Chinese column
//! headers. [`compute`] resolves their columns to physical fields, attaches
//! units, derives missing inputs, runs the named calculation over whole
//! columns and falls back to one record at a time when that fails. The result
//! is always a [`ComputationOutcome`], never a panic or an error.
//!
//! ```no_run
//! use serde_json::json;
//!
//! let records: Vec<wxcalc::Record> = json!([
//!     {"温度": 25, "相对湿度": 70},
//!     {"温度": 30, "相对湿度": 80},
//! ])
//! .as_array()
//! .unwrap()
//! .iter()
//! .map(|r| r.as_object().unwrap().clone())
//! .collect();
//!
//! let outcome = wxcalc::compute(&records, "dewpoint", None);
//! println!("{:?}", outcome.stats);
//! ```

pub mod catalog;
pub mod derive;
pub mod dispatch;
pub mod errors;
pub mod fallback;
pub mod invoke;
pub mod outcome;
pub mod settings;
pub mod writer;

pub use catalog::{generate_all_tools, tools_description, Catalog, Tool};
pub use dispatch::{compute, Dispatcher};
pub use errors::{InvokeError, SettingsError};
pub use invoke::ExtraArgs;
pub use outcome::{ComputationOutcome, Stats, Status};
pub use settings::DispatchSettings;
pub use wxcalc_core::Record;
