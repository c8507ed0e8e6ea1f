//! Entry point: run a named calculation over a batch of records.
//!
//! # Steps
//!
//! 1. Resolve the dataset's columns to canonical fields and read them as
//!    unit-tagged quantities.
//!
//! 2. Call the calculation once over whole columns, after deriving any
//!    missing inputs that can be derived.
//!
//! 3. If that call fails, retry record by record. The outcome is then
//!    `partial` even when every record succeeds.
//!
//! 4. Write results back as new columns and summarise them.

use crate::errors::InvokeError;
use crate::fallback::{run_row_wise, RowContext};
use crate::invoke::{call_vectorized, ExtraArgs};
use crate::outcome::ComputationOutcome;
use crate::settings::DispatchSettings;
use crate::writer::{summarize, write_result};
use log::warn;
use std::sync::LazyLock;
use wxcalc_core::normalize::normalize_units;
use wxcalc_core::resolver::{build_column_map, dataset_columns};
use wxcalc_core::schema::{FieldSchema, STATION_SCHEMA};
use wxcalc_core::Record;
use wxcalc_thermo::{lookup, CalcOutput};

static DEFAULT_DISPATCHER: LazyLock<Dispatcher> = LazyLock::new(Dispatcher::new);

/// Runs `name` over `records` with the station schema and default settings.
pub fn compute(records: &[Record], name: &str, extra: Option<&ExtraArgs>) -> ComputationOutcome {
    DEFAULT_DISPATCHER.compute(records, name, extra)
}

/// Dispatches calculations with a given schema and settings.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    schema: FieldSchema,
    settings: DispatchSettings,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// A dispatcher using the station schema and default settings.
    pub fn new() -> Self {
        Self {
            schema: STATION_SCHEMA.clone(),
            settings: DispatchSettings::default(),
        }
    }

    pub fn with_schema(&mut self, schema: FieldSchema) -> &mut Self {
        self.schema = schema;
        self
    }

    pub fn with_settings(&mut self, settings: DispatchSettings) -> &mut Self {
        self.settings = settings;
        self
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Runs `name` over `records`, writing results to `<name>_result`.
    pub fn compute(
        &self,
        records: &[Record],
        name: &str,
        extra: Option<&ExtraArgs>,
    ) -> ComputationOutcome {
        self.compute_into(records, name, extra, None)
    }

    /// Like [`Dispatcher::compute`], with an optional name for the result
    /// column of a single-valued vectorized result.
    ///
    /// Two-valued calculations always write `<output>_result` for each
    /// output, and per-record results always go to `<name>_result`.
    pub fn compute_into(
        &self,
        records: &[Record],
        name: &str,
        extra: Option<&ExtraArgs>,
        out_column: Option<&str>,
    ) -> ComputationOutcome {
        if records.is_empty() {
            return ComputationOutcome::fail("no records to process");
        }
        let Some(function) = lookup(name) else {
            return ComputationOutcome::fail(format!("unknown function '{name}'"));
        };
        let no_extra = ExtraArgs::new();
        let extra = extra.unwrap_or(&no_extra);

        let columns = dataset_columns(records);
        let column_map = build_column_map(&columns, &self.schema);
        let normalized = normalize_units(
            records,
            &column_map,
            &self.schema,
            self.settings.range_warning_fraction,
        );
        let mut quantities = normalized.quantities;

        match call_vectorized(name, &mut quantities, extra, &self.schema) {
            Ok(CalcOutput::Single(result)) => {
                let column = out_column.map_or_else(|| format!("{name}_result"), str::to_string);
                let processed = write_result(&result, records, &column);
                let stats = summarize(&processed, &column);
                ComputationOutcome::success(format!("{name} computed"), processed, stats, column)
            }
            Ok(CalcOutput::Pair(first, second)) => {
                let columns: Vec<String> = function
                    .outputs
                    .iter()
                    .map(|output| format!("{output}_result"))
                    .collect();
                let processed = write_result(&first, records, &columns[0]);
                let processed = write_result(&second, &processed, &columns[1]);
                let stats = summarize(&processed, &columns[0]);
                ComputationOutcome::success(
                    format!("{name} computed"),
                    processed,
                    stats,
                    columns[0].clone(),
                )
            }
            Err(InvokeError::UnknownFunction(name)) => {
                ComputationOutcome::fail(format!("unknown function '{name}'"))
            }
            Err(e) => {
                warn!("falling back to per-record computation of {name}: {e}");
                let context = RowContext {
                    column_map: &column_map,
                    schema: &self.schema,
                    extra,
                    settings: &self.settings,
                };
                let rows = run_row_wise(function, records, &context);
                ComputationOutcome::partial(
                    format!(
                        "vectorized call failed, computed per record ({} of {} failed): {e}",
                        rows.errors,
                        records.len()
                    ),
                    rows.processed,
                    rows.stats,
                    format!("{name}_result"),
                )
            }
        }
    }
}
