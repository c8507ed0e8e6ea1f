//! Structured result of a dispatched computation.

use serde::{Deserialize, Serialize};
use wxcalc_core::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Computed in one vectorized call
    Success,
    /// Computed record by record; some records may carry errors
    Partial,
    Fail,
}

/// Summary statistics of a result column.
///
/// `min` and `max` are only known for vectorized results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub count: usize,
}

impl Stats {
    /// Mean, min, max and count of `values`.
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let count = values.len();
        Self {
            mean: Some(values.iter().sum::<f64>() / count as f64),
            min: values.iter().copied().reduce(f64::min),
            max: values.iter().copied().reduce(f64::max),
            count,
        }
    }

    /// Mean and count only.
    pub fn mean_of(values: &[f64]) -> Self {
        Self {
            min: None,
            max: None,
            ..Self::of(values)
        }
    }
}

/// What a computation produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationOutcome {
    pub status: Status,
    pub message: String,
    pub processed: Vec<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
    /// Column holding the principal result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_field: Option<String>,
}

impl ComputationOutcome {
    pub fn success(
        message: impl Into<String>,
        processed: Vec<Record>,
        stats: Stats,
        result_field: impl Into<String>,
    ) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            processed,
            stats: Some(stats),
            result_field: Some(result_field.into()),
        }
    }

    pub fn partial(
        message: impl Into<String>,
        processed: Vec<Record>,
        stats: Stats,
        result_field: impl Into<String>,
    ) -> Self {
        Self {
            status: Status::Partial,
            message: message.into(),
            processed,
            stats: Some(stats),
            result_field: Some(result_field.into()),
        }
    }

    /// A failure with no processed records.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: Status::Fail,
            message: message.into(),
            processed: Vec::new(),
            stats: None,
            result_field: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}
