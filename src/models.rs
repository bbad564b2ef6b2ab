// Sample series and aggregate record models

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Timestamp format written into every aggregate record (UTC, no zone suffix).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Ordered CPU utilization readings, in percent. Collected once per run and
/// immutable afterwards; both the exact and the noised mean are computed from
/// the same series.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSeries(Vec<f64>);

impl SampleSeries {
    pub fn new(samples: Vec<f64>) -> Self {
        Self(samples)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One persisted aggregate: a CPU mean (exact or noised) plus the moment it
/// was recorded. Wire keys are exactly `cpu` and `timestamp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateRecord {
    pub cpu: f64,
    pub timestamp: String,
}

impl AggregateRecord {
    /// Build a record stamped with the current UTC time.
    pub fn new(cpu: f64) -> Self {
        Self {
            cpu,
            timestamp: Utc::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
