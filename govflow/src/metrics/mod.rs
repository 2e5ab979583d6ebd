//! Process-local counters and timing samples.
//!
//! A metric name is bound to one shape (counter or timing) by its first
//! recording. The engine only writes fixed key patterns, so the shapes never
//! collide in practice; mixing them on one key is a caller bug and is
//! reported with a `tracing` warning while the sample is dropped.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A single accumulated metric.
#[derive(Debug, Clone, PartialEq)]
enum Metric {
    Counter(i64),
    Timing(Vec<f64>),
}

/// Point-in-time description of one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetricSnapshot {
    /// Accumulated counter value.
    Counter {
        /// Current value.
        value: i64,
    },
    /// Ordered duration samples.
    Timing {
        /// Number of samples.
        count: usize,
        /// Arithmetic mean of the samples (0 when empty).
        #[serde(rename = "averageMs")]
        average_ms: f64,
        /// Samples in recording order.
        values: Vec<f64>,
    },
}

impl MetricSnapshot {
    fn of(metric: &Metric) -> Self {
        match metric {
            Metric::Counter(value) => Self::Counter { value: *value },
            Metric::Timing(values) => {
                let average_ms = if values.is_empty() {
                    0.0
                } else {
                    values.iter().sum::<f64>() / values.len() as f64
                };
                Self::Timing {
                    count: values.len(),
                    average_ms,
                    values: values.clone(),
                }
            }
        }
    }
}

/// Snapshot of every metric, ordered by name.
pub type MetricsSnapshot = BTreeMap<String, MetricSnapshot>;

/// Accumulates counters and timings keyed by operation name.
///
/// Safe to share between concurrent runs; every recording takes the same
/// lock so a snapshot never observes a half-applied update.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    metrics: Mutex<HashMap<String, Metric>>,
}

impl MetricsCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `increment` to the counter `name`, creating it if needed.
    pub fn record_counter(&self, name: &str, increment: i64) {
        let mut metrics = self.metrics.lock();
        match metrics.get_mut(name) {
            Some(Metric::Counter(value)) => *value += increment,
            Some(Metric::Timing(_)) => {
                tracing::warn!(metric = name, "Counter recorded against a timing metric");
            }
            None => {
                metrics.insert(name.to_string(), Metric::Counter(increment));
            }
        }
    }

    /// Increments the counter `name` by one.
    pub fn increment(&self, name: &str) {
        self.record_counter(name, 1);
    }

    /// Appends a duration sample to the timing `name`, creating it if needed.
    pub fn record_timing(&self, name: &str, duration_ms: f64) {
        let mut metrics = self.metrics.lock();
        match metrics.get_mut(name) {
            Some(Metric::Timing(values)) => values.push(duration_ms),
            Some(Metric::Counter(_)) => {
                tracing::warn!(metric = name, "Timing recorded against a counter metric");
            }
            None => {
                metrics.insert(name.to_string(), Metric::Timing(vec![duration_ms]));
            }
        }
    }

    /// Returns a copy of every metric's current state.
    ///
    /// The snapshot owns its data; later recordings do not alter it.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.metrics
            .lock()
            .iter()
            .map(|(name, metric)| (name.clone(), MetricSnapshot::of(metric)))
            .collect()
    }

    /// Current value of a counter, if `name` is a counter.
    #[must_use]
    pub fn counter(&self, name: &str) -> Option<i64> {
        match self.metrics.lock().get(name) {
            Some(Metric::Counter(value)) => Some(*value),
            _ => None,
        }
    }

    /// Number of samples of a timing, if `name` is a timing.
    #[must_use]
    pub fn timing_count(&self, name: &str) -> Option<usize> {
        match self.metrics.lock().get(name) {
            Some(Metric::Timing(values)) => Some(values.len()),
            _ => None,
        }
    }

    /// Number of distinct metric names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.metrics.lock().len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.lock().is_empty()
    }

    /// Drops every metric.
    pub fn reset(&self) {
        self.metrics.lock().clear();
    }
}

/// Timing key for a stage's duration.
#[must_use]
pub fn stage_duration_key(stage_id: &str) -> String {
    format!("stage.{stage_id}.duration")
}
