//! Shell Metrics
//!
//! Per-command counters and latency tracking.

use std::collections::HashMap;
use std::time::Duration;

/// Metrics collector for one shell session
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total commands executed
    total_ops: u64,

    /// Commands per verb
    ops_by_command: HashMap<&'static str, u64>,

    latency_sum_us: u64,
    latency_min_us: u64,
    latency_max_us: u64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self {
            total_ops: 0,
            ops_by_command: HashMap::new(),
            latency_sum_us: 0,
            latency_min_us: u64::MAX,
            latency_max_us: 0,
        }
    }

    /// Record one executed command
    pub fn record_operation(&mut self, command: &'static str, latency: Duration) {
        self.total_ops += 1;
        *self.ops_by_command.entry(command).or_insert(0) += 1;

        let latency_us = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        self.latency_sum_us = self.latency_sum_us.saturating_add(latency_us);
        self.latency_min_us = self.latency_min_us.min(latency_us);
        self.latency_max_us = self.latency_max_us.max(latency_us);
    }

    /// Get total operations count
    pub fn total_ops(&self) -> u64 {
        self.total_ops
    }

    /// Get operations by command, sorted by command name
    pub fn ops_by_command(&self) -> Vec<(&'static str, u64)> {
        let mut ops: Vec<_> = self.ops_by_command.iter().map(|(k, v)| (*k, *v)).collect();
        ops.sort_unstable();
        ops
    }

    /// Get average latency in microseconds
    pub fn avg_latency_us(&self) -> f64 {
        if self.total_ops == 0 {
            return 0.0;
        }
        self.latency_sum_us as f64 / self.total_ops as f64
    }

    /// Get min latency in microseconds
    pub fn min_latency_us(&self) -> u64 {
        if self.latency_min_us == u64::MAX {
            0
        } else {
            self.latency_min_us
        }
    }

    /// Get max latency in microseconds
    pub fn max_latency_us(&self) -> u64 {
        self.latency_max_us
    }

    /// Get a summary of metrics
    pub fn summary(&self) -> String {
        format!(
            "Operations: {} | Latency (µs): avg={:.1}, min={}, max={}",
            self.total_ops(),
            self.avg_latency_us(),
            self.min_latency_us(),
            self.max_latency_us()
        )
    }
}
