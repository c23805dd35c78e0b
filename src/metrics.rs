//! Operation Metrics
//!
//! Per-operation counters and latency tracking for store workloads.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Store operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Put,
    Get,
    Delete,
}

impl Op {
    const ALL: [Op; 3] = [Op::Put, Op::Get, Op::Delete];

    fn index(self) -> usize {
        match self {
            Op::Put => 0,
            Op::Get => 1,
            Op::Delete => 2,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Put => write!(f, "PUT"),
            Op::Get => write!(f, "GET"),
            Op::Delete => write!(f, "DEL"),
        }
    }
}

/// Metrics collector, safe to share between threads
#[derive(Debug)]
pub struct Metrics {
    ops: [AtomicU64; 3],

    /// Latency tracking (simplified)
    latency_sum_ns: AtomicU64,
    latency_min_ns: AtomicU64,
    latency_max_ns: AtomicU64,
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
            ops: Default::default(),
            latency_sum_ns: AtomicU64::new(0),
            latency_min_ns: AtomicU64::new(u64::MAX),
            latency_max_ns: AtomicU64::new(0),
        }
    }

    /// Record an operation
    pub fn record(&self, op: Op, latency: Duration) {
        self.ops[op.index()].fetch_add(1, Ordering::Relaxed);

        let ns = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.latency_sum_ns.fetch_add(ns, Ordering::Relaxed);
        self.latency_min_ns.fetch_min(ns, Ordering::Relaxed);
        self.latency_max_ns.fetch_max(ns, Ordering::Relaxed);
    }

    /// Get the count for one operation kind
    pub fn ops(&self, op: Op) -> u64 {
        self.ops[op.index()].load(Ordering::Relaxed)
    }

    /// Get total operations count
    pub fn total_ops(&self) -> u64 {
        Op::ALL.iter().map(|op| self.ops(*op)).sum()
    }

    /// Get average latency
    pub fn avg_latency(&self) -> Duration {
        let count = self.total_ops();
        if count == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.latency_sum_ns.load(Ordering::Relaxed) / count)
    }

    /// Get min latency
    pub fn min_latency(&self) -> Duration {
        match self.latency_min_ns.load(Ordering::Relaxed) {
            u64::MAX => Duration::ZERO,
            min => Duration::from_nanos(min),
        }
    }

    /// Get max latency
    pub fn max_latency(&self) -> Duration {
        Duration::from_nanos(self.latency_max_ns.load(Ordering::Relaxed))
    }

    /// Get a summary of metrics
    pub fn summary(&self) -> String {
        format!(
            "Operations: {} (PUT={} GET={} DEL={}) | Latency (ns): avg={}, min={}, max={}",
            self.total_ops(),
            self.ops(Op::Put),
            self.ops(Op::Get),
            self.ops(Op::Delete),
            self.avg_latency().as_nanos(),
            self.min_latency().as_nanos(),
            self.max_latency().as_nanos()
        )
    }
}
