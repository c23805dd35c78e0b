//! Concurrent Stress Workload
//!
//! Drives interleaved put/get/delete traffic from many threads against one
//! shared store and checks that no thread ever loses its own writes.

use crossbeam::channel;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::metrics::{Metrics, Op};
use crate::storage::Store;

/// Largest per-thread key space a worker will track
pub const MAX_KEY_SPACE: u64 = 1 << 20;

/// Stress run parameters
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Worker threads (0 = one per CPU)
    pub threads: usize,
    /// Put/get/delete cycles per thread
    pub ops_per_thread: u64,
    /// Distinct keys owned by each thread
    pub key_space: u64,
    /// TTL for written values (zero = permanent)
    pub ttl: Duration,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            ops_per_thread: 10_000,
            key_space: 64,
            ttl: Duration::ZERO,
        }
    }
}

impl StressConfig {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_ops_per_thread(mut self, ops: u64) -> Self {
        self.ops_per_thread = ops;
        self
    }

    pub fn with_key_space(mut self, keys: u64) -> Self {
        self.key_space = keys.clamp(1, MAX_KEY_SPACE);
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Keys a worker actually cycles through; never more than it can write
    fn effective_key_space(&self) -> u64 {
        self.key_space
            .clamp(1, MAX_KEY_SPACE)
            .min(self.ops_per_thread.max(1))
    }

    fn worker_count(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}

/// Per-thread outcome sent back to the driver
#[derive(Debug)]
struct WorkerReport {
    worker: usize,
    ops: u64,
    violations: u64,
    live_keys: u64,
}

/// Aggregated outcome of a stress run
#[derive(Debug, Clone)]
pub struct StressReport {
    pub threads: usize,
    pub ops: u64,
    /// Reads that did not observe the thread's own latest write
    pub violations: u64,
    /// Workers that died before reporting
    pub panicked: usize,
    /// Keys each worker expected to remain, summed
    pub expected_len: u64,
    /// Entries actually left in the store
    pub final_len: usize,
    pub elapsed: Duration,
}

impl StressReport {
    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.ops as f64 / secs
    }

    /// Every worker finished, with no violations and no lost or phantom entries
    pub fn is_consistent(&self) -> bool {
        self.panicked == 0
            && self.violations == 0
            && self.expected_len == self.final_len as u64
    }

    pub fn report(&self) -> String {
        format!(
            "Threads: {} ({} panicked), Ops: {}, Ops/sec: {:.0}, Violations: {}, Entries: {}/{}",
            self.threads,
            self.panicked,
            self.ops,
            self.ops_per_sec(),
            self.violations,
            self.final_len,
            self.expected_len
        )
    }
}

/// Run the workload. Each worker only touches keys prefixed with its own
/// id, so every read has exactly one valid answer.
///
/// Entry counts are only checked when `ttl` is zero; with expiring values
/// the remaining population depends on timing.
pub fn run(store: &Store<u64>, config: &StressConfig, metrics: &Arc<Metrics>) -> StressReport {
    let threads = config.worker_count();
    let key_space = config.effective_key_space();
    let (tx, rx) = channel::unbounded::<WorkerReport>();

    info!(
        threads = threads,
        ops_per_thread = config.ops_per_thread,
        key_space = key_space,
        ttl_ms = config.ttl.as_millis() as u64,
        "Starting stress run"
    );

    let start = Instant::now();
    let handles: Vec<_> = (0..threads)
        .map(|worker| {
            let store = store.clone();
            let metrics = Arc::clone(metrics);
            let tx = tx.clone();
            let ops = config.ops_per_thread;
            let ttl = config.ttl;
            thread::spawn(move || {
                let report = work(worker, &store, &metrics, ops, key_space, ttl);
                // Receiver outlives every worker
                let _ = tx.send(report);
            })
        })
        .collect();
    drop(tx);

    let mut ops = 0;
    let mut violations = 0;
    let mut expected_len = 0;
    for report in rx.iter() {
        debug!(
            worker = report.worker,
            ops = report.ops,
            violations = report.violations,
            "Worker finished"
        );
        ops += report.ops;
        violations += report.violations;
        expected_len += report.live_keys;
    }

    let mut panicked = 0;
    for handle in handles {
        if handle.join().is_err() {
            panicked += 1;
            warn!("Stress worker panicked");
        }
    }
    let elapsed = start.elapsed();

    if !config.ttl.is_zero() {
        store.purge_expired();
    }
    let final_len = store.len();
    // Population of an expiring run depends on timing
    if !config.ttl.is_zero() {
        expected_len = final_len as u64;
    }

    StressReport {
        threads,
        ops,
        violations,
        panicked,
        expected_len,
        final_len,
        elapsed,
    }
}

fn work(
    worker: usize,
    store: &Store<u64>,
    metrics: &Metrics,
    ops: u64,
    key_space: u64,
    ttl: Duration,
) -> WorkerReport {
    let mut live = vec![false; key_space as usize];
    let mut violations = 0;
    let mut done = 0;

    for n in 0..ops {
        let slot = n % key_space;
        let key = format!("t{}-k{}", worker, slot);

        let t = Instant::now();
        store.put(key.as_str(), n, ttl);
        metrics.record(Op::Put, t.elapsed());

        let t = Instant::now();
        let read = store.get(&key);
        metrics.record(Op::Get, t.elapsed());
        // An expiring value may legitimately be gone already
        if read != Some(n) && (ttl.is_zero() || read.is_some()) {
            violations += 1;
        }
        done += 2;

        if n % 3 == 0 {
            let t = Instant::now();
            store.delete(&key);
            metrics.record(Op::Delete, t.elapsed());
            if store.get(&key).is_some() {
                violations += 1;
            }
            live[slot as usize] = false;
            done += 2;
        } else {
            live[slot as usize] = true;
        }
    }

    WorkerReport {
        worker,
        ops: done,
        violations,
        live_keys: live.iter().filter(|l| **l).count() as u64,
    }
}
