//! TTLKV Stress Binary
//!
//! Hammers one shared store from many threads and verifies consistency.

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use ttlkv::storage::ttl_from_millis;
use ttlkv::{stress, Metrics, Store, StressConfig};

/// TTLKV Stress - Concurrent Put/Get/Delete Workload
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Worker threads (0 = auto-detect based on CPU cores)
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// Put/get/delete cycles per thread
    #[arg(short, long, default_value_t = 100_000)]
    ops: u64,

    /// Distinct keys per thread
    #[arg(short, long, default_value_t = 1024)]
    keys: u64,

    /// TTL for written values in milliseconds (<= 0 = never expires)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    ttl_ms: i64,
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ttlkv=info".parse()?))
        .init();

    let args = Args::parse();
    let config = StressConfig::default()
        .with_threads(args.threads)
        .with_ops_per_thread(args.ops)
        .with_key_space(args.keys)
        .with_ttl(ttl_from_millis(args.ttl_ms));

    let store = Store::new();
    let metrics = Arc::new(Metrics::new());
    let report = stress::run(&store, &config, &metrics);

    info!("{}", report.report());
    info!("{}", metrics.summary());
    info!(stats = %store.stats(), "Store counters");

    if !report.is_consistent() {
        error!(
            violations = report.violations,
            expected = report.expected_len,
            actual = report.final_len,
            "Store lost or corrupted updates"
        );
        anyhow::bail!("stress run failed consistency checks");
    }

    Ok(())
}
