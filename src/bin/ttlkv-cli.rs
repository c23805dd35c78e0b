//! TTLKV CLI
//!
//! Interactive shell over an in-process store.

use bytes::Bytes;
use clap::Parser;
use std::io::{self, BufRead, Write};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use ttlkv::{Command, Store, StoreConfig};

/// TTLKV CLI - Interactive In-Process Store
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Entries to preallocate
    #[arg(long, default_value_t = 0)]
    capacity: usize,

    /// Do not print the prompt (for piped input)
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ttlkv=info".parse()?))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let store: Store<Bytes> =
        Store::with_config(StoreConfig::new().with_initial_capacity(args.capacity));

    info!(capacity = args.capacity, "Store ready");
    if !args.quiet {
        println!("Type 'help' for available commands, 'quit' to exit.\n");
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if !args.quiet {
            print!("ttlkv> ");
            io::stdout().flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            break;
        }

        if input.eq_ignore_ascii_case("help") {
            print_help();
            continue;
        }

        match input.parse::<Command>() {
            Ok(cmd) => println!("{}", cmd.execute(&store)),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    info!(stats = %store.stats(), "Session closed");
    Ok(())
}

fn print_help() {
    println!(
        r#"
Available commands:

  PUT <key> <value> [ttl_ms] - Store a value; ttl <= 0 or omitted never expires
  GET <key>         - Get value for key
  DEL <key>         - Delete a key
  EXISTS <key>      - Check if key exists
  TTL <key>         - Remaining ms (-1 = no expiry, -2 = missing)
  KEYS              - List live keys
  LEN               - Stored entries, including expired ones not yet removed
  PURGE             - Remove all expired entries now
  CLEAR             - Remove everything
  STATS             - Hit/miss/expiry counters

  help              - Show this help
  quit / exit       - Exit the CLI

Examples:
  PUT mykey myvalue
  PUT tempkey value 5000   (expires in 5 seconds)
  GET mykey
  TTL tempkey
"#
    );
}
