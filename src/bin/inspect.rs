//! contractkv Inspect Binary
//!
//! Looks inside a `MemoryStore` snapshot file.

use std::process;

use clap::{Parser, Subcommand};
use contractkv::types::hex::{from_hex, to_hex};
use contractkv::{Config, HostStore, MemoryStore};
use tracing_subscriber::{fmt, EnvFilter};

/// contractkv snapshot inspector
#[derive(Parser, Debug)]
#[command(name = "contractkv-inspect")]
#[command(about = "Inspect and edit contractkv store snapshots")]
#[command(version)]
struct Args {
    /// Snapshot file
    #[arg(short, long, default_value = "./contract_state.ckvs")]
    snapshot: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Entry count and total size
    Stats,

    /// List every key with its value length
    Keys,

    /// Print the value under a key
    Get {
        /// The raw key, in hex
        key: String,
    },

    /// Delete a key and rewrite the snapshot
    Del {
        /// The raw key, in hex
        key: String,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,contractkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("contractkv inspect v{}", contractkv::VERSION);
    tracing::info!("Snapshot: {}", args.snapshot);

    let config = Config::builder().snapshot_path(&args.snapshot).build();
    let store = match MemoryStore::open(config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open snapshot: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&store, args.command) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}

fn run(store: &MemoryStore, command: Commands) -> contractkv::Result<()> {
    match command {
        Commands::Stats => {
            println!("entries: {}", store.len());
            println!("bytes:   {}", store.total_bytes());
        }

        Commands::Keys => {
            for key in store.keys() {
                let len = store.raw_get(&key).map_or(0, |v| v.len());
                println!("{}  {:<32}  {} bytes", to_hex(&key), preview(&key), len);
            }
        }

        Commands::Get { key } => {
            let key = from_hex(&key)?;
            match store.raw_get(&key) {
                Some(value) => println!("{}", to_hex(&value)),
                None => {
                    println!("(not found)");
                    process::exit(2);
                }
            }
        }

        Commands::Del { key } => {
            let key = from_hex(&key)?;
            if store.raw_get(&key).is_none() {
                println!("(not found)");
                return Ok(());
            }
            store.put(&key, &[]);
            store.persist()?;
            println!("deleted");
        }
    }
    Ok(())
}

/// Printable ASCII rendering of a key, dots for everything else
fn preview(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        })
        .collect()
}
