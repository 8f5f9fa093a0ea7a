//! regionkv CLI Client
//!
//! Command-line interface for poking a running region store.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use regionkv::{StoreAdapter, StoreConfig};

/// regionkv CLI
#[derive(Parser, Debug)]
#[command(name = "regionkv-cli")]
#[command(about = "CLI for the regionkv store adapter")]
#[command(version)]
struct Args {
    /// Locator host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Locator port
    #[arg(long, default_value = "10334")]
    port: u16,

    /// Region name
    #[arg(short, long, default_value = "default")]
    region: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Run a store-native query predicate
    Query {
        /// The predicate expression, passed through verbatim
        predicate: String,
    },

    /// Ping the store
    Ping,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,regionkv=info"));

    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    let config = StoreConfig::builder()
        .locator_host(&args.host)
        .locator_port(args.port)
        .region_name(&args.region)
        .build();

    let mut adapter = match StoreAdapter::new(config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    let result = run(&mut adapter, args.command);
    let _ = adapter.disconnect();

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(adapter: &mut StoreAdapter, command: Commands) -> regionkv::Result<()> {
    match command {
        Commands::Get { key } => {
            match adapter.get(key.as_bytes())? {
                Some(value) => println!("{}", String::from_utf8_lossy(&value)),
                None => println!("(nil)"),
            }
        }
        Commands::Set { key, value } => {
            adapter.put(key.as_bytes(), value.as_bytes())?;
            println!("OK");
        }
        Commands::Del { key } => {
            adapter.remove(key.as_bytes())?;
            println!("OK");
        }
        Commands::Query { predicate } => {
            let results = adapter.query(&predicate)?;
            if results.is_empty() {
                println!("(empty)");
            }
            for value in results {
                println!("{}", String::from_utf8_lossy(&value));
            }
        }
        Commands::Ping => {
            adapter.ping()?;
            println!("PONG");
        }
    }
    Ok(())
}
