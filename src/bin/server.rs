//! goallog Server Binary
//!
//! Starts the HTTP server for goallog.

use std::sync::Arc;

use clap::Parser;
use goallog::network::Server;
use goallog::{Config, LogService, MemoryStore, MissingUpdatePolicy};
use tracing_subscriber::{fmt, EnvFilter};

/// goallog Server
#[derive(Parser, Debug)]
#[command(name = "goallog-server")]
#[command(about = "HTTP service for daily logs and goals")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    listen: String,

    /// Maximum open connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Read timeout in milliseconds (0 disables)
    #[arg(long, default_value = "5000")]
    read_timeout_ms: u64,

    /// Write timeout in milliseconds (0 disables)
    #[arg(long, default_value = "5000")]
    write_timeout_ms: u64,

    /// Answer 404 to PUT on an unknown id instead of an empty 200
    #[arg(long)]
    strict_updates: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,goallog=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("goallog Server v{}", goallog::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    let missing_update = if args.strict_updates {
        MissingUpdatePolicy::NotFound
    } else {
        MissingUpdatePolicy::Silent
    };

    // Build config from args
    let config = Config::builder()
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .missing_update(missing_update)
        .build();

    let service = LogService::new(Arc::new(MemoryStore::new()));

    let server = match Server::bind(config, service) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    // Set up Ctrl+C handler
    match server.shutdown_handle() {
        Ok(handle) => {
            let result = ctrlc::set_handler(move || {
                tracing::info!("Received Ctrl+C, initiating shutdown...");
                handle.shutdown();
            });
            if let Err(e) = result {
                tracing::warn!("Could not install Ctrl+C handler: {}", e);
            }
        }
        Err(e) => tracing::warn!("Could not create shutdown handle: {}", e),
    }

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
