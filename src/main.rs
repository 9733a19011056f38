//! # quad
//!
//! Campus event management server binary — opens the database and starts
//! the HTTP API.

use std::path::PathBuf;

use clap::Parser;
use quad_store::Database;

/// Campus event management server.
#[derive(Parser, Debug)]
#[command(name = "quad", about = "Campus event management server")]
struct Cli {
    /// Port to bind (0 for auto-assign).
    #[arg(long, default_value = "5000")]
    port: u16,

    /// Path to the SQLite database file.
    #[arg(long, default_value = "events.db")]
    db_path: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting quad server");

    let db = Database::open(&cli.db_path).expect("Failed to open database");

    let config = quad_server::ServerConfig { port: cli.port };
    let handle = quad_server::start(config, db)
        .await
        .expect("Failed to start server");

    tracing::info!(port = handle.port, "quad server ready");

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for ctrl+c");

    tracing::info!("Shutting down");
}
