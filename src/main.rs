//! Product search service.
//!
//! Accepts `POST /api/products` searches, forwards them to the product
//! catalog, and answers with discounted product summaries.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌───────────────────────────────────────────────┐
//!   Client ────────▶│ request id → traffic log (messageIn)          │
//!                   │      → validate → catalog search ─────────────┼──▶ Catalog API
//!                   │      → transform → JSON / error envelope      │
//!   Client ◀────────│ traffic log (messageOut)                      │
//!                   └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use product_search::config::{load_config, ConfigSources, PORT_ENV};
use product_search::lifecycle::{self, signals, Shutdown};
use product_search::observability::logging;

#[derive(Parser)]
#[command(name = "product-search")]
#[command(about = "Product search service backed by an external catalog", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listener port; overrides both the file and the PORT variable.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(ConfigSources {
        file: cli.config.as_deref(),
        port_env: std::env::var(PORT_ENV).ok(),
        port_flag: cli.port,
    })?;

    logging::init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address(),
        catalog = %config.catalog.base_url,
        page_size = config.catalog.page_size,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);

    lifecycle::start(config, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
