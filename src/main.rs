//! journey-bootstrap: serve journey applications described by a TOML file.
//!
//! # Architecture Overview
//!
//! ```text
//!   journey.toml
//!        │
//!        ▼
//!   ┌──────────┐   ┌────────────────────┐   ┌────────────────────────┐
//!   │  config  │──▶│ validation (fail   │──▶│ routing::composer      │
//!   │  loader  │   │ fast, fs checks)   │   │  views chain + ctrl    │
//!   └──────────┘   └────────────────────┘   └───────────┬────────────┘
//!                                                        │
//!                                                        ▼
//!   ┌──────────┐   ┌────────────────────┐   ┌────────────────────────┐
//!   │ signals  │──▶│ lifecycle (start / │──▶│ http pipeline + net    │
//!   │          │   │ stop, readiness)   │   │  listener (axum-server)│
//!   └──────────┘   └────────────────────┘   └────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use journey_bootstrap::config::loader::load_config;
use journey_bootstrap::lifecycle::signals::shutdown_signal;
use journey_bootstrap::observability::{logging, metrics};
use journey_bootstrap::{App, StartOptions};

#[derive(Parser)]
#[command(name = "journey-bootstrap")]
#[command(about = "Serve multi-step journey applications from a route configuration", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "journey.toml")]
    config: PathBuf,

    /// Override the configured host.
    #[arg(long)]
    host: Option<String>,

    /// Override the configured port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init_logging(&config.observability);

    tracing::info!(
        config = %cli.config.display(),
        version = env!("CARGO_PKG_VERSION"),
        "journey-bootstrap starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let mut app = App::new(config)?;
    let overrides = StartOptions {
        host: cli.host,
        port: cli.port,
        protocol: None,
    };
    app.start(overrides).await?;

    shutdown_signal().await;
    app.stop().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
