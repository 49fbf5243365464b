//! rotalog demo service.
//!
//! # Architecture Overview
//!
//! ```text
//!   log.json ──▶ config ──▶ LogConfig
//!                              │
//!              ┌───────────────┼─────────────────────┐
//!              ▼               ▼                     ▼
//!         LevelGate ◀──── admin (/loglevel)     sink::RotatingFile
//!              │                                     ▲
//!   caller ──▶ logger ──▶ encoder ──▶ sink::FanoutSink ──▶ sink::ConsoleSink
//! ```
//!
//! Resolves configuration, starts logging and the level-control endpoint,
//! emits a few records, then waits for Ctrl+C and flushes.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rotalog::config::{resolve_config, schema::DEFAULT_CONFIG_FILE};
use rotalog::lifecycle::{signals::shutdown_signal, start, BindPolicy};

#[derive(Parser)]
#[command(name = "rotalog")]
#[command(about = "Structured logging service with runtime level control", long_about = None)]
struct Args {
    /// JSON config file; missing or invalid files fall back to defaults.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Print the resolved configuration before starting.
    #[arg(long)]
    print_config: bool,

    /// Keep running if the level-control port cannot be bound.
    #[arg(long)]
    best_effort_control: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Internal diagnostics go to stderr; stdout carries the console mirror.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rotalog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = resolve_config(&args.config);

    if args.print_config {
        println!("{config}");
    }

    let policy = if args.best_effort_control {
        BindPolicy::BestEffort
    } else {
        BindPolicy::Required
    };

    let service = start(config, policy).await?;

    service.announce();

    if let Some(admin) = &service.admin {
        tracing::info!(
            url = %format!("http://{}/loglevel", admin.local_addr()),
            "Level-control endpoint ready"
        );
    }

    shutdown_signal().await;

    if let Err(e) = service.logger.info("service stopping", "reason", "signal") {
        tracing::warn!(error = %e, "Failed to write shutdown record");
    }
    service.shutdown().await?;
    Ok(())
}
