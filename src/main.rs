//! levy-engine binary entry point.
//!
//! Loads a jurisdiction's configuration and serves the calculators over
//! HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use levy_engine::api::{AppState, create_router};
use levy_engine::engine::LevyEngine;

/// Vehicle import duty and payroll tax calculator.
#[derive(Debug, Parser)]
#[command(name = "levy-engine", version, about)]
struct Cli {
    /// Directory holding jurisdiction.yaml, payroll.yaml and vehicle_duty.yaml.
    #[arg(long, default_value = "./config/gy_2024")]
    config: PathBuf,

    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let engine = LevyEngine::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    let metadata = engine.config().metadata();
    info!(
        jurisdiction = %metadata.code,
        version = %metadata.version,
        bracket_version = %engine.config().brackets().version(),
        "Configuration loaded"
    );

    let app = create_router(AppState::new(engine));

    let listener = tokio::net::TcpListener::bind(cli.addr)
        .await
        .with_context(|| format!("binding {}", cli.addr))?;
    info!("levy-engine listening on {}", cli.addr);

    axum::serve(listener, app).await?;

    Ok(())
}
