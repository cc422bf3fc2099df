//! Recipe API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p recipe-api
//! ```
//!
//! Configuration is read from environment variables (a `.env` file is loaded
//! when present).

use anyhow::Context;
use recipe_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = ?e, "Server failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.server.address(),
        "Starting Recipe API Server"
    );

    recipe_api::run(config).await.context("server error")?;

    Ok(())
}
