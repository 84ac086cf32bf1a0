//! Starter HTTP server: config loading, logging, a handful of JSON
//! routes, and graceful shutdown with a bounded drain.

mod config;
mod routes;
mod state;

use std::process::ExitCode;

use plinth_http::{RouterExt, ServerError};

use config::AppConfig;
use state::AppState;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Application failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    plinth::init_logging(config.log.format, &config.log.level);

    tracing::info!(
        name = %config.app.name,
        version = %config.app.version,
        port = config.server.port,
        environment = ?config.server.environment,
        "Application initialized"
    );

    let state = AppState::new(config);
    let server_config = state.config.server.clone();

    let result = routes::router(state).serve(&server_config).await;

    match result {
        Ok(()) => Ok(()),
        // Forced close already succeeded; the process still exits zero.
        Err(e @ ServerError::DrainTimeout(_)) => {
            tracing::warn!("{}", e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
