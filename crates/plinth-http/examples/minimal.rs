//! Smallest possible server built on the kit.

use axum::{routing::get, Router};
use plinth_http::{init_logging_from_env, RouterExt, ServerConfig};

async fn hello() -> &'static str {
    "Hello, World!"
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config: ServerConfig = ServerConfig::builder().with_dotenv().build()?;

    init_logging_from_env();

    Router::new()
        .route("/", get(hello))
        .with_health_check()
        .with_fallback()
        .with_default_layers(&config)
        .serve(&config)
        .await?;

    Ok(())
}
