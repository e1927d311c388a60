//! Entry point for the Fee Engine binary.
//!
//! Running this binary will start an HTTP server that exposes the
//! fee structure review API.  The bind address may be specified via
//! the `FEE_ENGINE_BIND_ADDR` environment variable and log output is
//! filtered through `RUST_LOG` (default `info`).

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Determine bind address
    let addr = std::env::var("FEE_ENGINE_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    if let Err(err) = fee_engine::api::serve(&addr).await {
        tracing::error!("Error running server: {:#}", err);
        std::process::exit(1);
    }
}
