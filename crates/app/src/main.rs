//! ReqAtlas Forwarding Relay binary.

use std::net::SocketAddr;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get configuration from environment
    let host = std::env::var("REQATLAS_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("REQATLAS_PORT")
        .unwrap_or_else(|_| reqatlas_relay::DEFAULT_PORT.to_string())
        .parse::<u16>()
        .expect("REQATLAS_PORT must be a valid port number");

    let addr: SocketAddr = format!("{host}:{port}").parse().expect("Invalid address");

    tracing::info!(
        "Starting ReqAtlas Forwarding Relay v{}",
        env!("CARGO_PKG_VERSION")
    );

    reqatlas_relay::run_server(addr).await?;

    Ok(())
}
