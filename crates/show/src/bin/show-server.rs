//! `show-server`: runs the Show room server.
//!
//! Reads `SHOW_BIND` / `PORT` and `SHOW_SEED` from the environment and
//! log filters from `RUST_LOG` (default `info`).

use show::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ShowError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    let server = ShowServerBuilder::from_config(&config).build().await?;
    tracing::info!(addr = %config.bind_addr, seeded = config.seed.is_some(), "listening");
    server.run().await
}
