use anyhow::{Error, Result};
use tracing_subscriber::EnvFilter;

use whatsapp_service::{api, config::Config};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;

    api::run_api_server(config).await
}
