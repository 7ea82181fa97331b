use std::str::FromStr;

use api::{MarketplaceConfig, init_marketplace};

fn log_level() -> tracing::Level {
    std::env::var("GIGFLOW_LOG")
        .ok()
        .and_then(|level| tracing::Level::from_str(&level).ok())
        .unwrap_or(tracing::Level::INFO)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(log_level())
        .init();

    let config = MarketplaceConfig::from_env()?;
    tracing::info!("Database endpoint: {}", config.db.endpoint);

    let marketplace = init_marketplace(config).await?;

    tokio::signal::ctrl_c().await?;
    marketplace.shutdown().await;

    Ok(())
}
