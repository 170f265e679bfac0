use anyhow::Result;
use safari_tours::{config::Config, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("safari_tours=info".parse()?),
        )
        .init();

    info!("Starting safari tours server");

    // Load configuration from environment
    let config = Config::from_env()?;

    // Registry misconfiguration or missing messages abort startup
    let state = server::AppState::new(&config)?;

    server::serve(state, config.port).await
}
