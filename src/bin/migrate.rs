use anyhow::{Context, Result};

use apostila_api::database;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let pool = database::pool()
        .await
        .context("failed to connect to database")?;

    database::migrations::run(pool)
        .await
        .context("failed to apply migrations")?;

    tracing::info!("migrations complete");
    Ok(())
}
