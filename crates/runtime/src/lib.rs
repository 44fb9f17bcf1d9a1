use anyhow::{Context, Result};
use social_config::AppConfig;
use social_database::{initialize_database, DatabaseConnection};
use tracing::info;

pub mod seed;

pub mod telemetry {
    use anyhow::Result;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub database: DatabaseConnection,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let database = initialize_database(&config.database).await?;
        database
            .test_connection()
            .await
            .context("database is not reachable")?;

        info!(env = %config.env, "backend services ready");
        Ok(Self { database })
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
