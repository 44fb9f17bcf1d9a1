//! Database connection management

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use social_config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::fs;
use tracing::info;

use crate::repos::{
    CommentRepository, FeedRepository, FollowRepository, InviteRepository, PostRepository,
    UserRepository,
};

/// Open a pool for `config.url` with foreign keys enforced on every connection.
pub async fn prepare_database(config: &DatabaseConfig) -> Result<SqlitePool> {
    ensure_sqlite_dir(&config.url).await?;

    let options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("invalid database url {}", config.url))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .connect_with(options)
        .await
        .with_context(|| format!("failed to connect to database {}", config.url))?;

    info!(
        url = %config.url,
        max_connections = config.max_connections,
        "database connection established"
    );
    Ok(pool)
}

async fn ensure_sqlite_dir(url: &str) -> Result<()> {
    let Some(sqlite_path) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
    else {
        return Ok(());
    };

    let sqlite_path = sqlite_path.split('?').next().unwrap_or_default();
    if sqlite_path.is_empty() || sqlite_path == ":memory:" {
        return Ok(());
    }

    if let Some(parent) = Path::new(sqlite_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("failed to create sqlite directory {}", parent.display())
            })?;
        }
    }

    Ok(())
}

/// Pool plus the per-call timeout every repository applies.
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl DatabaseConnection {
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self> {
        let pool = prepare_database(config).await?;
        Ok(Self::from_pool(
            pool,
            Duration::from_millis(config.query_timeout_ms),
        ))
    }

    pub fn from_pool(pool: SqlitePool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone(), self.query_timeout)
    }

    pub fn invites(&self) -> InviteRepository {
        InviteRepository::new(self.pool.clone(), self.query_timeout)
    }

    pub fn posts(&self) -> PostRepository {
        PostRepository::new(self.pool.clone(), self.query_timeout)
    }

    pub fn comments(&self) -> CommentRepository {
        CommentRepository::new(self.pool.clone(), self.query_timeout)
    }

    pub fn follows(&self) -> FollowRepository {
        FollowRepository::new(self.pool.clone(), self.query_timeout)
    }

    pub fn feed(&self) -> FeedRepository {
        FeedRepository::new(self.pool.clone(), self.query_timeout)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }

    pub async fn test_connection(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("failed to test database connection")?;
        Ok(())
    }
}
