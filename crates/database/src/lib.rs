//! Social Database Crate
//!
//! Entity store for the social backend: connection management, embedded
//! migrations, entities and the repositories the services are built on.

use social_config::DatabaseConfig;
use tracing::error;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::{prepare_database, DatabaseConnection};
pub use migrations::{run_migrations, MIGRATOR};

pub use repos::{
    CommentRepository, FeedRepository, FollowRepository, InviteRepository, PostRepository,
    UserRepository,
};

pub use entities::{
    Comment, CommentWithAuthor, FeedEntry, FeedSelection, FollowEdge, Invite, NewComment,
    NewPost, NewUser, Post, SortDirection, User, UserSummary,
};

pub use types::{StoreError, StoreResult};

pub use sqlx::SqlitePool;

/// Open the pool described by `config` and apply pending migrations.
pub async fn initialize_database(config: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let connection = DatabaseConnection::from_config(config).await?;

    if let Err(err) = run_migrations(connection.pool()).await {
        error!(error = %err, url = %config.url, "failed to migrate database");
        return Err(err);
    }

    Ok(connection)
}
