//! Database repository implementations

use std::future::Future;
use std::time::Duration;

use crate::types::{StoreError, StoreResult};

pub mod comment_repository;
pub mod feed_repository;
pub mod follow_repository;
pub mod invite_repository;
pub mod post_repository;
pub mod user_repository;

pub use comment_repository::CommentRepository;
pub use feed_repository::FeedRepository;
pub use follow_repository::FollowRepository;
pub use invite_repository::InviteRepository;
pub use post_repository::PostRepository;
pub use user_repository::UserRepository;

/// Run one store call under `limit`. Expiry drops the call and reports
/// [`StoreError::Timeout`]; nothing is retried here.
pub(crate) async fn bounded<T, E, F>(limit: Duration, call: F) -> StoreResult<T>
where
    F: Future<Output = Result<T, E>>,
    E: Into<StoreError>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::SqlitePool;
    use tempfile::TempDir;

    use crate::connection::DatabaseConnection;
    use crate::entities::{NewUser, User};
    use social_config::DatabaseConfig;

    /// A migrated database in a temporary directory.
    pub struct TestDatabase {
        pub connection: DatabaseConnection,
        _temp_dir: TempDir,
    }

    impl TestDatabase {
        pub async fn new() -> Self {
            let temp_dir = TempDir::new().expect("failed to create temp dir");
            let db_path = temp_dir.path().join("test.db");
            let config = DatabaseConfig {
                url: format!("sqlite://{}", db_path.display()),
                max_connections: 2,
                ..DatabaseConfig::default()
            };

            let connection = DatabaseConnection::from_config(&config)
                .await
                .expect("failed to open test database");
            crate::migrations::run_migrations(connection.pool())
                .await
                .expect("failed to migrate test database");

            Self {
                connection,
                _temp_dir: temp_dir,
            }
        }

        pub fn pool(&self) -> &SqlitePool {
            self.connection.pool()
        }

        pub async fn user(&self, username: &str) -> User {
            self.connection
                .users()
                .create(&NewUser {
                    username: username.to_string(),
                    email: format!("{username}@example.com"),
                    password_hash: "hash".to_string(),
                })
                .await
                .expect("failed to create user")
        }
    }
}
