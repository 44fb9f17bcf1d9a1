//! Repository for follow edges.

use std::time::Duration;

use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use super::bounded;
use crate::entities::FollowEdge;
use crate::types::codec::{format_timestamp, now, parse_uuid};
use crate::types::StoreResult;

pub struct FollowRepository {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl FollowRepository {
    pub fn new(pool: SqlitePool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Insert the edge. An existing edge is a unique violation and a missing
    /// user a foreign key violation.
    pub async fn follow(&self, edge: FollowEdge) -> StoreResult<()> {
        bounded(
            self.query_timeout,
            sqlx::query("INSERT INTO followers (user_id, follower_id, created_at) VALUES (?, ?, ?)")
                .bind(edge.user_id.to_string())
                .bind(edge.follower_id.to_string())
                .bind(format_timestamp(&now()))
                .execute(&self.pool),
        )
        .await?;

        info!(user_id = %edge.user_id, follower_id = %edge.follower_id, "created follow edge");
        Ok(())
    }

    /// Remove the edge if present. Returns whether a row was removed.
    pub async fn unfollow(&self, edge: FollowEdge) -> StoreResult<bool> {
        let result = bounded(
            self.query_timeout,
            sqlx::query("DELETE FROM followers WHERE user_id = ? AND follower_id = ?")
                .bind(edge.user_id.to_string())
                .bind(edge.follower_id.to_string())
                .execute(&self.pool),
        )
        .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(user_id = %edge.user_id, follower_id = %edge.follower_id, "removed follow edge");
        }
        Ok(removed)
    }

    /// Accounts `viewer` follows.
    pub async fn followed_owner_ids(&self, viewer: Uuid) -> StoreResult<Vec<Uuid>> {
        let ids: Vec<String> = bounded(
            self.query_timeout,
            sqlx::query_scalar::<_, String>(
                "SELECT user_id FROM followers WHERE follower_id = ? ORDER BY user_id",
            )
            .bind(viewer.to_string())
            .fetch_all(&self.pool),
        )
        .await?;

        ids.iter().map(|id| parse_uuid(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::test_support::TestDatabase;
    use crate::StoreError;

    #[tokio::test]
    async fn follow_is_directed_and_unique() {
        let db = TestDatabase::new().await;
        let viewer = db.user("viewer").await;
        let star = db.user("star").await;
        let repo = db.connection.follows();

        repo.follow(FollowEdge::new(star.id, viewer.id)).await.unwrap();

        assert_eq!(repo.followed_owner_ids(viewer.id).await.unwrap(), vec![star.id]);
        assert!(repo.followed_owner_ids(star.id).await.unwrap().is_empty());

        let err = repo.follow(FollowEdge::new(star.id, viewer.id)).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn following_missing_user_violates_foreign_key() {
        let db = TestDatabase::new().await;
        let viewer = db.user("viewer").await;

        let err = db
            .connection
            .follows()
            .follow(FollowEdge::new(Uuid::now_v7(), viewer.id))
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[tokio::test]
    async fn unfollow_without_edge_is_noop() {
        let db = TestDatabase::new().await;
        let viewer = db.user("viewer").await;
        let star = db.user("star").await;
        let repo = db.connection.follows();

        assert!(!repo.unfollow(FollowEdge::new(star.id, viewer.id)).await.unwrap());

        repo.follow(FollowEdge::new(star.id, viewer.id)).await.unwrap();
        assert!(repo.unfollow(FollowEdge::new(star.id, viewer.id)).await.unwrap());
        assert!(repo.followed_owner_ids(viewer.id).await.unwrap().is_empty());
    }
}
