//! Repository for comment data access operations.

use std::time::Duration;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::bounded;
use crate::entities::{Comment, CommentWithAuthor, NewComment, UserSummary};
use crate::types::codec::{format_timestamp, now, parse_timestamp, parse_uuid};
use crate::types::StoreResult;

pub struct CommentRepository {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl CommentRepository {
    pub fn new(pool: SqlitePool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Insert a comment. A missing parent post surfaces as
    /// [`StoreError::ForeignKeyViolation`](crate::StoreError::ForeignKeyViolation).
    pub async fn create(&self, request: &NewComment) -> StoreResult<Comment> {
        let comment = Comment {
            id: Uuid::now_v7(),
            content: request.content.clone(),
            post_id: request.post_id,
            user_id: request.user_id,
            created_at: now(),
        };

        self.insert(&comment).await?;

        info!(
            comment_id = %comment.id,
            post_id = %comment.post_id,
            user_id = %comment.user_id,
            "created new comment"
        );
        Ok(comment)
    }

    /// Insert a fully formed comment, keeping its id and timestamp.
    pub async fn import(&self, comment: &Comment) -> StoreResult<()> {
        self.insert(comment).await?;
        info!(comment_id = %comment.id, post_id = %comment.post_id, "imported comment");
        Ok(())
    }

    async fn insert(&self, comment: &Comment) -> StoreResult<()> {
        bounded(
            self.query_timeout,
            sqlx::query(
                "INSERT INTO comments (id, content, post_id, user_id, created_at)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(comment.id.to_string())
            .bind(&comment.content)
            .bind(comment.post_id.to_string())
            .bind(comment.user_id.to_string())
            .bind(format_timestamp(&comment.created_at))
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    /// Comments on `post_id` with their authors, newest first.
    pub async fn list_for_post(&self, post_id: Uuid) -> StoreResult<Vec<CommentWithAuthor>> {
        let rows = bounded(
            self.query_timeout,
            sqlx::query(
                "SELECT c.id, c.content, c.post_id, c.user_id, c.created_at, u.username
                 FROM comments c
                 JOIN users u ON u.id = c.user_id
                 WHERE c.post_id = ?
                 ORDER BY c.created_at DESC, c.id DESC",
            )
            .bind(post_id.to_string())
            .fetch_all(&self.pool),
        )
        .await?;

        rows.iter().map(comment_from_row).collect()
    }
}

fn comment_from_row(row: &SqliteRow) -> StoreResult<CommentWithAuthor> {
    let comment = Comment {
        id: parse_uuid(row.try_get("id")?)?,
        content: row.try_get("content")?,
        post_id: parse_uuid(row.try_get("post_id")?)?,
        user_id: parse_uuid(row.try_get("user_id")?)?,
        created_at: parse_timestamp(row.try_get("created_at")?)?,
    };
    let user = UserSummary {
        id: comment.user_id,
        username: row.try_get("username")?,
    };

    Ok(CommentWithAuthor { comment, user })
}
