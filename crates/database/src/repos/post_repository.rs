//! Repository for post data access operations.
//!
//! Updates are optimistic: the caller passes the post as it last read it and
//! the write only lands if the stored version still matches.

use std::time::Duration;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{info, warn};
use uuid::Uuid;

use super::bounded;
use crate::entities::{NewPost, Post};
use crate::types::codec::{
    decode_tags, encode_tags, format_timestamp, now, parse_timestamp, parse_uuid,
};
use crate::types::{StoreError, StoreResult};

const POST_COLUMNS: &str = "id, title, content, user_id, tags, created_at, updated_at, version";

pub struct PostRepository {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl PostRepository {
    pub fn new(pool: SqlitePool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    pub async fn create(&self, request: &NewPost) -> StoreResult<Post> {
        let now = now();
        let post = Post {
            id: Uuid::now_v7(),
            title: request.title.clone(),
            content: request.content.clone(),
            tags: request.tags.clone(),
            user_id: request.user_id,
            created_at: now,
            updated_at: now,
            version: 0,
        };

        self.insert(&post).await?;

        info!(post_id = %post.id, user_id = %post.user_id, "created new post");
        Ok(post)
    }

    /// Insert a fully formed post, keeping its id, timestamps and version.
    pub async fn import(&self, post: &Post) -> StoreResult<()> {
        self.insert(post).await?;
        info!(post_id = %post.id, user_id = %post.user_id, "imported post");
        Ok(())
    }

    async fn insert(&self, post: &Post) -> StoreResult<()> {
        let tags = encode_tags(&post.tags)?;
        bounded(
            self.query_timeout,
            sqlx::query(
                "INSERT INTO posts (id, title, content, user_id, tags, created_at, updated_at, version)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(post.id.to_string())
            .bind(&post.title)
            .bind(&post.content)
            .bind(post.user_id.to_string())
            .bind(tags)
            .bind(format_timestamp(&post.created_at))
            .bind(format_timestamp(&post.updated_at))
            .bind(post.version)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?");
        let row = bounded(
            self.query_timeout,
            sqlx::query(&sql)
                .bind(id.to_string())
                .fetch_optional(&self.pool),
        )
        .await?;

        row.as_ref().map(post_from_row).transpose()
    }

    pub async fn get(&self, id: Uuid) -> StoreResult<Post> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("post", id))
    }

    /// Write title, content and tags of `post` if its stored version is still
    /// `post.version`. Returns the new version.
    pub async fn update(&self, post: &Post) -> StoreResult<i64> {
        let tags = encode_tags(&post.tags)?;
        let updated_at = format_timestamp(&now());

        let new_version: Option<i64> = bounded(
            self.query_timeout,
            sqlx::query_scalar::<_, i64>(
                "UPDATE posts
                 SET title = ?, content = ?, tags = ?, version = version + 1, updated_at = ?
                 WHERE id = ? AND version = ?
                 RETURNING version",
            )
            .bind(&post.title)
            .bind(&post.content)
            .bind(tags)
            .bind(updated_at)
            .bind(post.id.to_string())
            .bind(post.version)
            .fetch_optional(&self.pool),
        )
        .await?;

        match new_version {
            Some(version) => {
                info!(post_id = %post.id, version, "updated post");
                Ok(version)
            }
            None if self.find_by_id(post.id).await?.is_none() => {
                Err(StoreError::not_found("post", post.id))
            }
            None => {
                warn!(post_id = %post.id, expected = post.version, "rejected stale post update");
                Err(StoreError::StaleVersion {
                    id: post.id,
                    expected: post.version,
                })
            }
        }
    }

    pub async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = bounded(
            self.query_timeout,
            sqlx::query("DELETE FROM posts WHERE id = ?")
                .bind(id.to_string())
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("post", id));
        }

        info!(post_id = %id, "deleted post");
        Ok(())
    }
}

pub(crate) fn post_from_row(row: &SqliteRow) -> StoreResult<Post> {
    Ok(Post {
        id: parse_uuid(row.try_get("id")?)?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        user_id: parse_uuid(row.try_get("user_id")?)?,
        tags: decode_tags(row.try_get("tags")?)?,
        created_at: parse_timestamp(row.try_get("created_at")?)?,
        updated_at: parse_timestamp(row.try_get("updated_at")?)?,
        version: row.try_get("version")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::test_support::TestDatabase;

    async fn seeded_post(db: &TestDatabase) -> Post {
        let owner = db.user("writer").await;
        db.connection
            .posts()
            .create(&NewPost {
                user_id: owner.id,
                title: "First".to_string(),
                content: "Hello".to_string(),
                tags: vec!["rust".to_string(), "rust".to_string()],
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_starts_at_version_zero() {
        let db = TestDatabase::new().await;
        let post = seeded_post(&db).await;

        let stored = db.connection.posts().get(post.id).await.unwrap();
        assert_eq!(stored.version, 0);
        assert_eq!(stored.tags, vec!["rust", "rust"]);
        assert_eq!(stored, post);
    }

    #[tokio::test]
    async fn concurrent_writers_on_same_version_conflict() {
        let db = TestDatabase::new().await;
        let repo = db.connection.posts();
        let post = seeded_post(&db).await;

        let mut first = post.clone();
        first.title = "first writer".to_string();
        let mut second = post.clone();
        second.title = "second writer".to_string();

        assert_eq!(repo.update(&first).await.unwrap(), 1);
        let err = repo.update(&second).await.unwrap_err();
        assert!(matches!(err, StoreError::StaleVersion { expected: 0, .. }));

        let stored = repo.get(post.id).await.unwrap();
        assert_eq!(stored.title, "first writer");
        assert_eq!(stored.version, 1);
        assert!(stored.updated_at >= post.updated_at);
    }

    #[tokio::test]
    async fn update_replaces_tags_wholesale() {
        let db = TestDatabase::new().await;
        let repo = db.connection.posts();
        let mut post = seeded_post(&db).await;

        post.tags = Vec::new();
        repo.update(&post).await.unwrap();

        assert!(repo.get(post.id).await.unwrap().tags.is_empty());
    }

    #[tokio::test]
    async fn update_of_missing_post_is_not_found() {
        let db = TestDatabase::new().await;
        let mut post = seeded_post(&db).await;
        post.id = Uuid::now_v7();

        let err = db.connection.posts().update(&post).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "post", .. }));
    }

    #[tokio::test]
    async fn delete_removes_post_once() {
        let db = TestDatabase::new().await;
        let repo = db.connection.posts();
        let post = seeded_post(&db).await;

        repo.delete(post.id).await.unwrap();
        assert!(repo.find_by_id(post.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(post.id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn post_for_unknown_owner_violates_foreign_key() {
        let db = TestDatabase::new().await;
        let err = db
            .connection
            .posts()
            .create(&NewPost {
                user_id: Uuid::now_v7(),
                title: "t".to_string(),
                content: "c".to_string(),
                tags: Vec::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation(_)));
    }
}
