//! Feed aggregation query.
//!
//! One statement selects the eligible posts with their owner's username, the
//! comment count and the most recent comment, then windows the ordered result.
//! Followed owners come from a sub-select keyed on the viewer.

use std::time::Duration;

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::bounded;
use super::post_repository::post_from_row;
use crate::entities::{FeedEntry, FeedSelection, UserSummary};
use crate::types::codec::{format_timestamp, parse_uuid};
use crate::types::StoreResult;

const FEED_SELECT: &str = "SELECT p.id, p.title, p.content, p.user_id, p.tags, p.created_at, p.updated_at, p.version, \
     u.username, \
     (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count, \
     (SELECT c.content FROM comments c WHERE c.post_id = p.id ORDER BY c.created_at DESC, c.id DESC LIMIT 1) AS top_comment_content, \
     (SELECT c.user_id FROM comments c WHERE c.post_id = p.id ORDER BY c.created_at DESC, c.id DESC LIMIT 1) AS top_comment_user_id \
     FROM posts p JOIN users u ON u.id = p.user_id \
     WHERE (p.user_id = ";

pub struct FeedRepository {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl FeedRepository {
    pub fn new(pool: SqlitePool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    pub async fn fetch(&self, selection: &FeedSelection) -> StoreResult<Vec<FeedEntry>> {
        let mut builder = build_feed_query(selection);
        let rows = bounded(
            self.query_timeout,
            builder.build().fetch_all(&self.pool),
        )
        .await?;

        debug!(
            viewer = %selection.viewer,
            limit = selection.limit,
            offset = selection.offset,
            sort = %selection.sort,
            returned = rows.len(),
            "assembled feed page"
        );

        rows.iter().map(feed_entry_from_row).collect()
    }
}

fn build_feed_query(selection: &FeedSelection) -> QueryBuilder<'static, Sqlite> {
    let viewer = selection.viewer.to_string();
    let mut builder = QueryBuilder::<Sqlite>::new(FEED_SELECT);
    builder
        .push_bind(viewer.clone())
        .push(" OR p.user_id IN (SELECT f.user_id FROM followers f WHERE f.follower_id = ")
        .push_bind(viewer)
        .push("))");

    if !selection.tags.is_empty() {
        builder.push(" AND EXISTS (SELECT 1 FROM json_each(p.tags) t WHERE t.value IN (");
        let mut tags = builder.separated(", ");
        for tag in &selection.tags {
            tags.push_bind(tag.clone());
        }
        builder.push("))");
    }

    if let Some(term) = selection.search_term() {
        let pattern = format!("%{}%", escape_like(&term));
        builder
            .push(" AND (LOWER(p.title) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR LOWER(p.content) LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }

    if let Some(from) = selection.from {
        builder
            .push(" AND p.created_at >= ")
            .push_bind(format_timestamp(&from));
    }

    if let Some(to) = selection.to {
        builder
            .push(" AND p.created_at <= ")
            .push_bind(format_timestamp(&to));
    }

    let direction = selection.sort.as_sql();
    builder
        .push(format!(
            " ORDER BY p.created_at {direction}, p.id {direction} LIMIT "
        ))
        .push_bind(selection.limit)
        .push(" OFFSET ")
        .push_bind(selection.offset);

    builder
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn feed_entry_from_row(row: &SqliteRow) -> StoreResult<FeedEntry> {
    let post = post_from_row(row)?;
    let user = UserSummary {
        id: post.user_id,
        username: row.try_get("username")?,
    };
    let top_comment_content: Option<String> = row.try_get("top_comment_content")?;
    let top_comment_user_id: Option<&str> = row.try_get("top_comment_user_id")?;

    Ok(FeedEntry {
        post,
        user,
        comments_count: row.try_get("comments_count")?,
        top_comment_content: top_comment_content.unwrap_or_default(),
        top_comment_user_id: top_comment_user_id
            .map(parse_uuid)
            .transpose()?
            .unwrap_or_else(Uuid::nil),
    })
}
