//! Repository for account invites.

use std::time::Duration;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::bounded;
use crate::entities::Invite;
use crate::types::codec::{parse_timestamp, parse_uuid};
use crate::types::StoreResult;

pub struct InviteRepository {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl InviteRepository {
    pub fn new(pool: SqlitePool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    pub async fn find_by_token(&self, token: Uuid) -> StoreResult<Option<Invite>> {
        let row = bounded(
            self.query_timeout,
            sqlx::query(
                "SELECT user_id, invite_token, expires_at, sent_count, created_at, last_seen_at
                 FROM user_invites WHERE invite_token = ?",
            )
            .bind(token.to_string())
            .fetch_optional(&self.pool),
        )
        .await?;

        row.as_ref().map(invite_from_row).transpose()
    }
}

fn invite_from_row(row: &SqliteRow) -> StoreResult<Invite> {
    Ok(Invite {
        user_id: parse_uuid(row.try_get("user_id")?)?,
        invite_token: parse_uuid(row.try_get("invite_token")?)?,
        expires_at: parse_timestamp(row.try_get("expires_at")?)?,
        sent_count: row.try_get("sent_count")?,
        created_at: parse_timestamp(row.try_get("created_at")?)?,
        last_seen_at: parse_timestamp(row.try_get("last_seen_at")?)?,
    })
}
