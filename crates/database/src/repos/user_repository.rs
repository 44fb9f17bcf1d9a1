//! Repository for user data access operations.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::bounded;
use crate::entities::{Invite, NewUser, User};
use crate::types::codec::{format_timestamp, now, parse_timestamp, parse_uuid};
use crate::types::{StoreError, StoreResult};

const USER_COLUMNS: &str = "id, username, email, password_hash, is_activated, created_at";

pub struct UserRepository {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl UserRepository {
    pub fn new(pool: SqlitePool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    pub async fn create(&self, request: &NewUser) -> StoreResult<User> {
        let user = User {
            id: Uuid::now_v7(),
            username: request.username.clone(),
            email: request.email.clone(),
            password_hash: request.password_hash.clone(),
            is_activated: false,
            created_at: now(),
        };

        bounded(self.query_timeout, insert_user(&self.pool, &user)).await?;

        info!(user_id = %user.id, username = %user.username, "created new user");
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let row = bounded(
            self.query_timeout,
            sqlx::query(&sql)
                .bind(id.to_string())
                .fetch_optional(&self.pool),
        )
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn get(&self, id: Uuid) -> StoreResult<User> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("user", id))
    }

    /// Insert an unactivated user and its invite atomically.
    pub async fn create_with_invite(
        &self,
        request: &NewUser,
        invite_token: Uuid,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<(User, Invite)> {
        let now = now();
        let user = User {
            id: Uuid::now_v7(),
            username: request.username.clone(),
            email: request.email.clone(),
            password_hash: request.password_hash.clone(),
            is_activated: false,
            created_at: now,
        };
        let invite = Invite {
            user_id: user.id,
            invite_token,
            expires_at,
            sent_count: 1,
            created_at: now,
            last_seen_at: now,
        };

        bounded(self.query_timeout, async {
            let mut tx = self.pool.begin().await?;
            insert_user(&mut *tx, &user).await?;
            sqlx::query(
                "INSERT INTO user_invites (user_id, invite_token, expires_at, sent_count, created_at, last_seen_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(invite.user_id.to_string())
            .bind(invite.invite_token.to_string())
            .bind(format_timestamp(&invite.expires_at))
            .bind(invite.sent_count)
            .bind(format_timestamp(&invite.created_at))
            .bind(format_timestamp(&invite.last_seen_at))
            .execute(&mut *tx)
            .await?;
            tx.commit().await
        })
        .await?;

        info!(user_id = %user.id, username = %user.username, "created user with pending invite");
        Ok((user, invite))
    }

    /// Mark the user activated and drop all of their invites in one transaction.
    pub async fn activate(&self, user_id: Uuid) -> StoreResult<()> {
        let id = user_id.to_string();
        let updated = bounded(self.query_timeout, async {
            let mut tx = self.pool.begin().await?;
            let result = sqlx::query("UPDATE users SET is_activated = TRUE WHERE id = ?")
                .bind(&id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM user_invites WHERE user_id = ?")
                .bind(&id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            Ok::<_, sqlx::Error>(result.rows_affected())
        })
        .await?;

        if updated == 0 {
            return Err(StoreError::not_found("user", user_id));
        }

        info!(user_id = %user_id, "activated user");
        Ok(())
    }

    pub async fn delete(&self, user_id: Uuid) -> StoreResult<()> {
        let result = bounded(
            self.query_timeout,
            sqlx::query("DELETE FROM users WHERE id = ?")
                .bind(user_id.to_string())
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("user", user_id));
        }

        info!(user_id = %user_id, "deleted user");
        Ok(())
    }
}

async fn insert_user<'e, E>(executor: E, user: &User) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, is_activated, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(user.id.to_string())
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.is_activated)
    .bind(format_timestamp(&user.created_at))
    .execute(executor)
    .await?;
    Ok(())
}

fn user_from_row(row: &SqliteRow) -> StoreResult<User> {
    Ok(User {
        id: parse_uuid(row.try_get("id")?)?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        is_activated: row.try_get("is_activated")?,
        created_at: parse_timestamp(row.try_get("created_at")?)?,
    })
}
