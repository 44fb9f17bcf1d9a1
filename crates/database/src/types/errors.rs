//! Error types for the database layer

use std::time::Duration;

use sqlx::error::ErrorKind;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the entity store.
///
/// Driver errors are classified on conversion so callers can match on
/// constraint kinds instead of inspecting driver messages.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("stale version {expected} for post {id}")]
    StaleVersion { id: Uuid, expected: i64 },

    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("store call exceeded {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("failed to decode stored value: {0}")]
    Decode(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Whether the error reports a violated integrity constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ForeignKeyViolation(_) | Self::UniqueViolation(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::ForeignKeyViolation => {
                    return Self::ForeignKeyViolation(db_err.message().to_string())
                }
                ErrorKind::UniqueViolation => {
                    return Self::UniqueViolation(db_err.message().to_string())
                }
                _ => {}
            }
        }

        match err {
            sqlx::Error::ColumnDecode { index, source } => {
                Self::Decode(format!("column {index}: {source}"))
            }
            other => Self::Database(other),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(format!("json: {err}"))
    }
}
