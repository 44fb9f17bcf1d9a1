//! Error types for the feed domain.

use std::fmt;

use social_database::StoreError;
use thiserror::Error;

pub type FeedResult<T> = Result<T, FeedError>;

/// One rejected field of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every rule a request broke, reported together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|error| error.field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// `Ok(())` when nothing was recorded, otherwise the aggregated failure.
    pub fn into_result(self) -> FeedResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(FeedError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

/// Failure kinds surfaced by the feed services.
///
/// Only `BadInput`, `Validation`, `NotFound`, `Conflict` and `MissingParent`
/// carry caller-facing detail. `Store` and `Internal` are logged and reported
/// opaquely.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("{0}")]
    BadInput(String),

    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    MissingParent(String),

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl FeedError {
    pub fn bad_input(message: impl Into<String>) -> Self {
        Self::BadInput(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn missing_parent(message: impl Into<String>) -> Self {
        Self::MissingParent(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<StoreError> for FeedError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, .. } => Self::NotFound(format!("{entity} not found")),
            StoreError::StaleVersion { .. } => {
                Self::Conflict("post was modified by another request, reload it and retry".into())
            }
            StoreError::ForeignKeyViolation(_) | StoreError::UniqueViolation(_) => {
                Self::Conflict("the request conflicts with existing data".into())
            }
            other => Self::Store(other),
        }
    }
}
