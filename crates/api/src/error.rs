use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use social_feed::FeedError;
use tracing::{debug, error, warn};
use utoipa::ToSchema;

const OPAQUE_SERVER_ERROR: &str = "the server encountered a problem and could not process your request";

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal_server_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, OPAQUE_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<FeedError> for ApiError {
    fn from(error: FeedError) -> Self {
        match error {
            FeedError::BadInput(message) | FeedError::MissingParent(message) => {
                debug!(%message, "bad request");
                Self::bad_request(message)
            }
            FeedError::Validation(errors) => {
                debug!(%errors, "request failed validation");
                Self::bad_request(errors.to_string())
            }
            FeedError::NotFound(message) => {
                debug!(%message, "resource not found");
                Self::not_found(message)
            }
            FeedError::Conflict(message) => {
                warn!(%message, "conflict");
                Self::conflict(message)
            }
            FeedError::Store(err) => {
                error!(error = ?err, "store error");
                Self::internal_server_error()
            }
            FeedError::Internal(message) => {
                error!(%message, "internal error");
                Self::internal_server_error()
            }
        }
    }
}
