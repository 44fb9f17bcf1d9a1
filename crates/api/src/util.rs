use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use axum::Json;
use uuid::Uuid;

use crate::ApiError;

/// Header carrying the caller's user id until real authentication exists.
pub const VIEWER_HEADER: &str = "x-user-id";

pub fn require_viewer(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let value = headers
        .get(VIEWER_HEADER)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| ApiError::bad_request("missing X-User-Id header"))?;

    Ok(social_feed::parse_id(value, "X-User-Id header")?)
}

/// Unwrap a JSON body, reporting malformed payloads in the API error format.
pub fn read_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}
