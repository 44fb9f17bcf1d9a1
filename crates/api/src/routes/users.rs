//! User profile and follow endpoints

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, put},
    Json, Router,
};

use super::feed::get_feed;
use super::models::UserEnvelope;
use crate::error::{ApiResult, ErrorResponse};
use crate::state::AppState;
use crate::util::require_viewer;

pub fn create_user_routes() -> Router<AppState> {
    Router::new()
        // Static segment first so it is never captured as a user id.
        .route("/users/feed", get(get_feed))
        .route("/users/:user_id", get(get_user))
        .route("/users/:user_id/follow", put(follow_user))
        .route("/users/:user_id/unfollow", put(unfollow_user))
}

#[utoipa::path(
    get,
    path = "/v1/users/{user_id}",
    tag = "Users",
    params(
        ("user_id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User profile", body = UserEnvelope),
        (status = 400, description = "Malformed user id", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserEnvelope>> {
    let user_id = social_feed::parse_id(&user_id, "user id")?;
    let user = state.user_service().load_user(user_id).await?;

    Ok(Json(UserEnvelope { data: user.into() }))
}

#[utoipa::path(
    put,
    path = "/v1/users/{user_id}/follow",
    tag = "Users",
    params(
        ("user_id" = String, Path, description = "User to follow"),
        ("x-user-id" = String, Header, description = "Id of the acting user")
    ),
    responses(
        (status = 204, description = "Now following"),
        (status = 400, description = "Malformed id or self follow", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Already followed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn follow_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let user_id = social_feed::parse_id(&user_id, "user id")?;
    let service = state.user_service();

    let target = service.load_user(user_id).await?;
    let viewer = require_viewer(&headers)?;
    service.follow(&target, viewer).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/v1/users/{user_id}/unfollow",
    tag = "Users",
    params(
        ("user_id" = String, Path, description = "User to unfollow"),
        ("x-user-id" = String, Header, description = "Id of the acting user")
    ),
    responses(
        (status = 204, description = "No longer following"),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn unfollow_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let user_id = social_feed::parse_id(&user_id, "user id")?;
    let service = state.user_service();

    let target = service.load_user(user_id).await?;
    let viewer = require_viewer(&headers)?;
    service.unfollow(&target, viewer).await?;

    Ok(StatusCode::NO_CONTENT)
}
