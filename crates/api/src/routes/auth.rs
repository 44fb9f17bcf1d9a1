//! Signup and account activation endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use uuid::Uuid;

use super::models::{EmptyEnvelope, SignupPayload, UserEnvelope};
use crate::error::{ApiError, ApiResult, ErrorResponse};
use crate::state::AppState;
use crate::util::read_json;

pub fn create_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/activate/:token", post(activate))
}

#[utoipa::path(
    post,
    path = "/v1/auth/signup",
    tag = "Auth",
    request_body = SignupPayload,
    responses(
        (status = 201, description = "Account created, pending activation", body = UserEnvelope),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupPayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let payload = read_json(payload)?;

    let (user, _invite) = state.auth_service().signup(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope { data: user.into() }),
    ))
}

#[utoipa::path(
    post,
    path = "/v1/auth/activate/{token}",
    tag = "Auth",
    params(
        ("token" = String, Path, description = "Activation token issued at signup")
    ),
    responses(
        (status = 200, description = "Account activated"),
        (status = 400, description = "Malformed or expired token", body = ErrorResponse),
        (status = 404, description = "Token not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn activate(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<EmptyEnvelope>> {
    // Tokens are opaque to callers; anything that is not ours is simply unknown.
    let token = Uuid::parse_str(&token).map_err(|_| ApiError::not_found("invite not found"))?;

    state.auth_service().activate(token).await?;

    Ok(Json(EmptyEnvelope::default()))
}
