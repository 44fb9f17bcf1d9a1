//! Post and comment endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use super::models::{
    CommentEnvelope, CreateCommentPayload, CreatePostPayload, PostDetailEnvelope, PostEnvelope,
    UpdatePostPayload,
};
use crate::error::{ApiResult, ErrorResponse};
use crate::state::AppState;
use crate::util::{read_json, require_viewer};

pub fn create_post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(create_post))
        .route(
            "/posts/:post_id",
            get(get_post).patch(update_post).delete(delete_post),
        )
        .route("/posts/:post_id/comments", post(create_comment))
}

#[utoipa::path(
    post,
    path = "/v1/posts",
    tag = "Posts",
    params(
        ("x-user-id" = String, Header, description = "Id of the acting user")
    ),
    request_body = CreatePostPayload,
    responses(
        (status = 201, description = "Post created", body = PostEnvelope),
        (status = 400, description = "Invalid payload or unknown author", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreatePostPayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let owner = require_viewer(&headers)?;
    let payload = read_json(payload)?;

    let post = state
        .post_service()
        .create_post(owner, payload.into())
        .await?;

    info!(post_id = %post.id, user_id = %owner, "post created");
    Ok((
        StatusCode::CREATED,
        Json(PostEnvelope { data: post.into() }),
    ))
}

#[utoipa::path(
    get,
    path = "/v1/posts/{post_id}",
    tag = "Posts",
    params(
        ("post_id" = String, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post with its comments, newest first", body = PostDetailEnvelope),
        (status = 400, description = "Malformed post id", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<PostDetailEnvelope>> {
    let post_id = social_feed::parse_id(&post_id, "post id")?;
    let service = state.post_service();

    let post = service.load_post(post_id).await?;
    let detail = service.with_comments(post).await?;

    Ok(Json(PostDetailEnvelope {
        data: detail.into(),
    }))
}

#[utoipa::path(
    patch,
    path = "/v1/posts/{post_id}",
    tag = "Posts",
    params(
        ("post_id" = String, Path, description = "Post id")
    ),
    request_body = UpdatePostPayload,
    responses(
        (status = 200, description = "Post updated", body = PostEnvelope),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
        (status = 409, description = "Post was modified concurrently", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn update_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    payload: Result<Json<UpdatePostPayload>, JsonRejection>,
) -> ApiResult<Json<PostEnvelope>> {
    let post_id = social_feed::parse_id(&post_id, "post id")?;
    let payload = read_json(payload)?;
    let service = state.post_service();

    let post = service.load_post(post_id).await?;
    let updated = service.edit_post(post, payload.into()).await?;

    info!(post_id = %updated.id, version = updated.version, "post updated");
    Ok(Json(PostEnvelope {
        data: updated.into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/v1/posts/{post_id}",
    tag = "Posts",
    params(
        ("post_id" = String, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 404, description = "Post not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<StatusCode> {
    let post_id = social_feed::parse_id(&post_id, "post id")?;
    let service = state.post_service();

    let post = service.load_post(post_id).await?;
    service.delete_post(&post).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/v1/posts/{post_id}/comments",
    tag = "Posts",
    params(
        ("post_id" = String, Path, description = "Post id"),
        ("x-user-id" = String, Header, description = "Id of the acting user")
    ),
    request_body = CreateCommentPayload,
    responses(
        (status = 201, description = "Comment created", body = CommentEnvelope),
        (status = 400, description = "Invalid payload or unknown author", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_comment(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<CreateCommentPayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let post_id = social_feed::parse_id(&post_id, "post id")?;
    let author = require_viewer(&headers)?;
    let payload = read_json(payload)?;

    let post = state.post_service().load_post(post_id).await?;
    let comment = state
        .comment_service()
        .create_comment(post.id, author, payload.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentEnvelope {
            data: comment.into(),
        }),
    ))
}
