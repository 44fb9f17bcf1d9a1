use axum::Json;
use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::routes::{auth, feed, health, models, posts, users};

#[derive(OpenApi)]
#[openapi(
    info(title = "Social API", description = "Posts, comments, follows and the personalised feed"),
    paths(
        health::health_check,
        posts::create_post,
        posts::get_post,
        posts::update_post,
        posts::delete_post,
        posts::create_comment,
        users::get_user,
        users::follow_user,
        users::unfollow_user,
        feed::get_feed,
        auth::signup,
        auth::activate,
    ),
    components(
        schemas(
            ErrorResponse,
            health::HealthResponse,
            models::PostEnvelope,
            models::PostDetailEnvelope,
            models::CommentEnvelope,
            models::UserEnvelope,
            models::FeedPage,
            models::PostResponse,
            models::PostDetailResponse,
            models::CommentResponse,
            models::UserResponse,
            models::UserSummaryResponse,
            models::FeedEntryResponse,
            models::CreatePostPayload,
            models::UpdatePostPayload,
            models::CreateCommentPayload,
            models::SignupPayload,
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Posts", description = "Posts and their comments"),
        (name = "Users", description = "Profiles and follow edges"),
        (name = "Feed", description = "Personalised feed"),
        (name = "Auth", description = "Signup and activation"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
