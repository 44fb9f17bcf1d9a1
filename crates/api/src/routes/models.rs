//! Wire shapes for the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use social_database::{CommentWithAuthor, FeedEntry, Post, User, UserSummary};
use social_feed::{
    CreateCommentRequest, CreatePostRequest, PostWithComments, SignupRequest, UpdatePostRequest,
};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// Successful responses wrap their payload as `{"data": ...}`.

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostEnvelope {
    pub data: PostResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostDetailEnvelope {
    pub data: PostDetailResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentEnvelope {
    pub data: CommentResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    pub data: UserResponse,
}

/// Acknowledgement without a payload, rendered as `{"data": null}`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EmptyEnvelope {
    pub data: Option<()>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSummaryResponse {
    pub id: Uuid,
    pub username: String,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_activated: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_activated: user.is_activated,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub user_id: Uuid,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            user_id: post.user_id,
            tags: post.tags,
            created_at: post.created_at,
            updated_at: post.updated_at,
            version: post.version,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub id: Uuid,
    pub content: String,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummaryResponse>,
}

impl From<social_database::Comment> for CommentResponse {
    fn from(comment: social_database::Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            post_id: comment.post_id,
            user_id: comment.user_id,
            created_at: comment.created_at,
            user: None,
        }
    }
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(value: CommentWithAuthor) -> Self {
        Self {
            user: Some(value.user.into()),
            ..value.comment.into()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

impl From<PostWithComments> for PostDetailResponse {
    fn from(value: PostWithComments) -> Self {
        Self {
            post: value.post.into(),
            comments: value.comments.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedEntryResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub user: UserSummaryResponse,
    pub comments_count: i64,
    pub top_comment_content: String,
    pub top_comment_user_id: Uuid,
}

impl From<FeedEntry> for FeedEntryResponse {
    fn from(entry: FeedEntry) -> Self {
        Self {
            post: entry.post.into(),
            user: entry.user.into(),
            comments_count: entry.comments_count,
            top_comment_content: entry.top_comment_content,
            top_comment_user_id: entry.top_comment_user_id,
        }
    }
}

/// One page of the viewer's feed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedPage {
    pub data: Vec<FeedEntryResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreatePostPayload {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<CreatePostPayload> for CreatePostRequest {
    fn from(payload: CreatePostPayload) -> Self {
        Self {
            title: payload.title,
            content: payload.content,
            tags: payload.tags,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdatePostPayload {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl From<UpdatePostPayload> for UpdatePostRequest {
    fn from(payload: UpdatePostPayload) -> Self {
        Self {
            title: payload.title,
            content: payload.content,
            tags: payload.tags,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateCommentPayload {
    pub content: String,
}

impl From<CreateCommentPayload> for CreateCommentRequest {
    fn from(payload: CreateCommentPayload) -> Self {
        Self {
            content: payload.content,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SignupPayload {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl From<SignupPayload> for SignupRequest {
    fn from(payload: SignupPayload) -> Self {
        Self {
            username: payload.username,
            email: payload.email,
            password: payload.password,
        }
    }
}

/// Feed query parameters. All are optional; see the endpoint description for
/// defaults and bounds.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[allow(dead_code)]
pub struct FeedQueryParams {
    /// Page size, 1 to 20 (default 20)
    pub limit: Option<i64>,
    /// Entries to skip (default 0)
    pub offset: Option<i64>,
    /// `ASC` or `DESC` by creation time (default `DESC`)
    pub sort: Option<String>,
    /// Comma separated tags, at most 5
    pub tags: Option<String>,
    /// Case-insensitive substring of title or content, at most 100 characters
    pub search: Option<String>,
    /// RFC 3339 lower bound on creation time, inclusive
    pub from: Option<String>,
    /// RFC 3339 upper bound on creation time, inclusive
    pub to: Option<String>,
}
