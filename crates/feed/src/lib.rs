//! # Social Feed Crate
//!
//! Business logic for the social backend: the pagination query model, the
//! feed assembler, the versioned post update path and the surrounding post,
//! comment, follow and signup operations.
//!
//! ## Architecture
//!
//! - **Pagination**: raw query parameters to a validated [`PaginationQuery`]
//! - **Services**: feed, posts, comments, users, auth
//! - **Repositories**: one trait per entity, backed by `social-database`
//! - **Types**: errors and request payloads
//!
//! ## Usage
//!
//! ```rust,ignore
//! use social_feed::{FeedQueryValidator, FeedService, PaginationQuery};
//!
//! let query = PaginationQuery::parse(&params, PaginationQuery::default())?;
//! validator.validate(&query)?;
//! let entries = feed_service.feed(viewer, query).await?;
//! ```

pub mod pagination;
pub mod repositories;
pub mod services;
pub mod types;
pub mod utils;

pub use pagination::{FeedQueryValidator, PaginationQuery};
pub use repositories::{CommentRepo, FeedRepo, FollowRepo, InviteRepo, PostRepo, UserRepo};
pub use services::{
    hash_password, AuthService, CommentService, FeedService, MockStore, PostService, PostWithComments,
    UserService,
};
pub use types::{
    CreateCommentRequest, CreatePostRequest, FeedError, FeedResult, FieldError, SignupRequest,
    UpdatePostRequest, ValidationErrors,
};
pub use utils::validation::parse_id;
