//! Shared types for the feed domain.

pub mod errors;
pub mod requests;

pub use errors::{FeedError, FeedResult, FieldError, ValidationErrors};
pub use requests::{CreateCommentRequest, CreatePostRequest, SignupRequest, UpdatePostRequest};
