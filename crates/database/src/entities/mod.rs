//! Domain entities for the database layer

pub mod comment;
pub mod feed;
pub mod follow;
pub mod invite;
pub mod post;
pub mod user;

pub use comment::{Comment, CommentWithAuthor, NewComment};
pub use feed::{FeedEntry, FeedSelection, SortDirection};
pub use follow::FollowEdge;
pub use invite::Invite;
pub use post::{NewPost, Post};
pub use user::{NewUser, User, UserSummary};
