//! Business logic services for the social backend.
//!
//! Every service is generic over the repository traits it needs. The `new`
//! constructors wire the sqlx repositories and `new_for_testing` wires a
//! shared [`MockStore`].

pub mod auth_service;
pub mod comment_service;
pub mod feed_service;
pub mod mock_repositories;
pub mod post_service;
pub mod user_service;

pub use auth_service::{hash_password, AuthService};
pub use comment_service::CommentService;
pub use feed_service::FeedService;
pub use mock_repositories::MockStore;
pub use post_service::{PostService, PostWithComments};
pub use user_service::UserService;
