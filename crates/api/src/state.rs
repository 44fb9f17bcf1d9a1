use std::sync::Arc;

use social_config::AppConfig;
use social_database::{
    CommentRepository, DatabaseConnection, FeedRepository, FollowRepository, InviteRepository,
    PostRepository, UserRepository,
};
use social_feed::{
    AuthService, CommentService, FeedQueryValidator, FeedService, PaginationQuery, PostService,
    UserService,
};

#[derive(Clone)]
pub struct AppState {
    database: DatabaseConnection,
    validator: Arc<FeedQueryValidator>,
    feed_defaults: Arc<PaginationQuery>,
    env: Arc<str>,
    version: Arc<str>,
}

impl AppState {
    pub fn new(database: DatabaseConnection, config: &AppConfig, version: &str) -> Self {
        Self {
            database,
            validator: Arc::new(FeedQueryValidator::new(&config.feed)),
            feed_defaults: Arc::new(PaginationQuery::with_defaults(&config.feed)),
            env: Arc::from(config.env.as_str()),
            version: Arc::from(version),
        }
    }

    pub fn database(&self) -> &DatabaseConnection {
        &self.database
    }

    pub fn validator(&self) -> &FeedQueryValidator {
        &self.validator
    }

    pub fn feed_defaults(&self) -> PaginationQuery {
        PaginationQuery::clone(&self.feed_defaults)
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn feed_service(&self) -> FeedService<FeedRepository> {
        FeedService::new(self.database.feed())
    }

    pub fn post_service(&self) -> PostService<PostRepository, CommentRepository> {
        PostService::new(self.database.posts(), self.database.comments())
    }

    pub fn comment_service(&self) -> CommentService<CommentRepository, UserRepository> {
        CommentService::new(self.database.comments(), self.database.users())
    }

    pub fn user_service(&self) -> UserService<UserRepository, FollowRepository> {
        UserService::new(self.database.users(), self.database.follows())
    }

    pub fn auth_service(&self) -> AuthService<UserRepository, InviteRepository> {
        AuthService::new(self.database.users(), self.database.invites())
    }
}
