//! Repository seams for the feed services.
//!
//! Each entity gets one trait. The store-backed implementations delegate to
//! the sqlx repositories in `social-database`; the in-memory doubles live in
//! [`crate::services::mock_repositories`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use social_database::{
    Comment, CommentRepository, CommentWithAuthor, FeedEntry, FeedRepository, FeedSelection,
    FollowEdge, FollowRepository, Invite, InviteRepository, NewComment, NewPost, NewUser, Post,
    PostRepository, StoreResult, User, UserRepository,
};
use uuid::Uuid;

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn create_with_invite(
        &self,
        request: &NewUser,
        invite_token: Uuid,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<(User, Invite)>;
    async fn activate(&self, user_id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait InviteRepo: Send + Sync {
    async fn find_by_token(&self, token: Uuid) -> StoreResult<Option<Invite>>;
}

#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn create(&self, request: &NewPost) -> StoreResult<Post>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Post>>;
    /// Compare-and-increment on `post.version`; returns the new version.
    async fn update(&self, post: &Post) -> StoreResult<i64>;
    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn create(&self, request: &NewComment) -> StoreResult<Comment>;
    async fn list_for_post(&self, post_id: Uuid) -> StoreResult<Vec<CommentWithAuthor>>;
}

#[async_trait]
pub trait FollowRepo: Send + Sync {
    async fn follow(&self, edge: FollowEdge) -> StoreResult<()>;
    async fn unfollow(&self, edge: FollowEdge) -> StoreResult<bool>;
}

#[async_trait]
pub trait FeedRepo: Send + Sync {
    async fn fetch(&self, selection: &FeedSelection) -> StoreResult<Vec<FeedEntry>>;
}

#[async_trait]
impl UserRepo for UserRepository {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.find_by_id(id).await
    }

    async fn create_with_invite(
        &self,
        request: &NewUser,
        invite_token: Uuid,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<(User, Invite)> {
        self.create_with_invite(request, invite_token, expires_at)
            .await
    }

    async fn activate(&self, user_id: Uuid) -> StoreResult<()> {
        self.activate(user_id).await
    }
}

#[async_trait]
impl InviteRepo for InviteRepository {
    async fn find_by_token(&self, token: Uuid) -> StoreResult<Option<Invite>> {
        self.find_by_token(token).await
    }
}

#[async_trait]
impl PostRepo for PostRepository {
    async fn create(&self, request: &NewPost) -> StoreResult<Post> {
        self.create(request).await
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Post>> {
        self.find_by_id(id).await
    }

    async fn update(&self, post: &Post) -> StoreResult<i64> {
        self.update(post).await
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.delete(id).await
    }
}

#[async_trait]
impl CommentRepo for CommentRepository {
    async fn create(&self, request: &NewComment) -> StoreResult<Comment> {
        self.create(request).await
    }

    async fn list_for_post(&self, post_id: Uuid) -> StoreResult<Vec<CommentWithAuthor>> {
        self.list_for_post(post_id).await
    }
}

#[async_trait]
impl FollowRepo for FollowRepository {
    async fn follow(&self, edge: FollowEdge) -> StoreResult<()> {
        self.follow(edge).await
    }

    async fn unfollow(&self, edge: FollowEdge) -> StoreResult<bool> {
        self.unfollow(edge).await
    }
}

#[async_trait]
impl FeedRepo for FeedRepository {
    async fn fetch(&self, selection: &FeedSelection) -> StoreResult<Vec<FeedEntry>> {
        self.fetch(selection).await
    }
}
