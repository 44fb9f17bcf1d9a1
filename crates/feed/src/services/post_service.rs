//! Post lifecycle, including the versioned update path.

use serde::Serialize;
use social_database::{
    CommentRepository, CommentWithAuthor, NewPost, Post, PostRepository, StoreError,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::mock_repositories::MockStore;
use crate::repositories::{CommentRepo, PostRepo};
use crate::types::{CreatePostRequest, FeedError, FeedResult, UpdatePostRequest};

/// A post with its comments, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostWithComments {
    #[serde(flatten)]
    pub post: Post,
    pub comments: Vec<CommentWithAuthor>,
}

pub struct PostService<P, C> {
    posts: P,
    comments: C,
}

impl PostService<PostRepository, CommentRepository> {
    pub fn new(posts: PostRepository, comments: CommentRepository) -> Self {
        Self { posts, comments }
    }
}

impl PostService<MockStore, MockStore> {
    pub fn new_for_testing(store: MockStore) -> Self {
        Self {
            posts: store.clone(),
            comments: store,
        }
    }
}

impl<P, C> PostService<P, C>
where
    P: PostRepo,
    C: CommentRepo,
{
    pub async fn create_post(&self, owner: Uuid, request: CreatePostRequest) -> FeedResult<Post> {
        request.validate()?;

        let new_post = NewPost {
            user_id: owner,
            title: request.title,
            content: request.content,
            tags: request.tags,
        };

        self.posts.create(&new_post).await.map_err(|err| match err {
            StoreError::ForeignKeyViolation(_) => FeedError::bad_input("author does not exist"),
            other => other.into(),
        })
    }

    /// Resolve a post once so later stages receive it explicitly.
    pub async fn load_post(&self, id: Uuid) -> FeedResult<Post> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| FeedError::not_found("post not found"))
    }

    pub async fn with_comments(&self, post: Post) -> FeedResult<PostWithComments> {
        let comments = self.comments.list_for_post(post.id).await?;
        Ok(PostWithComments { post, comments })
    }

    /// Persist `post` if the store still holds `post.version`, returning the
    /// new version. A stale version is a [`FeedError::Conflict`].
    pub async fn update_post(&self, post: &Post) -> FeedResult<i64> {
        match self.posts.update(post).await {
            Ok(version) => Ok(version),
            Err(err @ StoreError::StaleVersion { .. }) => {
                warn!(post_id = %post.id, expected = post.version, "post update lost a version race");
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Apply a partial update to `post` as last read and return it at its new
    /// version.
    pub async fn edit_post(&self, mut post: Post, request: UpdatePostRequest) -> FeedResult<Post> {
        request.validate()?;

        if let Some(title) = request.title {
            post.title = title;
        }
        if let Some(content) = request.content {
            post.content = content;
        }
        if let Some(tags) = request.tags {
            post.tags = tags;
        }

        post.version = self.update_post(&post).await?;
        // Re-read so updated_at reflects the committed row.
        match self.posts.find_by_id(post.id).await? {
            Some(stored) => Ok(stored),
            None => Err(FeedError::not_found("post not found")),
        }
    }

    pub async fn delete_post(&self, post: &Post) -> FeedResult<()> {
        self.posts.delete(post.id).await?;
        info!(post_id = %post.id, "post deleted");
        Ok(())
    }
}
