//! Comment creation and listing.

use social_database::{
    Comment, CommentRepository, CommentWithAuthor, NewComment, StoreError, UserRepository,
};
use uuid::Uuid;

use super::mock_repositories::MockStore;
use crate::repositories::{CommentRepo, UserRepo};
use crate::types::{CreateCommentRequest, FeedError, FeedResult};

pub struct CommentService<C, U> {
    comments: C,
    users: U,
}

impl CommentService<CommentRepository, UserRepository> {
    pub fn new(comments: CommentRepository, users: UserRepository) -> Self {
        Self { comments, users }
    }
}

impl CommentService<MockStore, MockStore> {
    pub fn new_for_testing(store: MockStore) -> Self {
        Self {
            comments: store.clone(),
            users: store,
        }
    }
}

impl<C, U> CommentService<C, U>
where
    C: CommentRepo,
    U: UserRepo,
{
    /// An unknown author is [`FeedError::BadInput`]. The author is resolved
    /// first, so a foreign key failure on insert means the parent post no
    /// longer exists and is reported as [`FeedError::MissingParent`].
    pub async fn create_comment(
        &self,
        post_id: Uuid,
        author: Uuid,
        request: CreateCommentRequest,
    ) -> FeedResult<Comment> {
        request.validate()?;

        if self.users.find_by_id(author).await?.is_none() {
            return Err(FeedError::bad_input("author does not exist"));
        }

        let new_comment = NewComment {
            post_id,
            user_id: author,
            content: request.content,
        };

        self.comments
            .create(&new_comment)
            .await
            .map_err(|err| match err {
                StoreError::ForeignKeyViolation(_) => {
                    FeedError::missing_parent("post does not exist")
                }
                other => other.into(),
            })
    }

    pub async fn comments_for_post(&self, post_id: Uuid) -> FeedResult<Vec<CommentWithAuthor>> {
        Ok(self.comments.list_for_post(post_id).await?)
    }
}
