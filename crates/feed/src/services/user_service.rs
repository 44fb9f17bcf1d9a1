//! User lookup and follow management.

use social_database::{FollowEdge, FollowRepository, User, UserRepository};
use tracing::{debug, info};
use uuid::Uuid;

use super::mock_repositories::MockStore;
use crate::repositories::{FollowRepo, UserRepo};
use crate::types::{FeedError, FeedResult};

const FOLLOW_CONFLICT: &str = "already followed or user you are trying to follow does not exist";

pub struct UserService<U, F> {
    users: U,
    follows: F,
}

impl UserService<UserRepository, FollowRepository> {
    pub fn new(users: UserRepository, follows: FollowRepository) -> Self {
        Self { users, follows }
    }
}

impl UserService<MockStore, MockStore> {
    pub fn new_for_testing(store: MockStore) -> Self {
        Self {
            users: store.clone(),
            follows: store,
        }
    }
}

impl<U, F> UserService<U, F>
where
    U: UserRepo,
    F: FollowRepo,
{
    /// Resolve a user once so later stages receive it explicitly.
    pub async fn load_user(&self, id: Uuid) -> FeedResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| FeedError::not_found("user not found"))
    }

    /// Make `viewer` follow `target`.
    pub async fn follow(&self, target: &User, viewer: Uuid) -> FeedResult<()> {
        if target.id == viewer {
            return Err(FeedError::bad_input("users cannot follow themselves"));
        }

        match self.follows.follow(FollowEdge::new(target.id, viewer)).await {
            Ok(()) => {
                info!(user_id = %target.id, follower_id = %viewer, "user followed");
                Ok(())
            }
            Err(err) if err.is_constraint_violation() => Err(FeedError::conflict(FOLLOW_CONFLICT)),
            Err(err) => Err(err.into()),
        }
    }

    /// Remove the follow edge. A missing edge is not an error.
    pub async fn unfollow(&self, target: &User, viewer: Uuid) -> FeedResult<()> {
        let removed = self
            .follows
            .unfollow(FollowEdge::new(target.id, viewer))
            .await?;

        debug!(user_id = %target.id, follower_id = %viewer, removed, "unfollow processed");
        Ok(())
    }
}
