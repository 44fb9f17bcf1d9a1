//! In-memory repository implementations for exercising the services without
//! a database. One shared state backs every trait so cross-entity rules
//! (parent posts, follow targets) behave like the real store.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use social_database::{
    Comment, CommentWithAuthor, FeedEntry, FeedSelection, FollowEdge, Invite, NewComment, NewPost,
    NewUser, Post, SortDirection, StoreError, StoreResult, User,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repositories::{CommentRepo, FeedRepo, FollowRepo, InviteRepo, PostRepo, UserRepo};

#[derive(Default)]
struct MockState {
    users: HashMap<Uuid, User>,
    invites: HashMap<Uuid, Invite>,
    posts: HashMap<Uuid, Post>,
    comments: Vec<Comment>,
    follows: HashSet<FollowEdge>,
    unavailable: bool,
}

impl MockState {
    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable {
            Err(StoreError::Timeout(Duration::from_millis(0)))
        } else {
            Ok(())
        }
    }

    fn require_user(&self, id: Uuid) -> StoreResult<()> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::ForeignKeyViolation(format!("users.id {id}")))
        }
    }

    fn username(&self, id: Uuid) -> String {
        self.users
            .get(&id)
            .map(|user| user.username.clone())
            .unwrap_or_default()
    }
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Shared in-memory store implementing every repository trait.
#[derive(Clone, Default)]
pub struct MockStore {
    state: Arc<RwLock<MockState>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the store timed out.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.write().await.unavailable = unavailable;
    }

    pub async fn insert_user(&self, username: &str) -> User {
        let user = User {
            id: Uuid::now_v7(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: String::new(),
            is_activated: true,
            created_at: now(),
        };
        self.state.write().await.users.insert(user.id, user.clone());
        user
    }

    pub async fn insert_post(&self, post: Post) {
        self.state.write().await.posts.insert(post.id, post);
    }

    pub async fn insert_comment(&self, comment: Comment) {
        self.state.write().await.comments.push(comment);
    }

    pub async fn insert_follow(&self, edge: FollowEdge) {
        self.state.write().await.follows.insert(edge);
    }

    pub async fn post(&self, id: Uuid) -> Option<Post> {
        self.state.read().await.posts.get(&id).cloned()
    }

    pub async fn user(&self, id: Uuid) -> Option<User> {
        self.state.read().await.users.get(&id).cloned()
    }

    pub async fn follow_count(&self) -> usize {
        self.state.read().await.follows.len()
    }

    pub async fn invites_for(&self, user_id: Uuid) -> Vec<Invite> {
        self.state
            .read()
            .await
            .invites
            .values()
            .filter(|invite| invite.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn set_invite_expiry(&self, token: Uuid, expires_at: DateTime<Utc>) {
        if let Some(invite) = self.state.write().await.invites.get_mut(&token) {
            invite.expires_at = expires_at;
        }
    }
}

#[async_trait]
impl UserRepo for MockStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        state.check_available()?;
        Ok(state.users.get(&id).cloned())
    }

    async fn create_with_invite(
        &self,
        request: &NewUser,
        invite_token: Uuid,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<(User, Invite)> {
        let mut state = self.state.write().await;
        state.check_available()?;

        if state
            .users
            .values()
            .any(|u| u.username == request.username || u.email == request.email)
        {
            return Err(StoreError::UniqueViolation("users".to_string()));
        }
        if state.invites.contains_key(&invite_token) {
            return Err(StoreError::UniqueViolation("user_invites".to_string()));
        }

        let created_at = now();
        let user = User {
            id: Uuid::now_v7(),
            username: request.username.clone(),
            email: request.email.clone(),
            password_hash: request.password_hash.clone(),
            is_activated: false,
            created_at,
        };
        let invite = Invite {
            user_id: user.id,
            invite_token,
            expires_at,
            sent_count: 1,
            created_at,
            last_seen_at: created_at,
        };

        state.users.insert(user.id, user.clone());
        state.invites.insert(invite_token, invite.clone());
        Ok((user, invite))
    }

    async fn activate(&self, user_id: Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.check_available()?;

        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::not_found("user", user_id))?;
        user.is_activated = true;
        state.invites.retain(|_, invite| invite.user_id != user_id);
        Ok(())
    }
}

#[async_trait]
impl InviteRepo for MockStore {
    async fn find_by_token(&self, token: Uuid) -> StoreResult<Option<Invite>> {
        let state = self.state.read().await;
        state.check_available()?;
        Ok(state.invites.get(&token).cloned())
    }
}

#[async_trait]
impl PostRepo for MockStore {
    async fn create(&self, request: &NewPost) -> StoreResult<Post> {
        let mut state = self.state.write().await;
        state.check_available()?;
        state.require_user(request.user_id)?;

        let created_at = now();
        let post = Post {
            id: Uuid::now_v7(),
            title: request.title.clone(),
            content: request.content.clone(),
            tags: request.tags.clone(),
            user_id: request.user_id,
            created_at,
            updated_at: created_at,
            version: 0,
        };
        state.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Post>> {
        let state = self.state.read().await;
        state.check_available()?;
        Ok(state.posts.get(&id).cloned())
    }

    async fn update(&self, post: &Post) -> StoreResult<i64> {
        let mut state = self.state.write().await;
        state.check_available()?;

        let stored = state
            .posts
            .get_mut(&post.id)
            .ok_or_else(|| StoreError::not_found("post", post.id))?;
        if stored.version != post.version {
            return Err(StoreError::StaleVersion {
                id: post.id,
                expected: post.version,
            });
        }

        stored.title = post.title.clone();
        stored.content = post.content.clone();
        stored.tags = post.tags.clone();
        stored.updated_at = now();
        stored.version += 1;
        Ok(stored.version)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.check_available()?;

        if state.posts.remove(&id).is_none() {
            return Err(StoreError::not_found("post", id));
        }
        state.comments.retain(|comment| comment.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl CommentRepo for MockStore {
    async fn create(&self, request: &NewComment) -> StoreResult<Comment> {
        let mut state = self.state.write().await;
        state.check_available()?;

        if !state.posts.contains_key(&request.post_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "posts.id {}",
                request.post_id
            )));
        }
        state.require_user(request.user_id)?;

        let comment = Comment {
            id: Uuid::now_v7(),
            content: request.content.clone(),
            post_id: request.post_id,
            user_id: request.user_id,
            created_at: now(),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_for_post(&self, post_id: Uuid) -> StoreResult<Vec<CommentWithAuthor>> {
        let state = self.state.read().await;
        state.check_available()?;

        let mut comments: Vec<_> = state
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(newest_first);

        Ok(comments
            .into_iter()
            .map(|comment| CommentWithAuthor {
                user: social_database::UserSummary {
                    id: comment.user_id,
                    username: state.username(comment.user_id),
                },
                comment,
            })
            .collect())
    }
}

fn newest_first(a: &Comment, b: &Comment) -> Ordering {
    (b.created_at, b.id).cmp(&(a.created_at, a.id))
}

#[async_trait]
impl FollowRepo for MockStore {
    async fn follow(&self, edge: FollowEdge) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.check_available()?;
        state.require_user(edge.user_id)?;
        state.require_user(edge.follower_id)?;

        if !state.follows.insert(edge) {
            return Err(StoreError::UniqueViolation("followers".to_string()));
        }
        Ok(())
    }

    async fn unfollow(&self, edge: FollowEdge) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        state.check_available()?;
        Ok(state.follows.remove(&edge))
    }
}

#[async_trait]
impl FeedRepo for MockStore {
    async fn fetch(&self, selection: &FeedSelection) -> StoreResult<Vec<FeedEntry>> {
        let state = self.state.read().await;
        state.check_available()?;

        let followed: Vec<Uuid> = state
            .follows
            .iter()
            .filter(|edge| edge.follower_id == selection.viewer)
            .map(|edge| edge.user_id)
            .collect();

        let mut posts: Vec<&Post> = state
            .posts
            .values()
            .filter(|post| state.users.contains_key(&post.user_id))
            .filter(|post| selection.admits(post, &followed))
            .collect();
        posts.sort_by(|a, b| {
            let ordering = (a.created_at, a.id).cmp(&(b.created_at, b.id));
            match selection.sort {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let offset = usize::try_from(selection.offset).unwrap_or(0);
        let limit = usize::try_from(selection.limit).unwrap_or(0);

        Ok(posts
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|post| {
                let mut comments: Vec<&Comment> = state
                    .comments
                    .iter()
                    .filter(|comment| comment.post_id == post.id)
                    .collect();
                comments.sort_by(|a, b| newest_first(a, b));
                let top = comments.first();

                FeedEntry {
                    post: post.clone(),
                    user: social_database::UserSummary {
                        id: post.user_id,
                        username: state.username(post.user_id),
                    },
                    comments_count: comments.len() as i64,
                    top_comment_content: top.map(|c| c.content.clone()).unwrap_or_default(),
                    top_comment_user_id: top.map(|c| c.user_id).unwrap_or_else(Uuid::nil),
                }
            })
            .collect())
    }
}
