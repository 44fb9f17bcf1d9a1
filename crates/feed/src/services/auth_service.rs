//! Account signup and invite activation.

use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
use argon2::Argon2;
use chrono::Utc;
use social_database::{Invite, InviteRepository, NewUser, User, UserRepository};
use tracing::{info, warn};
use uuid::Uuid;

use super::mock_repositories::MockStore;
use crate::repositories::{InviteRepo, UserRepo};
use crate::types::{FeedError, FeedResult, SignupRequest};

pub struct AuthService<U, I> {
    users: U,
    invites: I,
}

impl AuthService<UserRepository, InviteRepository> {
    pub fn new(users: UserRepository, invites: InviteRepository) -> Self {
        Self { users, invites }
    }
}

impl AuthService<MockStore, MockStore> {
    pub fn new_for_testing(store: MockStore) -> Self {
        Self {
            users: store.clone(),
            invites: store,
        }
    }
}

impl<U, I> AuthService<U, I>
where
    U: UserRepo,
    I: InviteRepo,
{
    /// Register an unactivated user and issue its invite token.
    pub async fn signup(&self, request: SignupRequest) -> FeedResult<(User, Invite)> {
        request.validate()?;

        let password_hash = hash_password(&request.password)?;
        let new_user = NewUser {
            username: request.username,
            email: request.email,
            password_hash,
        };

        let token = Uuid::new_v4();
        let expires_at = Utc::now() + Invite::ttl();
        let (user, invite) = self
            .users
            .create_with_invite(&new_user, token, expires_at)
            .await
            .map_err(|err| {
                if err.is_constraint_violation() {
                    FeedError::conflict("username or email already taken")
                } else {
                    err.into()
                }
            })?;

        info!(user_id = %user.id, "user signed up");
        Ok((user, invite))
    }

    /// Redeem an invite token and activate its user.
    pub async fn activate(&self, token: Uuid) -> FeedResult<()> {
        let invite = self
            .invites
            .find_by_token(token)
            .await?
            .ok_or_else(|| FeedError::not_found("invite not found"))?;

        if invite.is_expired_at(Utc::now()) {
            warn!(user_id = %invite.user_id, "expired invite redeemed");
            return Err(FeedError::bad_input("token expired"));
        }

        self.users.activate(invite.user_id).await?;
        info!(user_id = %invite.user_id, "user activated");
        Ok(())
    }
}

/// Hash `password` with Argon2 using a fresh random salt.
pub fn hash_password(password: &str) -> FeedResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| FeedError::internal(format!("password hashing failed: {err}")))
}
