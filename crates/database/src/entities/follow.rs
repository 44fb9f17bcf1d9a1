//! Follow edge definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directed edge: `follower_id` sees posts owned by `user_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FollowEdge {
    pub user_id: Uuid,
    pub follower_id: Uuid,
}

impl FollowEdge {
    pub fn new(followed: Uuid, follower: Uuid) -> Self {
        Self {
            user_id: followed,
            follower_id: follower,
        }
    }
}
