//! Account invite definitions

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of an invite issued at signup.
pub const INVITE_TTL_HOURS: i64 = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invite {
    pub user_id: Uuid,
    pub invite_token: Uuid,
    pub expires_at: DateTime<Utc>,
    pub sent_count: i64,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl Invite {
    pub fn ttl() -> Duration {
        Duration::hours(INVITE_TTL_HOURS)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}
