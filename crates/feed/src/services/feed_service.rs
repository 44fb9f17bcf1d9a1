//! Feed assembly.

use social_database::{FeedEntry, FeedRepository};
use tracing::debug;
use uuid::Uuid;

use super::mock_repositories::MockStore;
use crate::pagination::PaginationQuery;
use crate::repositories::FeedRepo;
use crate::types::FeedResult;

/// Builds a viewer's feed: their own posts plus those of every account they
/// follow, ordered by creation time and windowed by the query.
pub struct FeedService<Q> {
    feed: Q,
}

impl FeedService<FeedRepository> {
    pub fn new(feed: FeedRepository) -> Self {
        Self { feed }
    }
}

impl FeedService<MockStore> {
    pub fn new_for_testing(store: MockStore) -> Self {
        Self { feed: store }
    }
}

impl<Q> FeedService<Q>
where
    Q: FeedRepo,
{
    /// `query` must already have passed
    /// [`FeedQueryValidator::validate`](crate::FeedQueryValidator::validate).
    pub async fn feed(&self, viewer: Uuid, query: PaginationQuery) -> FeedResult<Vec<FeedEntry>> {
        let selection = query.into_selection(viewer)?;
        let entries = self.feed.fetch(&selection).await?;

        debug!(
            viewer = %viewer,
            entries = entries.len(),
            "feed assembled"
        );
        Ok(entries)
    }
}
