//! Feed selection and feed entry definitions
//!
//! `FeedSelection` is the store-level descriptor the feed query is built
//! from. It is always derived from an already validated pagination query, so
//! the repository does not re-check bounds.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Post, UserSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    /// Exact, case-sensitive match on `ASC` / `DESC`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            other => Err(format!("unsupported sort direction {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedSelection {
    /// Eligible owners are this account plus everyone it follows.
    pub viewer: Uuid,
    pub sort: SortDirection,
    pub limit: i64,
    pub offset: i64,
    pub tags: Vec<String>,
    pub search: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl FeedSelection {
    pub fn for_viewer(viewer: Uuid) -> Self {
        Self {
            viewer,
            sort: SortDirection::Desc,
            limit: 20,
            offset: 0,
            tags: Vec::new(),
            search: None,
            from: None,
            to: None,
        }
    }

    /// The search term, if any, lowercased. Empty terms mean no filter.
    ///
    /// Case folding covers ASCII only, the same as SQLite's `LOWER`, so
    /// non-ASCII letters such as `É` and `é` compare exactly.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|term| !term.is_empty())
            .map(|term| term.to_ascii_lowercase())
    }

    /// Whether `post` passes every predicate of the selection, excluding the
    /// offset/limit window. `followed` is the set of accounts the viewer
    /// follows.
    pub fn admits(&self, post: &Post, followed: &[Uuid]) -> bool {
        if post.user_id != self.viewer && !followed.contains(&post.user_id) {
            return false;
        }

        if !self.tags.is_empty() && !post.tags.iter().any(|tag| self.tags.contains(tag)) {
            return false;
        }

        if let Some(term) = self.search_term() {
            let title = post.title.to_ascii_lowercase();
            let content = post.content.to_ascii_lowercase();
            if !title.contains(&term) && !content.contains(&term) {
                return false;
            }
        }

        if self.from.is_some_and(|from| post.created_at < from) {
            return false;
        }

        if self.to.is_some_and(|to| post.created_at > to) {
            return false;
        }

        true
    }
}

/// A post annotated for the feed. Computed per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    #[serde(flatten)]
    pub post: Post,
    pub user: UserSummary,
    pub comments_count: i64,
    pub top_comment_content: String,
    pub top_comment_user_id: Uuid,
}
