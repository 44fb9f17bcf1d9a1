//! Feed pagination query model.
//!
//! Raw query parameters are parsed over a set of defaults into a
//! [`PaginationQuery`], checked by a [`FeedQueryValidator`] built once from
//! configuration, and finally lowered into the store's [`FeedSelection`].
//!
//! Integer parameters that do not parse fail the whole request. Dates that do
//! not parse as RFC 3339 are ignored and keep their previous value.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use social_config::FeedConfig;
use social_database::{FeedSelection, SortDirection};
use tracing::debug;
use uuid::Uuid;

use crate::types::{FeedError, FeedResult, ValidationErrors};

#[derive(Debug, Clone, PartialEq)]
pub struct PaginationQuery {
    pub limit: i64,
    pub offset: i64,
    /// Kept verbatim so validation can reject unknown directions.
    pub sort: String,
    pub tags: Vec<String>,
    pub search: String,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
            sort: SortDirection::Desc.to_string(),
            tags: Vec::new(),
            search: String::new(),
            from: None,
            to: None,
        }
    }
}

impl PaginationQuery {
    pub fn with_defaults(config: &FeedConfig) -> Self {
        Self {
            limit: config.default_limit,
            ..Self::default()
        }
    }

    /// Merge `raw` over `defaults`. Empty values count as absent.
    pub fn parse(raw: &HashMap<String, String>, defaults: PaginationQuery) -> FeedResult<Self> {
        let mut query = defaults;

        if let Some(limit) = param(raw, "limit") {
            query.limit = limit
                .parse()
                .map_err(|_| FeedError::bad_input(format!("limit must be an integer, got {limit:?}")))?;
        }

        if let Some(offset) = param(raw, "offset") {
            query.offset = offset
                .parse()
                .map_err(|_| FeedError::bad_input(format!("offset must be an integer, got {offset:?}")))?;
        }

        if let Some(sort) = param(raw, "sort") {
            query.sort = sort.to_string();
        }

        if let Some(tags) = param(raw, "tags") {
            query.tags = tags.split(',').map(str::to_string).collect();
        }

        if let Some(search) = param(raw, "search") {
            query.search = search.to_string();
        }

        if let Some(from) = param(raw, "from") {
            match parse_rfc3339(from) {
                Some(parsed) => query.from = Some(parsed),
                None => debug!(value = from, "ignoring unparseable from parameter"),
            }
        }

        if let Some(to) = param(raw, "to") {
            match parse_rfc3339(to) {
                Some(parsed) => query.to = Some(parsed),
                None => debug!(value = to, "ignoring unparseable to parameter"),
            }
        }

        Ok(query)
    }

    /// Lower a validated query into the store selection for `viewer`.
    pub fn into_selection(self, viewer: Uuid) -> FeedResult<FeedSelection> {
        let sort = self.sort.parse::<SortDirection>().map_err(FeedError::BadInput)?;

        Ok(FeedSelection {
            viewer,
            sort,
            limit: self.limit,
            offset: self.offset,
            tags: self.tags,
            search: Some(self.search).filter(|term| !term.is_empty()),
            from: self.from,
            to: self.to,
        })
    }
}

fn param<'a>(raw: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    raw.get(name).map(String::as_str).filter(|value| !value.is_empty())
}

fn parse_rfc3339(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Stateless checker for pagination queries, constructed once at startup and
/// shared by reference.
#[derive(Debug, Clone)]
pub struct FeedQueryValidator {
    max_limit: i64,
    max_tags: usize,
    max_search_len: usize,
}

impl Default for FeedQueryValidator {
    fn default() -> Self {
        Self::new(&FeedConfig::default())
    }
}

impl FeedQueryValidator {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            max_limit: config.max_limit,
            max_tags: config.max_tags,
            max_search_len: config.max_search_len,
        }
    }

    pub fn validate(&self, query: &PaginationQuery) -> FeedResult<()> {
        self.validate_at(query, Utc::now())
    }

    /// Same as [`validate`](Self::validate) with an explicit clock.
    pub fn validate_at(&self, query: &PaginationQuery, now: DateTime<Utc>) -> FeedResult<()> {
        let mut errors = ValidationErrors::new();

        if query.limit < 1 || query.limit > self.max_limit {
            errors.add("limit", format!("must be between 1 and {}", self.max_limit));
        }

        if query.offset < 0 {
            errors.add("offset", "must not be negative");
        }

        if query.sort.parse::<SortDirection>().is_err() {
            errors.add("sort", "must be one of ASC, DESC");
        }

        if query.tags.len() > self.max_tags {
            errors.add("tags", format!("must contain at most {} tags", self.max_tags));
        }

        if query.search.chars().count() > self.max_search_len {
            errors.add(
                "search",
                format!("must be at most {} characters", self.max_search_len),
            );
        }

        if query.from.is_some_and(|from| from > now) {
            errors.add("from", "must not be in the future");
        }

        errors.into_result()
    }
}
