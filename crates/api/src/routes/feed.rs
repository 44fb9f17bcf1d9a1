//! Personalised feed endpoint

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use social_feed::PaginationQuery;
use tracing::debug;

use super::models::{FeedEntryResponse, FeedPage, FeedQueryParams};
use crate::error::{ApiResult, ErrorResponse};
use crate::state::AppState;
use crate::util::require_viewer;

/// Page through posts by the viewer and the accounts they follow.
///
/// Parameters arrive as raw strings so that empty values fall back to their
/// defaults and malformed numbers are reported in the API error format.
#[utoipa::path(
    get,
    path = "/v1/users/feed",
    tag = "Feed",
    params(
        FeedQueryParams,
        ("x-user-id" = String, Header, description = "Id of the viewing user")
    ),
    responses(
        (status = 200, description = "One page of feed entries", body = FeedPage),
        (status = 400, description = "Invalid pagination parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_feed(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<FeedPage>> {
    let viewer = require_viewer(&headers)?;

    let query = PaginationQuery::parse(&params, state.feed_defaults())?;
    state.validator().validate(&query)?;
    debug!(?query, %viewer, "serving feed");

    let entries = state.feed_service().feed(viewer, query).await?;

    Ok(Json(FeedPage {
        data: entries.into_iter().map(FeedEntryResponse::from).collect(),
    }))
}
