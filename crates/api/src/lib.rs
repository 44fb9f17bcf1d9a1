//! # Social API Crate
//!
//! HTTP surface for the social backend. Routes live under `/v1`, successful
//! responses are wrapped in a `{"data": ...}` envelope and failures render as
//! `{"error": "..."}`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use social_api::{build_router, AppState};
//!
//! let state = AppState::new(database, &config, env!("CARGO_PKG_VERSION"));
//! let app = build_router(state, &config.http);
//! axum::serve(listener, app).await?;
//! ```

pub mod docs;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod util;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use state::AppState;
pub use util::VIEWER_HEADER;

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, Method},
    middleware as axum_middleware,
    routing::get,
    Router,
};
use social_config::HttpConfig;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};

/// Largest request body accepted by JSON endpoints.
pub const MAX_BODY_BYTES: usize = 1_048_578;

/// Create the application router with all routes and layers.
pub fn build_router(state: AppState, http: &HttpConfig) -> Router {
    let api = routes::create_rest_routes().route("/openapi.json", get(docs::openapi_json));

    Router::new()
        .nest("/v1", api)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(Duration::from_secs(
            http.request_timeout_seconds,
        )))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::ACCEPT,
                    HeaderName::from_static(VIEWER_HEADER),
                ]),
        )
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
