//! REST endpoints, mounted under `/v1`.

pub mod auth;
pub mod feed;
pub mod health;
pub mod models;
pub mod posts;
pub mod users;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn create_rest_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(posts::create_post_routes())
        .merge(users::create_user_routes())
        .merge(auth::create_auth_routes())
}
