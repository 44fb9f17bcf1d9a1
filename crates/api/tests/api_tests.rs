//! Router-level tests against a migrated SQLite file.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use social_api::{build_router, AppState, VIEWER_HEADER};
use social_config::{AppConfig, DatabaseConfig};
use social_database::{initialize_database, DatabaseConnection};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestContext {
    _temp_dir: TempDir,
    database: DatabaseConnection,
    app: Router,
}

impl TestContext {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let config = AppConfig {
            env: "test".to_string(),
            database: DatabaseConfig {
                url: format!("sqlite://{}", temp_dir.path().join("api.db").display()),
                max_connections: 1,
                ..DatabaseConfig::default()
            },
            ..AppConfig::default()
        };

        let database = initialize_database(&config.database)
            .await
            .expect("failed to initialise database");
        let state = AppState::new(database.clone(), &config, "1.2.3");
        let app = build_router(state, &config.http);

        Self {
            _temp_dir: temp_dir,
            database,
            app,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        viewer: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(viewer) = viewer {
            builder = builder.header(VIEWER_HEADER, viewer);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is json")
        };

        (status, value)
    }

    async fn signup(&self, username: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/v1/auth/signup",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "hunter22",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_str().expect("user id").to_string()
    }

    async fn create_post(&self, owner: &str, title: &str, tags: &[&str]) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/v1/posts",
                Some(owner),
                Some(json!({ "title": title, "content": format!("{title} body"), "tags": tags })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"].clone()
    }

    async fn invite_token(&self, user_id: &str) -> String {
        sqlx::query_scalar::<_, String>("SELECT invite_token FROM user_invites WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(self.database.pool())
            .await
            .expect("invite exists")
    }
}

#[tokio::test]
async fn health_reports_env_and_version_without_envelope() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.send(Method::GET, "/v1/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "env": "test", "version": "1.2.3" }));
}

#[tokio::test]
async fn openapi_document_lists_feed_path() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.send(Method::GET, "/v1/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/v1/users/feed"].is_object());
}

#[tokio::test]
async fn signup_then_activate_marks_user_active() {
    let ctx = TestContext::new().await;
    let user_id = ctx.signup("alice").await;

    let (_, body) = ctx
        .send(Method::GET, &format!("/v1/users/{user_id}"), None, None)
        .await;
    assert_eq!(body["data"]["is_activated"], json!(false));
    assert!(body["data"].get("password_hash").is_none());

    let token = ctx.invite_token(&user_id).await;
    let (status, body) = ctx
        .send(Method::POST, &format!("/v1/auth/activate/{token}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": null }));

    let (_, body) = ctx
        .send(Method::GET, &format!("/v1/users/{user_id}"), None, None)
        .await;
    assert_eq!(body["data"]["is_activated"], json!(true));

    let (status, _) = ctx
        .send(Method::POST, &format!("/v1/auth/activate/{token}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn signup_rejects_duplicates_and_bad_payloads() {
    let ctx = TestContext::new().await;
    ctx.signup("alice").await;

    let (status, body) = ctx
        .send(
            Method::POST,
            "/v1/auth/signup",
            None,
            Some(json!({ "username": "alice", "email": "other@example.com", "password": "hunter22" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("username or email already taken"));

    let (status, body) = ctx
        .send(
            Method::POST,
            "/v1/auth/signup",
            None,
            Some(json!({ "username": "al", "email": "nope", "password": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("username"));

    let (status, _) = ctx
        .send(
            Method::POST,
            "/v1/auth/signup",
            None,
            Some(json!({ "username": "bobby", "email": "b@example.com", "password": "hunter22", "admin": true })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_lifecycle_maps_statuses() {
    let ctx = TestContext::new().await;
    let alice = ctx.signup("alice").await;

    let post = ctx.create_post(&alice, "hello", &["rust"]).await;
    let post_id = post["id"].as_str().unwrap().to_string();
    assert_eq!(post["version"], json!(0));

    let (status, body) = ctx
        .send(
            Method::POST,
            &format!("/v1/posts/{post_id}/comments"),
            Some(&alice),
            Some(json!({ "content": "first" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, body) = ctx
        .send(
            Method::PATCH,
            &format!("/v1/posts/{post_id}"),
            None,
            Some(json!({ "title": "hello again" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], json!("hello again"));
    assert_eq!(body["data"]["content"], json!("hello body"));
    assert_eq!(body["data"]["version"], json!(1));

    let (status, body) = ctx
        .send(Method::GET, &format!("/v1/posts/{post_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["comments"][0]["content"], json!("first"));
    assert_eq!(body["data"]["comments"][0]["user"]["username"], json!("alice"));

    let (status, body) = ctx
        .send(Method::DELETE, &format!("/v1/posts/{post_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = ctx
        .send(Method::GET, &format!("/v1/posts/{post_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("post not found"));

    let (status, _) = ctx
        .send(
            Method::POST,
            &format!("/v1/posts/{post_id}/comments"),
            Some(&alice),
            Some(json!({ "content": "late" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_endpoints_reject_malformed_input() {
    let ctx = TestContext::new().await;
    let alice = ctx.signup("alice").await;

    let (status, _) = ctx
        .send(Method::POST, "/v1/posts", None, Some(json!({ "title": "t", "content": "c" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = ctx
        .send(Method::POST, "/v1/posts", Some(&alice), Some(json!({ "title": "", "content": "c" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("title"));

    let (status, _) = ctx
        .send(Method::GET, "/v1/posts/not-an-id", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let stranger = uuid::Uuid::now_v7().to_string();
    let (status, body) = ctx
        .send(
            Method::POST,
            "/v1/posts",
            Some(&stranger),
            Some(json!({ "title": "t", "content": "c" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("author does not exist"));

    let post = ctx.create_post(&alice, "Hello", &[]).await;
    let post_id = post["id"].as_str().unwrap();
    let (status, body) = ctx
        .send(
            Method::POST,
            &format!("/v1/posts/{post_id}/comments"),
            Some(&stranger),
            Some(json!({ "content": "hi" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("author does not exist"));
}

#[tokio::test]
async fn follow_controls_feed_membership() {
    let ctx = TestContext::new().await;
    let alice = ctx.signup("alice").await;
    let bob = ctx.signup("bob").await;

    ctx.create_post(&alice, "from alice", &[]).await;
    ctx.create_post(&bob, "from bob", &["rust"]).await;

    let titles = |body: &Value| -> Vec<String> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["title"].as_str().unwrap().to_string())
            .collect()
    };

    let (status, body) = ctx.send(Method::GET, "/v1/users/feed", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["from alice"]);

    let (status, _) = ctx
        .send(Method::PUT, &format!("/v1/users/{bob}/follow"), Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = ctx
        .send(Method::PUT, &format!("/v1/users/{bob}/follow"), Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"],
        json!("already followed or user you are trying to follow does not exist")
    );

    let (_, body) = ctx.send(Method::GET, "/v1/users/feed", Some(&alice), None).await;
    assert_eq!(titles(&body), vec!["from bob", "from alice"]);
    assert_eq!(body["data"][0]["user"]["username"], json!("bob"));
    assert_eq!(body["data"][0]["comments_count"], json!(0));

    let (_, body) = ctx
        .send(Method::GET, "/v1/users/feed?sort=ASC&limit=1", Some(&alice), None)
        .await;
    assert_eq!(titles(&body), vec!["from alice"]);

    let (_, body) = ctx
        .send(Method::GET, "/v1/users/feed?tags=rust&search=BOB", Some(&alice), None)
        .await;
    assert_eq!(titles(&body), vec!["from bob"]);

    let (status, _) = ctx
        .send(Method::PUT, &format!("/v1/users/{bob}/unfollow"), Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = ctx.send(Method::GET, "/v1/users/feed", Some(&alice), None).await;
    assert_eq!(titles(&body), vec!["from alice"]);
}

#[tokio::test]
async fn self_follow_and_unknown_users_are_rejected() {
    let ctx = TestContext::new().await;
    let alice = ctx.signup("alice").await;

    let (status, _) = ctx
        .send(Method::PUT, &format!("/v1/users/{alice}/follow"), Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let ghost = uuid::Uuid::now_v7();
    let (status, _) = ctx
        .send(Method::PUT, &format!("/v1/users/{ghost}/follow"), Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn feed_rejects_invalid_parameters() {
    let ctx = TestContext::new().await;
    let alice = ctx.signup("alice").await;

    for query in [
        "limit=0",
        "limit=21",
        "limit=abc",
        "offset=-1",
        "sort=sideways",
        "tags=a,b,c,d,e,f",
    ] {
        let (status, body) = ctx
            .send(Method::GET, &format!("/v1/users/feed?{query}"), Some(&alice), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{query}: {body}");
        assert!(body["error"].is_string());
    }

    let (status, _) = ctx.send(Method::GET, "/v1/users/feed", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .send(Method::GET, "/v1/users/feed?limit=&sort=", Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}
