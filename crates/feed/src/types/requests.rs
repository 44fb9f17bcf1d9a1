//! Request types accepted by the feed services.

use serde::Deserialize;

use super::{FeedResult, ValidationErrors};
use crate::utils::validation::{check_email, check_length, check_required};

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_CONTENT_LEN: usize = 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreatePostRequest {
    pub fn validate(&self) -> FeedResult<()> {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "title", &self.title);
        check_length(&mut errors, "title", &self.title, 0, MAX_TITLE_LEN);
        check_required(&mut errors, "content", &self.content);
        check_length(&mut errors, "content", &self.content, 0, MAX_CONTENT_LEN);
        errors.into_result()
    }
}

/// Partial post update. Absent fields keep their stored value; `tags`, when
/// present, replaces the whole list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdatePostRequest {
    pub fn validate(&self) -> FeedResult<()> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = &self.title {
            check_length(&mut errors, "title", title, 0, MAX_TITLE_LEN);
        }
        if let Some(content) = &self.content {
            check_length(&mut errors, "content", content, 0, MAX_CONTENT_LEN);
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

impl CreateCommentRequest {
    pub fn validate(&self) -> FeedResult<()> {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "content", &self.content);
        check_length(&mut errors, "content", &self.content, 0, MAX_CONTENT_LEN);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub fn validate(&self) -> FeedResult<()> {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "username", &self.username);
        check_length(&mut errors, "username", &self.username, 3, 20);
        check_email(&mut errors, "email", &self.email);
        check_length(&mut errors, "password", &self.password, 5, 20);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeedError;

    fn failed_fields(result: FeedResult<()>) -> Vec<&'static str> {
        match result {
            Err(FeedError::Validation(errors)) => errors.fields().collect(),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn create_post_requires_bounded_title_and_content() {
        let ok = CreatePostRequest {
            title: "hello".into(),
            content: "world".into(),
            tags: vec![],
        };
        assert!(ok.validate().is_ok());

        let bad = CreatePostRequest {
            title: "x".repeat(101),
            content: String::new(),
            tags: vec![],
        };
        assert_eq!(failed_fields(bad.validate()), vec!["title", "content"]);
    }

    #[test]
    fn update_post_only_checks_present_fields() {
        assert!(UpdatePostRequest::default().validate().is_ok());

        let bad = UpdatePostRequest {
            content: Some("y".repeat(1001)),
            ..Default::default()
        };
        assert_eq!(failed_fields(bad.validate()), vec!["content"]);
    }

    #[test]
    fn signup_checks_username_email_and_password() {
        let bad = SignupRequest {
            username: "ab".into(),
            email: "not-an-email".into(),
            password: "1234".into(),
        };
        assert_eq!(
            failed_fields(bad.validate()),
            vec!["username", "email", "password"]
        );

        let ok = SignupRequest {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "secret1".into(),
        };
        assert!(ok.validate().is_ok());
    }
}
