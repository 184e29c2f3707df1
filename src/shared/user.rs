//! User and session types
//!
//! `User` is sourced from the backend and treated as an opaque value apart
//! from `is_admin`, which gates admin-only views. `Session` is the in-memory
//! record owned by the session store.

use serde::{Deserialize, Serialize};

/// User information as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// "First Last" when available, otherwise the email
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => self.email.clone(),
        }
    }
}

/// Current session as seen by guards and views.
///
/// `is_authenticated` always equals `token.is_some()`; the session store is
/// the only writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub loading: bool,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.is_admin)
    }
}

/// Login request body
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Authentication response from the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
    /// Token lifetime in seconds, when the backend reports one
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Response body of `GET /user/verify-token`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyTokenResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Member profile (`GET/PUT /user/profile`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Account settings (`GET/PUT /user/settings`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_true")]
    pub email_notifications: bool,
    #[serde(default)]
    pub newsletter_subscribed: bool,
    #[serde(default = "default_visibility")]
    pub profile_visibility: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            newsletter_subscribed: false,
            profile_visibility: default_visibility(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_visibility() -> String {
    "members".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_parses_backend_shape() {
        let user: User =
            serde_json::from_str(r#"{"id":"1","email":"a@b.com","isAdmin":false}"#).unwrap();
        assert_eq!(user.id, "1");
        assert_eq!(user.email, "a@b.com");
        assert!(!user.is_admin);
        assert!(user.first_name.is_none());
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let user = User {
            id: "7".to_string(),
            email: "admin@society.org".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: None,
            is_admin: true,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["isAdmin"], true);
        assert_eq!(json["firstName"], "Ada");
        assert!(json.get("lastName").is_none());
    }

    #[test]
    fn test_display_name() {
        let mut user = User {
            id: "1".to_string(),
            email: "a@b.com".to_string(),
            first_name: None,
            last_name: None,
            is_admin: false,
        };
        assert_eq!(user.display_name(), "a@b.com");
        user.first_name = Some("Grace".to_string());
        user.last_name = Some("Hopper".to_string());
        assert_eq!(user.display_name(), "Grace Hopper");
    }

    #[test]
    fn test_verify_response_defaults_on_failure_body() {
        let response: VerifyTokenResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!response.success);
        assert!(response.user.is_none());
        assert!(response.token.is_none());
    }

    #[test]
    fn test_settings_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }
}
