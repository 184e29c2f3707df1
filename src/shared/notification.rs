//! Notification types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A member notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Response body of `GET /notifications/unread-count`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    #[serde(default)]
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unread_count_parses() {
        let count: UnreadCount = serde_json::from_str(r#"{"count": 4}"#).unwrap();
        assert_eq!(count.count, 4);
    }

    #[test]
    fn test_notification_defaults_unread() {
        let json = r#"{"id":"n1","title":"Renewal","createdAt":"2026-10-01T12:00:00Z"}"#;
        let notification: Notification = serde_json::from_str(json).unwrap();
        assert!(!notification.is_read);
        assert!(notification.message.is_empty());
    }
}
