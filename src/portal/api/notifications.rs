use reqwest::Method;

use super::ApiClient;
use crate::portal::error::Result;
use crate::shared::{Notification, UnreadCount};

impl ApiClient {
    /// `GET /notifications/unread-count`
    pub async fn unread_count(&self) -> Result<u64> {
        let request = self.authed(Method::GET, &["notifications", "unread-count"])?;
        let count: UnreadCount = self.send_json(request, true).await?;
        Ok(count.count)
    }

    /// `GET /notifications`
    pub async fn list_notifications(&self) -> Result<Vec<Notification>> {
        let request = self.authed(Method::GET, &["notifications"])?;
        self.send_json(request, true).await
    }

    /// `PATCH /notifications/:id/read`
    pub async fn mark_read(&self, id: &str) -> Result<()> {
        let request = self.authed(Method::PATCH, &["notifications", id, "read"])?;
        self.send_empty(request, true).await
    }

    /// `PATCH /notifications/mark-all-read`
    pub async fn mark_all_read(&self) -> Result<()> {
        let request = self.authed(Method::PATCH, &["notifications", "mark-all-read"])?;
        self.send_empty(request, true).await
    }
}
