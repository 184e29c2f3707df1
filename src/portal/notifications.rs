//! Unread-notification count poll
//!
//! Refreshes the unread count on a fixed cadence (30 s by default) and
//! publishes it on a `watch` channel. Runs independently of the token
//! verifier; the two loops touch disjoint state. Errors are logged and the
//! last known count is kept; a 401 is handled by the API client's
//! interceptor like any other call.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::portal::api::ApiClient;
use crate::portal::error::Result;
use crate::portal::task::TaskHandle;

#[derive(Debug, Clone)]
pub struct UnreadPoller {
    api: ApiClient,
    interval: Duration,
    count: Arc<watch::Sender<u64>>,
}

impl UnreadPoller {
    pub fn new(api: ApiClient) -> Self {
        let interval = api.config().unread_poll_interval();
        let (count, _rx) = watch::channel(0);
        Self {
            api,
            interval,
            count: Arc::new(count),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn count(&self) -> u64 {
        *self.count.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.count.subscribe()
    }

    /// Fetch the count once. Returns `None` when logged out, on error, or
    /// when the session changed while the request was in flight.
    pub async fn poll_now(&self) -> Option<u64> {
        let (_, generation) = self.api.session().token_with_generation()?;
        match self.api.unread_count().await {
            Ok(count) => {
                if self.api.session().generation() != generation {
                    tracing::debug!(generation, "Dropping unread count for a superseded session");
                    return None;
                }
                tracing::debug!(count, "Unread notification count");
                self.count.send_if_modified(|current| {
                    let changed = *current != count;
                    *current = count;
                    changed
                });
                Some(count)
            }
            Err(e) => {
                tracing::warn!("Failed to refresh unread notification count: {}", e);
                None
            }
        }
    }

    /// Mark everything read on the backend and zero the local count
    pub async fn mark_all_read(&self) -> Result<()> {
        self.api.mark_all_read().await?;
        self.reset();
        Ok(())
    }

    fn reset(&self) {
        self.count.send_if_modified(|current| {
            let changed = *current != 0;
            *current = 0;
            changed
        });
    }

    /// Poll immediately, then on every tick; zero the count on logout
    pub fn spawn(&self) -> TaskHandle {
        let poller = self.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poller.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut session = poller.api.session().subscribe();
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        poller.poll_now().await;
                    }
                    changed = session.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let authenticated = session.borrow_and_update().is_authenticated;
                        if !authenticated {
                            poller.reset();
                        }
                    }
                }
            }
        });
        TaskHandle::new("unread-poller", task)
    }
}
