//! Persistence Bridge
//!
//! Mirrors the session store into durable storage and restores it on
//! startup. Restoration is all-or-nothing: a session is only installed when
//! both the token and a parseable user record are present; anything else is
//! treated as corruption, erased, and logged without being surfaced.
//!
//! Durable writes are serialized and tagged with the session generation
//! that produced them. A write whose generation has been superseded by the
//! time it acquires the lock is skipped, so storage always ends up matching
//! the newest in-memory session even when a logout overtakes a slow write.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Mutex;

use crate::portal::error::Result;
use crate::portal::session::SessionStore;
use crate::portal::storage::{
    DurableStorage, KEY_EMAIL, KEY_TOKEN, KEY_TOKEN_EXPIRES, KEY_USER, SESSION_KEYS,
};
use crate::shared::User;

/// What `restore` found in durable storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Token and user installed into the session store
    Restored,
    /// Nothing stored
    Empty,
    /// Stored data was inconsistent and has been erased
    Discarded(DiscardReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    MissingToken,
    MissingUser,
    MalformedUser,
    MalformedExpiry,
    Expired,
}

#[derive(Debug, Clone)]
pub struct PersistenceBridge {
    storage: Arc<dyn DurableStorage>,
    store: SessionStore,
    writes: Arc<Mutex<()>>,
}

impl PersistenceBridge {
    pub fn new(storage: Arc<dyn DurableStorage>, store: SessionStore) -> Self {
        Self {
            storage,
            store,
            writes: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn storage(&self) -> &Arc<dyn DurableStorage> {
        &self.storage
    }

    /// Copy a previously saved session into the store.
    pub async fn restore(&self) -> Result<RestoreOutcome> {
        self.restore_at(Utc::now()).await
    }

    pub async fn restore_at(&self, now: DateTime<Utc>) -> Result<RestoreOutcome> {
        let token = self.storage.get(KEY_TOKEN).await?;
        let user = self.storage.get(KEY_USER).await?;

        let (token, user_json) = match (token, user) {
            (None, None) => return Ok(RestoreOutcome::Empty),
            (None, Some(_)) => return self.discard(DiscardReason::MissingToken).await,
            (Some(_), None) => return self.discard(DiscardReason::MissingUser).await,
            (Some(token), Some(user)) => (token, user),
        };

        let user: User = match serde_json::from_str(&user_json) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Stored user record is not valid JSON: {}", e);
                return self.discard(DiscardReason::MalformedUser).await;
            }
        };

        if let Some(expires) = self.storage.get(KEY_TOKEN_EXPIRES).await? {
            match parse_epoch_millis(&expires) {
                Some(expires_at) if expires_at <= now => {
                    return self.discard(DiscardReason::Expired).await;
                }
                Some(_) => {}
                None => return self.discard(DiscardReason::MalformedExpiry).await,
            }
        }

        self.store.set_session(user, token);
        tracing::info!("Restored session from durable storage");
        Ok(RestoreOutcome::Restored)
    }

    /// Install a session and mirror it to durable storage.
    pub async fn persist(
        &self,
        user: User,
        token: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let generation = self.store.set_session(user.clone(), token.clone());
        self.write_session(generation, &user, &token, expires_at).await
    }

    /// `persist`, unless the session changed since `generation` was observed.
    /// Returns whether the session was installed.
    pub async fn persist_if_current(
        &self,
        generation: u64,
        user: User,
        token: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<bool> {
        let Some(installed) = self
            .store
            .set_session_if_current(generation, user.clone(), token.clone())
        else {
            return Ok(false);
        };
        self.write_session(installed, &user, &token, expires_at).await?;
        Ok(true)
    }

    /// Clear the store and erase every durable session key.
    pub async fn clear(&self) -> Result<()> {
        let generation = self.store.clear_session();
        self.erase_if_current(generation).await
    }

    /// `clear`, unless the session changed since `generation` was observed.
    pub async fn clear_if_current(&self, generation: u64) -> Result<bool> {
        let Some(cleared) = self.store.clear_session_if_current(generation) else {
            return Ok(false);
        };
        self.erase_if_current(cleared).await?;
        Ok(true)
    }

    /// Erase the durable copy left by the session cleared at `generation`.
    /// Skipped when a newer session has been installed since; its own write
    /// owns storage.
    pub async fn erase_if_current(&self, generation: u64) -> Result<()> {
        let _writes = self.writes.lock().await;
        if self.store.generation() != generation {
            tracing::debug!(generation, "Skipping erase for a superseded session");
            return Ok(());
        }
        self.storage.remove_many(&SESSION_KEYS).await
    }

    async fn write_session(
        &self,
        generation: u64,
        user: &User,
        token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let _writes = self.writes.lock().await;
        if self.store.generation() != generation {
            tracing::debug!(generation, "Skipping mirror for a superseded session");
            return Ok(());
        }
        self.mirror(user, token, expires_at).await
    }

    async fn mirror(&self, user: &User, token: &str, expires_at: Option<DateTime<Utc>>) -> Result<()> {
        let user_json = serde_json::to_string(user)?;
        let mut entries = vec![
            (KEY_TOKEN, token),
            (KEY_USER, user_json.as_str()),
            (KEY_EMAIL, user.email.as_str()),
        ];
        let expires = expires_at.map(|at| at.timestamp_millis().to_string());
        if let Some(expires) = expires.as_deref() {
            entries.push((KEY_TOKEN_EXPIRES, expires));
        }
        self.storage.set_many(&entries).await?;
        if expires.is_none() {
            self.storage.remove(KEY_TOKEN_EXPIRES).await?;
        }
        Ok(())
    }

    async fn discard(&self, reason: DiscardReason) -> Result<RestoreOutcome> {
        tracing::warn!(?reason, "Discarding stored session");
        let generation = self.store.clear_session();
        self.erase_if_current(generation).await?;
        Ok(RestoreOutcome::Discarded(reason))
    }
}

fn parse_epoch_millis(value: &str) -> Option<DateTime<Utc>> {
    let millis = value.trim().parse::<i64>().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}
