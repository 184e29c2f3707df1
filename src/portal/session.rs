//! Session Store
//!
//! The single source of truth for who is logged in. The store is a cheap
//! handle (`Clone`) passed to every consumer; the session can only change
//! through [`SessionStore::set_session`], [`SessionStore::clear_session`] and
//! [`SessionStore::set_loading`]. Every change is published on a
//! `tokio::sync::watch` channel so views and background tasks can subscribe
//! instead of polling.
//!
//! ## Usage
//!
//! ```rust
//! use society_portal::portal::session::SessionStore;
//! use society_portal::shared::User;
//!
//! let store = SessionStore::new();
//! let user = User {
//!     id: "1".into(),
//!     email: "a@b.com".into(),
//!     first_name: None,
//!     last_name: None,
//!     is_admin: false,
//! };
//! store.set_session(user, "abc".into());
//! assert!(store.is_authenticated());
//! store.clear_session();
//! assert!(!store.is_authenticated());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::shared::{Session, User};

#[derive(Debug, Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<Session>>,
    /// Bumped on every set/clear; lets in-flight work detect a superseded session
    generation: Arc<AtomicU64>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::default());
        Self {
            tx: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Install `user` and `token` verbatim; marks the session authenticated
    /// and clears `loading`. Returns the new generation.
    pub fn set_session(&self, user: User, token: String) -> u64 {
        tracing::info!(user_id = %user.id, "Session established");
        let mut generation = 0;
        self.tx.send_modify(|session| {
            generation = self.bump();
            install(session, user, token);
        });
        generation
    }

    /// Returns the new generation
    pub fn clear_session(&self) -> u64 {
        let mut generation = 0;
        self.tx.send_modify(|session| {
            generation = self.bump();
            if session.is_authenticated {
                tracing::info!("Session cleared");
            }
            reset(session);
        });
        generation
    }

    /// `set_session`, but only if no set/clear happened since `generation`
    /// was observed. Returns the new generation when installed.
    pub fn set_session_if_current(&self, generation: u64, user: User, token: String) -> Option<u64> {
        let mut installed = None;
        self.tx.send_if_modified(|session| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            installed = Some(self.bump());
            install(session, user, token);
            true
        });
        installed
    }

    /// `clear_session`, but only if no set/clear happened since `generation`
    /// was observed. Returns the new generation when cleared.
    pub fn clear_session_if_current(&self, generation: u64) -> Option<u64> {
        let mut cleared = None;
        self.tx.send_if_modified(|session| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            cleared = Some(self.bump());
            reset(session);
            true
        });
        cleared
    }

    /// Only called with the channel's write lock held
    fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn set_loading(&self, loading: bool) {
        self.tx.send_if_modified(|session| {
            if session.loading == loading {
                return false;
            }
            session.loading = loading;
            true
        });
    }

    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.tx.borrow().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.tx.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.tx.borrow().loading
    }

    pub fn is_admin(&self) -> bool {
        self.tx.borrow().is_admin()
    }

    /// Token plus the generation it belongs to, read atomically
    pub fn token_with_generation(&self) -> Option<(String, u64)> {
        let session = self.tx.borrow();
        session
            .token
            .clone()
            .map(|token| (token, self.generation.load(Ordering::SeqCst)))
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }
}

fn install(session: &mut Session, user: User, token: String) {
    session.user = Some(user);
    session.token = Some(token);
    session.is_authenticated = true;
    session.loading = false;
}

fn reset(session: &mut Session) {
    session.user = None;
    session.token = None;
    session.is_authenticated = false;
    session.loading = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn member() -> User {
        User {
            id: "1".to_string(),
            email: "a@b.com".to_string(),
            first_name: None,
            last_name: None,
            is_admin: false,
        }
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = SessionStore::new();
        assert_eq!(store.snapshot(), Session::default());
        assert!(!store.is_authenticated());
        assert!(!store.is_loading());
    }

    #[test]
    fn test_set_session_marks_authenticated_and_clears_loading() {
        let store = SessionStore::new();
        store.set_loading(true);
        store.set_session(member(), "abc".to_string());

        let session = store.snapshot();
        assert_eq!(session.token.as_deref(), Some("abc"));
        assert_eq!(session.user, Some(member()));
        assert!(session.is_authenticated);
        assert!(!session.loading);
    }

    #[test]
    fn test_clear_session_is_total() {
        let store = SessionStore::new();
        store.set_session(member(), "abc".to_string());
        store.set_loading(true);
        store.clear_session();
        assert_eq!(store.snapshot(), Session::default());
    }

    #[test]
    fn test_generation_bumps_on_set_and_clear_only() {
        let store = SessionStore::new();
        let start = store.generation();
        store.set_loading(true);
        assert_eq!(store.generation(), start);
        assert_eq!(store.set_session(member(), "abc".to_string()), start + 1);
        assert_eq!(store.generation(), start + 1);
        assert_eq!(store.clear_session(), start + 2);
        assert_eq!(store.generation(), start + 2);
    }

    #[test]
    fn test_token_with_generation() {
        let store = SessionStore::new();
        assert!(store.token_with_generation().is_none());
        store.set_session(member(), "abc".to_string());
        assert_eq!(
            store.token_with_generation(),
            Some(("abc".to_string(), store.generation()))
        );
    }

    #[test]
    fn test_conditional_updates_reject_stale_generation() {
        let store = SessionStore::new();
        store.set_session(member(), "old".to_string());
        let observed = store.generation();

        // a fresh login supersedes the observed session
        store.set_session(member(), "new".to_string());

        assert_eq!(store.clear_session_if_current(observed), None);
        assert_eq!(store.set_session_if_current(observed, member(), "stale".to_string()), None);
        assert_eq!(store.token().as_deref(), Some("new"));

        let current = store.generation();
        assert_eq!(
            store.set_session_if_current(current, member(), "refreshed".to_string()),
            Some(current + 1)
        );
        assert_eq!(store.token().as_deref(), Some("refreshed"));
        assert_eq!(store.clear_session_if_current(current + 1), Some(current + 2));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        store.set_session(member(), "abc".to_string());
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_authenticated);

        store.clear_session();
        rx.changed().await.unwrap();
        assert!(!rx.borrow_and_update().is_authenticated);
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::new();
        let view = store.clone();
        store.set_session(member(), "abc".to_string());
        assert!(view.is_authenticated());
    }
}
