//! Centralized 401 handling
//!
//! Every authenticated response passes through [`UnauthorizedInterceptor`].
//! A `401` clears the in-memory session and redirects to the login view
//! within the same synchronous call; erasing the durable copy follows in
//! [`UnauthorizedInterceptor::handle`].

use reqwest::StatusCode;

use crate::portal::navigation::{Navigator, Route};
use crate::portal::persistence::PersistenceBridge;

pub const SESSION_EXPIRED_MESSAGE: &str = "Please log in to continue.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interception {
    /// Not a 401; the caller handles the response
    PassThrough,
    /// Session cleared and redirect issued
    LoggedOut,
}

#[derive(Debug, Clone)]
pub struct UnauthorizedInterceptor {
    bridge: PersistenceBridge,
    navigator: Navigator,
}

impl UnauthorizedInterceptor {
    pub fn new(bridge: PersistenceBridge, navigator: Navigator) -> Self {
        Self { bridge, navigator }
    }

    /// Synchronous part: clear the session store and redirect.
    pub fn inspect(&self, status: StatusCode) -> Interception {
        match self.log_out(status) {
            Some(_) => Interception::LoggedOut,
            None => Interception::PassThrough,
        }
    }

    /// `inspect`, then erase the durable session unless a new login has
    /// landed meanwhile. Storage errors are logged, the in-memory session is
    /// already gone either way.
    pub async fn handle(&self, status: StatusCode) -> Interception {
        let Some(generation) = self.log_out(status) else {
            return Interception::PassThrough;
        };
        if let Err(e) = self.bridge.erase_if_current(generation).await {
            tracing::error!("Failed to erase stored session after 401: {}", e);
        }
        Interception::LoggedOut
    }

    /// Returns the generation of the cleared session on a 401
    fn log_out(&self, status: StatusCode) -> Option<u64> {
        if status != StatusCode::UNAUTHORIZED {
            return None;
        }

        tracing::warn!("Backend rejected the session token (401)");
        let generation = self.bridge.store().clear_session();
        if self.navigator.current() != Route::Login {
            self.navigator.redirect(Route::Login, SESSION_EXPIRED_MESSAGE);
        }
        Some(generation)
    }
}
