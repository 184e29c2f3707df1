//! Client-side navigation state
//!
//! The portal core never renders anything; it only decides where the member
//! should be. `Navigator` records the current route plus an optional flash
//! message and publishes every change so the UI layer can follow along.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// Routes the session logic cares about
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    ForgotPassword,
    Unauthorized,
    Dashboard,
    Profile,
    Settings,
    Membership,
    Notifications,
    Admin,
    Other(String),
}

impl Route {
    pub fn path(&self) -> &str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::ForgotPassword => "/forgot-password",
            Self::Unauthorized => "/unauthorized",
            Self::Dashboard => "/dashboard",
            Self::Profile => "/profile",
            Self::Settings => "/settings",
            Self::Membership => "/membership",
            Self::Notifications => "/notifications",
            Self::Admin => "/admin",
            Self::Other(path) => path,
        }
    }

    pub fn from_path(path: &str) -> Self {
        let trimmed = path.split(['?', '#']).next().unwrap_or(path);
        let trimmed = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        match trimmed {
            "" | "/" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/forgot-password" => Self::ForgotPassword,
            "/unauthorized" => Self::Unauthorized,
            "/dashboard" => Self::Dashboard,
            "/profile" => Self::Profile,
            "/settings" => Self::Settings,
            "/membership" => Self::Membership,
            "/notifications" => Self::Notifications,
            "/admin" => Self::Admin,
            other => Self::Other(other.to_string()),
        }
    }

    /// Routes reachable without a session
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Self::Home | Self::Login | Self::Register | Self::ForgotPassword | Self::Unauthorized
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Current location plus the message to show on arrival
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub route: Route,
    pub flash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    tx: Arc<watch::Sender<Location>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        let (tx, _rx) = watch::channel(Location {
            route: initial,
            flash: None,
        });
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> Route {
        self.tx.borrow().route.clone()
    }

    pub fn location(&self) -> Location {
        self.tx.borrow().clone()
    }

    /// Plain navigation; drops any pending flash message
    pub fn navigate(&self, route: Route) {
        self.tx.send_replace(Location { route, flash: None });
    }

    /// Navigate and leave a message for the destination view
    pub fn redirect(&self, route: Route, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(to = %route, %message, "Redirecting");
        self.tx.send_replace(Location {
            route,
            flash: Some(message),
        });
    }

    pub fn flash(&self) -> Option<String> {
        self.tx.borrow().flash.clone()
    }

    /// Read and clear the flash message, leaving the route untouched
    pub fn take_flash(&self) -> Option<String> {
        let mut taken = None;
        self.tx.send_if_modified(|location| {
            taken = location.flash.take();
            taken.is_some()
        });
        taken
    }

    pub fn subscribe(&self) -> watch::Receiver<Location> {
        self.tx.subscribe()
    }
}
