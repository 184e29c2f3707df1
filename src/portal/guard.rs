//! Route guards
//!
//! One guard type covers every protected view: a [`Requirement`] on the
//! logged-in user plus a [`FailurePolicy`] for what to do when nobody is
//! logged in. Guards only decide; they never render. These checks are for
//! UX; the backend still validates every request.

use std::fmt;
use std::sync::Arc;

use crate::portal::navigation::{Navigator, Route};
use crate::shared::{Session, User};

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to access this page.";

/// Predicate the logged-in user must satisfy
#[derive(Clone)]
pub enum Requirement {
    Authenticated,
    Admin,
    Custom(Arc<dyn Fn(&User) -> bool + Send + Sync>),
}

impl Requirement {
    pub fn custom(predicate: impl Fn(&User) -> bool + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(predicate))
    }

    fn allows(&self, user: Option<&User>) -> bool {
        match self {
            Self::Authenticated => true,
            Self::Admin => user.is_some_and(|user| user.is_admin),
            Self::Custom(predicate) => user.is_some_and(|user| predicate(user)),
        }
    }
}

impl fmt::Debug for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authenticated => f.write_str("Authenticated"),
            Self::Admin => f.write_str("Admin"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// What to do when there is no session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Send straight to the login view
    Redirect,
    /// Ask first, then send to the login view
    ConfirmThenRedirect(String),
    /// Render nothing
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Loading,
    Nothing,
    Redirect(Route),
    Confirm { message: String, then: Route },
}

#[derive(Debug, Clone)]
pub struct Guard {
    requirement: Requirement,
    on_failure: FailurePolicy,
}

impl Guard {
    pub fn new(requirement: Requirement, on_failure: FailurePolicy) -> Self {
        Self {
            requirement,
            on_failure,
        }
    }

    /// Redirecting guard, optionally admin-only
    pub fn auth_guard(require_admin: bool) -> Self {
        let requirement = if require_admin {
            Requirement::Admin
        } else {
            Requirement::Authenticated
        };
        Self::new(requirement, FailurePolicy::Redirect)
    }

    /// Members-only view that renders nothing while logged out
    pub fn private_route() -> Self {
        Self::new(Requirement::Authenticated, FailurePolicy::Placeholder)
    }

    /// Members-only view that asks before leaving for the login page
    pub fn protected_route() -> Self {
        Self::new(
            Requirement::Authenticated,
            FailurePolicy::ConfirmThenRedirect(LOGIN_REQUIRED_MESSAGE.to_string()),
        )
    }

    pub fn decide(&self, session: &Session) -> GuardDecision {
        if !session.is_authenticated {
            return match &self.on_failure {
                FailurePolicy::Redirect => GuardDecision::Redirect(Route::Login),
                FailurePolicy::ConfirmThenRedirect(message) => GuardDecision::Confirm {
                    message: message.clone(),
                    then: Route::Login,
                },
                FailurePolicy::Placeholder => GuardDecision::Nothing,
            };
        }

        // a restored session is being re-verified
        if session.loading {
            return GuardDecision::Loading;
        }

        if !self.requirement.allows(session.user.as_ref()) {
            return GuardDecision::Redirect(Route::Unauthorized);
        }

        GuardDecision::Render
    }

    /// Decide and carry out any redirect. A `Confirm` decision is left for
    /// the UI; call [`Guard::confirmed`] once the member accepts.
    pub fn enforce(&self, session: &Session, navigator: &Navigator) -> GuardDecision {
        let decision = self.decide(session);
        if let GuardDecision::Redirect(route) = &decision {
            match route {
                Route::Login => navigator.redirect(Route::Login, LOGIN_REQUIRED_MESSAGE),
                other => navigator.navigate(other.clone()),
            }
        }
        decision
    }

    pub fn confirmed(&self, decision: &GuardDecision, navigator: &Navigator) {
        if let GuardDecision::Confirm { then, .. } = decision {
            navigator.navigate(then.clone());
        }
    }
}
