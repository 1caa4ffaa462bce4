//! Session client: current user/team plus login/logout/refresh.
//!
//! DESIGN
//! ======
//! `SessionClient` is cheap to clone; every clone shares the same session
//! record and subscriber list. Pass it to whatever needs session state.
//!
//! The record sits behind a `RwLock` that is never held across a network
//! call. Overlapping operations therefore resolve in completion order: the
//! last response to arrive overwrites the record.
//!
//! INHERITED BEHAVIOR
//! ==================
//! - `logout` clears the local record before the backend confirms, but only
//!   publishes `Logout` once it does. A failed delete leaves the client
//!   anonymous with no event.
//! - `require_login` returns `Ok` whenever the refresh call itself succeeds,
//!   even if the backend reported no session. Callers re-check the returned
//!   snapshot.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::events::{SessionEvent, SessionEvents, Subscription};
use crate::resource::SessionResource;
use crate::types::{Credentials, Session, SessionError, Team, User};
use crate::ui::{Navigator, Notifier, Severity};

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";
pub const MUST_LOGIN_MESSAGE: &str = "You must be logged in.";
pub const NOT_ADMIN_MESSAGE: &str = "You are not an admin!";

/// What `require_login` does when the session cannot be confirmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RedirectPolicy {
    /// Show the login notice and navigate to the login page.
    #[default]
    Redirect,
    /// Fail without any visible side effect.
    Silent,
}

#[derive(Clone)]
pub struct SessionClient {
    resource: Arc<dyn SessionResource>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    session: Arc<RwLock<Session>>,
    events: SessionEvents,
}

impl SessionClient {
    /// Build an anonymous client without touching the network.
    #[must_use]
    pub fn new(
        resource: Arc<dyn SessionResource>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            resource,
            notifier,
            navigator,
            session: Arc::new(RwLock::new(Session::default())),
            events: SessionEvents::new(),
        }
    }

    /// Build a client and pick up any session the backend already has.
    pub async fn connect(
        resource: Arc<dyn SessionResource>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let client = Self::new(resource, notifier, navigator);
        client.prime().await;
        client
    }

    /// One refresh whose outcome is only logged.
    pub async fn prime(&self) {
        if let Err(e) = self.refresh().await {
            tracing::debug!(error = %e, "initial session refresh failed");
        }
    }

    // =========================================================================
    // STATE
    // =========================================================================

    /// Snapshot of the current record.
    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.session.read().await.user.clone()
    }

    pub async fn team(&self) -> Option<Team> {
        self.session.read().await.team.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_authenticated()
    }

    pub async fn is_admin(&self) -> bool {
        self.session.read().await.is_admin()
    }

    /// Register for `Login`/`Logout` events.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        self.events.subscribe()
    }

    #[must_use]
    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    // =========================================================================
    // RESOURCE CALLS
    // =========================================================================

    /// Log in and publish `Login`, even if a user was already logged in.
    ///
    /// # Errors
    ///
    /// Returns the resource error unchanged; the record is left as it was.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, SessionError> {
        let credentials = Credentials::new(email, password);
        let payload = match self.resource.create(&credentials).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(error = %e, "login failed");
                return Err(e);
            }
        };

        let snapshot = {
            let mut session = self.session.write().await;
            session.replace(payload);
            session.clone()
        };
        tracing::info!(nick = snapshot.user.as_ref().map(|u| u.nick.as_str()), "logged in");
        self.events.publish(SessionEvent::Login);
        Ok(snapshot)
    }

    /// Clear the record, then delete the remote session and publish `Logout`.
    ///
    /// # Errors
    ///
    /// Returns the resource error. The record stays cleared and no event is
    /// published.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.session.write().await.clear();

        if let Err(e) = self.resource.delete().await {
            tracing::debug!(error = %e, "logout failed");
            return Err(e);
        }

        tracing::info!("logged out");
        self.events.publish(SessionEvent::Logout);
        Ok(())
    }

    /// Re-read the remote session, publishing on anonymous/authenticated
    /// transitions only.
    ///
    /// # Errors
    ///
    /// Returns the resource error; the record is left as it was.
    pub async fn refresh(&self) -> Result<Session, SessionError> {
        let payload = self.resource.read().await?;

        let (snapshot, transition) = {
            let mut session = self.session.write().await;
            let had_user = session.is_authenticated();
            session.replace(payload);
            let transition = match (had_user, session.is_authenticated()) {
                (true, false) => Some(SessionEvent::Logout),
                (false, true) => Some(SessionEvent::Login),
                _ => None,
            };
            (session.clone(), transition)
        };

        if let Some(event) = transition {
            self.events.publish(event);
        }
        Ok(snapshot)
    }

    // =========================================================================
    // GATES
    // =========================================================================

    /// Resolve once the caller may proceed to a login-protected view.
    ///
    /// With a user already present this returns immediately without a
    /// network call. Otherwise it refreshes; a successful refresh returns
    /// its snapshot, which may still be anonymous.
    ///
    /// # Errors
    ///
    /// Returns the refresh error. Under [`RedirectPolicy::Redirect`] the
    /// login notice is shown and the app is sent to `/login` first.
    pub async fn require_login(&self, redirect: RedirectPolicy) -> Result<Session, SessionError> {
        {
            let session = self.session.read().await;
            if session.is_authenticated() {
                return Ok(session.clone());
            }
        }

        match self.refresh().await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                if redirect == RedirectPolicy::Redirect {
                    self.notifier.clear_and_inhibit();
                    self.notifier.error(MUST_LOGIN_MESSAGE, Severity::Info);
                    self.navigator.navigate(LOGIN_PATH);
                }
                Err(e)
            }
        }
    }

    /// Whether the caller may proceed to an admin view.
    ///
    /// An anonymous client goes through `require_login` first. A failed
    /// login check returns `false` after its own redirect; a non-admin
    /// result shows the admin notice and navigates home.
    pub async fn require_admin(&self) -> bool {
        let current = self.session().await;
        let session = if current.is_authenticated() {
            current
        } else {
            match self.require_login(RedirectPolicy::Redirect).await {
                Ok(snapshot) => snapshot,
                Err(_) => return false,
            }
        };
        self.check_admin(&session)
    }

    fn check_admin(&self, session: &Session) -> bool {
        if session.is_admin() {
            return true;
        }
        self.notifier.clear_and_inhibit();
        self.notifier.error(NOT_ADMIN_MESSAGE, Severity::default());
        self.navigator.navigate(HOME_PATH);
        false
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
