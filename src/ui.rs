//! UI collaborators used by the access gates.
//!
//! The gates only ever need two things from the surrounding app: show a
//! notice and change the current route. Both are traits so the app (or a
//! test) supplies its own. `NoticeBoard` and `RouteHistory` are the
//! in-memory versions used by the CLI.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

// =============================================================================
// TRAITS
// =============================================================================

/// Notice severity. `Error` is what callers get when they don't pick one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    #[default]
    Error,
}

/// User-visible notification banner.
pub trait Notifier: Send + Sync {
    /// Drop pending notices and keep the next one alive across a route change.
    fn clear_and_inhibit(&self);

    /// Show `message` to the user.
    fn error(&self, message: &str, severity: Severity);
}

/// Path-based navigation.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

// =============================================================================
// NOTICE BOARD
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

#[derive(Default)]
struct NoticeState {
    notices: Vec<Notice>,
    inhibited: bool,
}

/// In-memory notifier that also logs every notice through `tracing`.
#[derive(Default)]
pub struct NoticeBoard {
    state: Mutex<NoticeState>,
}

impl NoticeBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices currently on display, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.lock().notices.clone()
    }

    /// Route-change hook: clears notices unless an inhibit is pending, in
    /// which case the inhibit is consumed and the notices stay.
    pub fn clear(&self) {
        let mut state = self.lock();
        if state.inhibited {
            state.inhibited = false;
            return;
        }
        state.notices.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NoticeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for NoticeBoard {
    fn clear_and_inhibit(&self) {
        let mut state = self.lock();
        state.notices.clear();
        state.inhibited = true;
    }

    fn error(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => tracing::info!(%message, "notice"),
            Severity::Error => tracing::warn!(%message, "notice"),
        }
        self.lock().notices.push(Notice { message: message.to_owned(), severity });
    }
}

// =============================================================================
// ROUTE HISTORY
// =============================================================================

/// In-memory navigator recording every path it was sent to.
pub struct RouteHistory {
    paths: Mutex<Vec<String>>,
}

impl RouteHistory {
    /// Start at `initial`.
    #[must_use]
    pub fn new(initial: &str) -> Self {
        Self { paths: Mutex::new(vec![initial.to_owned()]) }
    }

    #[must_use]
    pub fn current(&self) -> String {
        self.lock().last().cloned().unwrap_or_else(|| "/".to_owned())
    }

    /// Every path visited, starting with the initial one.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.paths.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RouteHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for RouteHistory {
    fn navigate(&self, path: &str) {
        tracing::info!(%path, "navigate");
        self.lock().push(path.to_owned());
    }
}

#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;
