//! # scoreboard-session
//!
//! Client-side session management for the scoreboard frontend.
//!
//! DESIGN
//! ======
//! `SessionClient` wraps the remote `/api/session` resource (POST = login,
//! GET = refresh, DELETE = logout), keeps the current user/team in memory,
//! and publishes login/logout transitions to explicit subscribers. The two
//! access gates (`require_login`, `require_admin`) surface notices and
//! redirect through injected `Notifier`/`Navigator` collaborators.
//!
//! There is no global accessor: construct one client and pass clones of it
//! to whatever needs session state.

pub mod client;
pub mod config;
pub mod events;
pub mod resource;
pub mod types;
pub mod ui;

pub use client::{RedirectPolicy, SessionClient};
pub use config::SessionConfig;
pub use events::{SessionEvent, SessionEvents, Subscription};
pub use resource::{HttpSessionResource, SessionResource};
pub use types::{Credentials, Session, SessionError, SessionPayload, Team, User};
pub use ui::{Navigator, Notice, NoticeBoard, Notifier, RouteHistory, Severity};
