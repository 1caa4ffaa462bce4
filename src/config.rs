//! Session client configuration parsed from environment variables.

use crate::types::SessionError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_SESSION_PATH: &str = "/api/session";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Scheme + host of the backend, without a trailing slash.
    pub base_url: String,
    /// Path of the session resource.
    pub path: String,
    /// Raw `Cookie` header used to resume an existing session.
    pub cookie: Option<String>,
    pub timeouts: Timeouts,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            path: DEFAULT_SESSION_PATH.to_owned(),
            cookie: None,
            timeouts: Timeouts::default(),
        }
    }
}

impl SessionConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `SESSION_BASE_URL`: default `http://127.0.0.1:8080`
    /// - `SESSION_PATH`: default `/api/session`
    /// - `SESSION_COOKIE`: raw cookie header to resume a session
    /// - `SESSION_REQUEST_TIMEOUT_SECS`: default 30
    /// - `SESSION_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if the base URL is not http(s).
    pub fn from_env() -> Result<Self, SessionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SessionConfig::from_env`] with an explicit variable source.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if the base URL is not http(s).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SessionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = normalize_base_url(&lookup("SESSION_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()))?;
        let path = normalize_path(&lookup("SESSION_PATH").unwrap_or_else(|| DEFAULT_SESSION_PATH.to_owned()));
        let cookie = lookup("SESSION_COOKIE").filter(|value| !value.trim().is_empty());
        let timeouts = Timeouts {
            request_secs: parse_u64(lookup("SESSION_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(lookup("SESSION_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { base_url, path, cookie, timeouts })
    }

    /// Replace the base URL, applying the same validation as `from_env`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if the URL is not http(s).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, SessionError> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = normalize_path(path);
        self
    }

    #[must_use]
    pub fn with_cookie(mut self, cookie: Option<String>) -> Self {
        self.cookie = cookie;
        self
    }

    /// Full URL of the session resource.
    #[must_use]
    pub fn session_url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, SessionError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(SessionError::Config(format!("SESSION_BASE_URL must be http(s): {raw}")));
    }
    Ok(trimmed.to_owned())
}

fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('/') { trimmed.to_owned() } else { format!("/{trimmed}") }
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
