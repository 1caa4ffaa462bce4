//! Remote session resource.
//!
//! DESIGN
//! ======
//! One endpoint, three verbs: `POST` creates a session from credentials,
//! `GET` reports the current one, `DELETE` ends it. The HTTP client keeps a
//! cookie store so the session cookie set on login rides along on later
//! calls. Parsing lives in `parse_payload` so it can be tested without a
//! server.

use std::time::Duration;

use reqwest::header::{COOKIE, HeaderMap, HeaderValue};

use crate::config::SessionConfig;
use crate::types::{Credentials, SessionError, SessionPayload};

// =============================================================================
// TRAIT
// =============================================================================

/// The remote "current session" resource.
#[async_trait::async_trait]
pub trait SessionResource: Send + Sync {
    /// Log in with `credentials`.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the backend rejects the credentials or
    /// the call fails.
    async fn create(&self, credentials: &Credentials) -> Result<SessionPayload, SessionError>;

    /// Read the current session. An anonymous payload means no session.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the call fails.
    async fn read(&self) -> Result<SessionPayload, SessionError>;

    /// End the current session.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the call fails.
    async fn delete(&self) -> Result<(), SessionError>;
}

// =============================================================================
// HTTP RESOURCE
// =============================================================================

pub struct HttpSessionResource {
    http: reqwest::Client,
    url: String,
}

impl HttpSessionResource {
    /// Build an HTTP-backed resource from config.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] for an unusable cookie value and
    /// [`SessionError::HttpClientBuild`] if the client fails to build.
    pub fn new(config: &SessionConfig) -> Result<Self, SessionError> {
        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs));

        if let Some(cookie) = &config.cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| SessionError::Config(format!("invalid SESSION_COOKIE: {e}")))?;
            let mut headers = HeaderMap::new();
            headers.insert(COOKIE, value);
            builder = builder.default_headers(headers);
        }

        let http = builder.build().map_err(|e| SessionError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, url: config.session_url() })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn send(&self, method: &'static str, request: reqwest::RequestBuilder) -> Result<String, SessionError> {
        let response = request
            .send()
            .await
            .map_err(|e| SessionError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SessionError::Transport(e.to_string()))?;

        tracing::debug!(method, url = %self.url, status = status.as_u16(), "session resource response");

        if !status.is_success() {
            return Err(SessionError::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl SessionResource for HttpSessionResource {
    async fn create(&self, credentials: &Credentials) -> Result<SessionPayload, SessionError> {
        let text = self.send("POST", self.http.post(&self.url).json(credentials)).await?;
        parse_payload(&text)
    }

    async fn read(&self) -> Result<SessionPayload, SessionError> {
        let text = self.send("GET", self.http.get(&self.url)).await?;
        parse_payload(&text)
    }

    async fn delete(&self) -> Result<(), SessionError> {
        self.send("DELETE", self.http.delete(&self.url)).await?;
        Ok(())
    }
}

/// Decode a session body. An empty body counts as "no session".
pub(crate) fn parse_payload(text: &str) -> Result<SessionPayload, SessionError> {
    if text.trim().is_empty() {
        return Ok(SessionPayload::default());
    }
    serde_json::from_str(text).map_err(|e| SessionError::Decode(e.to_string()))
}

#[cfg(test)]
#[path = "resource_test.rs"]
mod tests;
