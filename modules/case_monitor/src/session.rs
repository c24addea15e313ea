//! Explicit session context for calls to the analysis backend.
//!
//! A [`SessionManager`] hands out a [`SessionContext`] per request and asks its
//! [`TokenSource`] for a new one when the cached token is within the refresh
//! skew of its expiry.
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::CaseMonitorError;

#[derive(Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl SessionContext {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// True when the token expires within `skew` of `now` (or already has).
    pub fn needs_refresh(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        self.expires_at - skew <= now
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Issues identity tokens. `Ok(None)` means nobody is signed in.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch(&self) -> Result<Option<SessionContext>, CaseMonitorError>;
}

/// Fixed token, e.g. from the command line. Empty means signed out.
pub struct StaticToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl StaticToken {
    pub fn new(token: impl Into<String>, ttl: Duration) -> Self {
        Self {
            token: token.into(),
            expires_at: Utc::now() + ttl,
        }
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn fetch(&self) -> Result<Option<SessionContext>, CaseMonitorError> {
        if self.token.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(SessionContext::new(self.token.clone(), self.expires_at)))
    }
}

pub struct SessionManager {
    source: Arc<dyn TokenSource>,
    skew: Duration,
    cached: Mutex<Option<SessionContext>>,
}

impl SessionManager {
    pub fn new(source: Arc<dyn TokenSource>, skew: Duration) -> Self {
        Self {
            source,
            skew,
            cached: Mutex::new(None),
        }
    }

    /// Current context, refreshed if close to expiry. `None` when signed out.
    pub async fn current(&self) -> Result<Option<SessionContext>, CaseMonitorError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(ctx) = cached.as_ref() {
            if !ctx.needs_refresh(now, self.skew) {
                return Ok(Some(ctx.clone()));
            }
            debug!(expires_at = %ctx.expires_at, "Refreshing session token");
        }
        let fresh = self.source.fetch().await?;
        *cached = fresh.clone();
        Ok(fresh)
    }

    /// Context for `action`, or `NotSignedIn`.
    pub async fn require(&self, action: &'static str) -> Result<SessionContext, CaseMonitorError> {
        self.current()
            .await?
            .ok_or(CaseMonitorError::NotSignedIn { action })
    }

    pub async fn sign_out(&self) {
        *self.cached.lock().await = None;
    }
}
