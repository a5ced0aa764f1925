/**
 * Post Creation Rate Limiting
 *
 * A per-client sliding window: each client may perform at most `limit`
 * actions within any `window`-long span. Rejected attempts are not recorded,
 * so a client regains capacity as soon as its oldest accepted action ages
 * out of the window.
 *
 * Clients are keyed by peer IP when the server runs with connection info,
 * otherwise by authenticated user id (see [`ClientKey`]).
 */

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

use crate::backend::error::BackendError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::server::state::AppState;

/// Shared sliding-window limiter
#[derive(Clone, Debug)]
pub struct SlidingWindowLimiter {
    limit: usize,
    window: Duration,
    hits: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
}

impl SlidingWindowLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            hits: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record an action for `key`, or reject it when the window is full
    ///
    /// # Errors
    ///
    /// `RateLimited` carrying the seconds until the oldest recorded action
    /// leaves the window (at least 1).
    pub fn check(&self, key: &str) -> Result<(), BackendError> {
        let now = Instant::now();
        let mut hits = self.hits.lock().unwrap_or_else(PoisonError::into_inner);
        let recent = hits.entry(key.to_string()).or_default();

        while let Some(&oldest) = recent.front() {
            if now.duration_since(oldest) >= self.window {
                recent.pop_front();
            } else {
                break;
            }
        }

        if recent.len() >= self.limit {
            let wait = recent
                .front()
                .map(|&oldest| self.window.saturating_sub(now.duration_since(oldest)))
                .unwrap_or(self.window);
            let retry_after_secs = wait.as_secs_f64().ceil().max(1.0) as u64;
            tracing::warn!("Rate limit hit for {} (retry in {}s)", key, retry_after_secs);
            return Err(BackendError::rate_limited(retry_after_secs));
        }

        recent.push_back(now);
        Ok(())
    }

    /// Drop clients whose every recorded action has left the window
    ///
    /// Returns the number of clients dropped.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut hits = self.hits.lock().unwrap_or_else(PoisonError::into_inner);
        let before = hits.len();
        hits.retain(|_, recent| {
            recent
                .back()
                .is_some_and(|&newest| now.duration_since(newest) < self.window)
        });
        before - hits.len()
    }
}

/// Rate-limit key for the calling client
///
/// `ip:<addr>` when connection info is available, `user:<id>` otherwise.
/// Falling back to the user requires authentication, so this extractor
/// rejects unauthenticated callers in that mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientKey(pub String);

impl FromRequestParts<AppState> for ClientKey {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            return Ok(ClientKey(format!("ip:{}", addr.ip())));
        }

        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        Ok(ClientKey(format!("user:{}", user.user_id)))
    }
}
