//! Token Refresh
//!
//! Single-flight refresh of the access token after a 401.
//!
//! Callers that hit a 401 call [`RefreshCoordinator::recover`] with the
//! access token their request was sent with. The exchange runs under one
//! async lock; a caller that gets the lock after someone else already
//! rotated the token retries with the new token instead of spending the
//! refresh token again.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::store::TokenStore;
use crate::core::{HttpMethod, HttpRequest, HttpTransport};
use crate::error::{create_error_from_response, ApiError, ProtocolError};
use crate::types::{AuthTokensResponse, RefreshTokenRequest, TokenSet};

/// Refresh state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshState {
    /// Requests flow normally.
    Normal,
    /// A refresh exchange is in flight.
    Refreshing,
    /// The last refresh failed and tokens are being cleared.
    Failed,
}

/// Refresh counters.
#[derive(Debug, Default)]
pub struct RefreshStats {
    attempts: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
}

impl RefreshStats {
    /// Refresh exchanges sent.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Exchanges that produced new tokens.
    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    /// Recoveries that ended with the tokens cleared.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

/// Coordinates refresh exchanges for one client.
pub struct RefreshCoordinator<T: HttpTransport> {
    transport: Arc<T>,
    store: TokenStore,
    refresh_url: String,
    timeout: Duration,
    lock: tokio::sync::Mutex<()>,
    state: Mutex<RefreshState>,
    stats: RefreshStats,
}

impl<T: HttpTransport> RefreshCoordinator<T> {
    /// Create a coordinator posting to the absolute `refresh_url`.
    pub fn new(
        transport: Arc<T>,
        store: TokenStore,
        refresh_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            store,
            refresh_url: refresh_url.into(),
            timeout,
            lock: tokio::sync::Mutex::new(()),
            state: Mutex::new(RefreshState::Normal),
            stats: RefreshStats::default(),
        }
    }

    /// Current state.
    pub fn state(&self) -> RefreshState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(RefreshState::Normal)
    }

    /// Refresh counters.
    pub fn stats(&self) -> &RefreshStats {
        &self.stats
    }

    fn set_state(&self, next: RefreshState) {
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }
    }

    /// Make fresh credentials available after a 401.
    ///
    /// `sent_with` is the access token the failed request carried, `None`
    /// when it went out without one. `Ok` means the stored tokens are now
    /// worth retrying with. On `Err` the tokens have been cleared and the
    /// error is the normalized [`ApiError::Unauthorized`].
    pub async fn recover(&self, sent_with: Option<&str>) -> Result<(), ApiError> {
        let _guard = self.lock.lock().await;

        let tokens = self.store.get_tokens();
        // Only a request that carried a token can be behind a rotation.
        if let (Some(sent), Some(current)) = (sent_with, tokens.access_token.as_deref()) {
            if sent != current {
                debug!("access token already rotated, reusing it");
                return Ok(());
            }
        }

        let Some(refresh_token) = tokens.refresh_token else {
            debug!("no refresh token stored");
            return Err(self.fail("no refresh token available"));
        };

        self.set_state(RefreshState::Refreshing);
        self.stats.attempts.fetch_add(1, Ordering::Relaxed);
        debug!(url = %self.refresh_url, "refreshing access token");

        match self.exchange(refresh_token).await {
            Ok(refreshed) => {
                self.store.set_tokens(&refreshed);
                self.stats.successes.fetch_add(1, Ordering::Relaxed);
                self.set_state(RefreshState::Normal);
                info!("access token refreshed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "token refresh failed");
                Err(self.fail(&format!("token refresh failed: {}", e)))
            }
        }
    }

    fn fail(&self, reason: &str) -> ApiError {
        self.set_state(RefreshState::Failed);
        self.store.clear_tokens();
        self.stats.failures.fetch_add(1, Ordering::Relaxed);
        self.set_state(RefreshState::Normal);
        ApiError::unauthorized(reason)
    }

    /// POST the refresh token. Sent straight to the transport so a 401 here
    /// never re-enters recovery.
    async fn exchange(&self, refresh_token: String) -> Result<TokenSet, ApiError> {
        let body = serde_json::to_string(&RefreshTokenRequest {
            refresh_token: refresh_token.clone(),
        })
        .map_err(|e| {
            ApiError::Protocol(ProtocolError::InvalidJson {
                message: e.to_string(),
            })
        })?;

        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers.insert("accept".to_string(), "application/json".to_string());

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: self.refresh_url.clone(),
            headers,
            body: Some(body),
            timeout: Some(self.timeout),
        };

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(create_error_from_response(
                response.status,
                &response.status_text,
                &response.body,
            ));
        }

        let parsed: AuthTokensResponse = serde_json::from_str(&response.body).map_err(|e| {
            ApiError::Protocol(ProtocolError::InvalidJson {
                message: e.to_string(),
            })
        })?;

        Ok(parsed.into_token_set(Some(refresh_token)))
    }
}

impl<T: HttpTransport> std::fmt::Debug for RefreshCoordinator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refresh_url", &self.refresh_url)
            .field("state", &self.state())
            .field("stats", &self.stats)
            .finish()
    }
}
