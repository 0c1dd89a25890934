//! Session guard: derives the authentication flag from the persisted token
//! and expiry, and owns the login/logout lifecycle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

use super::clock::Clock;
use super::store::KeyValueStore;
use crate::error::{AdminError, Result};

/// Storage key holding the opaque auth token.
pub const TOKEN_KEY: &str = "authToken";

/// Storage key holding the expiry as epoch milliseconds.
pub const EXPIRY_KEY: &str = "authTokenExpiration";

/// Lifetime of a session created by [`SessionGuard::login`] (one hour).
pub const SESSION_DURATION_MS: i64 = 3_600_000;

/// Authentication state of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated {
        /// Expiry in epoch milliseconds.
        expires_at: i64,
    },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }
}

#[derive(Debug)]
struct Inner {
    state: SessionState,
    token: Option<SecretString>,
}

impl Inner {
    fn reset(&mut self) {
        self.state = SessionState::Unauthenticated;
        self.token = None;
    }
}

/// Gate between protected commands and the login flow.
///
/// Starts `Unauthenticated` until [`initialize`](Self::initialize) runs.
/// Mutations hold an internal lock across both storage entries, so racing
/// login/logout calls always leave a whole record (or none) behind.
pub struct SessionGuard {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    inner: Mutex<Inner>,
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl SessionGuard {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            inner: Mutex::new(Inner {
                state: SessionState::Unauthenticated,
                token: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Derives the session from persisted storage.
    ///
    /// Expired, incomplete, or unparseable records are cleared. Storage
    /// failures demote to `Unauthenticated` instead of erroring.
    pub fn initialize(&self) -> SessionState {
        let mut inner = self.lock();
        inner.reset();

        let token = match self.store.get(TOKEN_KEY) {
            Ok(t) => t.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read session token: {}", e);
                return inner.state;
            }
        };
        let expiry = match self.store.get(EXPIRY_KEY) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Failed to read session expiry: {}", e);
                return inner.state;
            }
        };

        match (token, expiry) {
            (None, None) => {}
            (Some(token), Some(raw)) => match raw.trim().parse::<i64>() {
                Ok(expires_at) if self.clock.now_millis() < expires_at => {
                    tracing::debug!("Restored session expiring at {}", expires_at);
                    inner.state = SessionState::Authenticated { expires_at };
                    inner.token = Some(SecretString::from(token));
                }
                Ok(expires_at) => {
                    tracing::debug!("Session expired at {}, clearing", expires_at);
                    self.clear_store();
                }
                Err(_) => {
                    tracing::warn!("Session expiry '{}' is not a timestamp, clearing", raw);
                    self.clear_store();
                }
            },
            _ => {
                tracing::debug!("Incomplete session record, clearing");
                self.clear_store();
            }
        }

        inner.state
    }

    /// Persists `token` with a fresh one-hour expiry, replacing any prior
    /// session.
    pub fn login(&self, token: impl Into<String>) -> Result<SessionState> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AdminError::InvalidToken("token must not be empty".to_string()));
        }

        let mut inner = self.lock();
        let expires_at = self.clock.now_millis() + SESSION_DURATION_MS;

        let written = self
            .store
            .set(TOKEN_KEY, &token)
            .and_then(|()| self.store.set(EXPIRY_KEY, &expires_at.to_string()));

        if let Err(e) = written {
            // Never leave half a record behind
            self.clear_store();
            inner.reset();
            return Err(e.into());
        }

        tracing::debug!("Logged in, session expires at {}", expires_at);
        inner.state = SessionState::Authenticated { expires_at };
        inner.token = Some(SecretString::from(token));
        Ok(inner.state)
    }

    /// Clears the persisted session. Safe to call without a session.
    pub fn logout(&self) -> Result<()> {
        let mut inner = self.lock();
        inner.reset();

        // Attempt both removals before reporting the first failure
        let token = self.store.remove(TOKEN_KEY);
        let expiry = self.store.remove(EXPIRY_KEY);
        token.and(expiry)?;

        tracing::debug!("Logged out");
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// Returns a copy of the current token, if authenticated.
    pub fn token(&self) -> Option<SecretString> {
        self.lock()
            .token
            .as_ref()
            .map(|t| SecretString::from(t.expose_secret().to_owned()))
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self.state() {
            SessionState::Authenticated { expires_at } => DateTime::from_timestamp_millis(expires_at),
            SessionState::Unauthenticated => None,
        }
    }

    fn clear_store(&self) {
        for key in [TOKEN_KEY, EXPIRY_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!("Failed to clear session entry {}: {}", key, e);
            }
        }
    }
}
