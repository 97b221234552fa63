//! Session context shared by every outgoing request
//!
//! Lifecycle: `Uninitialized -> Active -> Cleared`. A session becomes active
//! after login or after a stored token passes the expiry check, and is
//! cleared on logout or on any 401 from the backend.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, errors::ErrorKind, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use shared::{AuthResponse, User};

use crate::error::{ClientError, ClientResult};

/// Claims read from the bearer token. The signature is the backend's concern.
#[derive(Debug, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    exp: Option<i64>,
}

/// Result of inspecting a token locally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCheck {
    Valid { expires_at: Option<DateTime<Utc>> },
    Expired,
    Malformed,
}

/// Check a token's expiry without verifying its signature
pub fn inspect_token(token: &str) -> TokenCheck {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.required_spec_claims.clear();
    validation.validate_exp = true;
    validation.leeway = 0;

    match decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => TokenCheck::Valid {
            expires_at: data
                .claims
                .exp
                .and_then(|exp| Utc.timestamp_opt(exp, 0).single()),
        },
        Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => TokenCheck::Expired,
        Err(_) => TokenCheck::Malformed,
    }
}

/// Signed-in state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveSession {
    pub token: String,
    pub user: User,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Active(ActiveSession),
    Cleared,
}

/// Token persisted between runs
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> ClientResult<Option<ActiveSession>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ClientError::Storage(e.to_string())),
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &ActiveSession) -> ClientResult<()> {
        let raw = serde_json::to_string(session).map_err(|e| ClientError::Storage(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| ClientError::Storage(e.to_string()))
    }

    pub fn remove(&self) -> ClientResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Storage(e.to_string())),
        }
    }
}

/// Shared session handle; clones observe the same state
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
    store: Option<TokenFile>,
}

impl Session {
    /// In-memory session
    pub fn new() -> Self {
        Self::default()
    }

    /// Session backed by a token file
    pub fn with_store(store: TokenFile) -> Self {
        Self {
            state: Arc::default(),
            store: Some(store),
        }
    }

    /// Restore a stored session if its token has not expired.
    ///
    /// Returns whether the session is now active.
    pub fn init(&self) -> ClientResult<bool> {
        let stored = match &self.store {
            Some(store) => store.load()?,
            None => None,
        };

        let Some(stored) = stored else {
            self.set_state(SessionState::Cleared);
            return Ok(false);
        };

        match inspect_token(&stored.token) {
            TokenCheck::Valid { expires_at } => {
                tracing::info!("Restored session for {}", stored.user.username);
                self.set_state(SessionState::Active(ActiveSession { expires_at, ..stored }));
                Ok(true)
            }
            check => {
                tracing::info!("Stored session discarded: {:?}", check);
                self.clear();
                Ok(false)
            }
        }
    }

    /// Start a session from a login response
    pub fn activate(&self, auth: AuthResponse) -> ClientResult<User> {
        let expires_at = match inspect_token(&auth.token) {
            TokenCheck::Valid { expires_at } => expires_at,
            TokenCheck::Expired => return Err(ClientError::SessionExpired),
            TokenCheck::Malformed => {
                return Err(ClientError::Decode("login returned a malformed token".into()))
            }
        };

        let session = ActiveSession {
            token: auth.token,
            user: auth.user.clone(),
            expires_at,
        };
        if let Some(store) = &self.store {
            store.save(&session)?;
        }
        self.set_state(SessionState::Active(session));
        Ok(auth.user)
    }

    /// Drop the session and its stored token
    pub fn clear(&self) {
        self.set_state(SessionState::Cleared);
        if let Some(store) = &self.store {
            if let Err(e) = store.remove() {
                tracing::warn!("Failed to remove session file: {}", e);
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn token(&self) -> Option<String> {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            SessionState::Active(session) => Some(session.token.clone()),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<User> {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            SessionState::Active(session) => Some(session.user.clone()),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state(), SessionState::Active(_))
    }

    pub fn require_user(&self) -> ClientResult<User> {
        self.user().ok_or(ClientError::NotAuthenticated)
    }

    /// Admin-only views and actions
    pub fn require_admin(&self) -> ClientResult<User> {
        let user = self.require_user()?;
        if !user.is_admin() {
            return Err(ClientError::Forbidden);
        }
        Ok(user)
    }

    fn set_state(&self, state: SessionState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }
}
