//! Session store and context
//!
//! The signed-in identity lives in one explicit [`SessionContext`], backed by
//! a `session.json` file so a restart does not force a new login. The context
//! is invalidated (file removed) when the backend answers 401 or the token's
//! JWT `exp` has passed.

use std::fs;
use std::path::{Path, PathBuf};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use shared::client::LoginResponse;
use shared::models::{Role, UserProfile};
use thiserror::Error;

use crate::{ClientError, ClientResult};

/// Session file name inside the session directory
pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session expired")]
    Expired,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A signed-in session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub profile: UserProfile,
    /// JWT `exp` (unix seconds), when the token carries one
    pub expires_at: Option<u64>,
    /// Unix seconds
    pub logged_in_at: u64,
}

impl Session {
    pub fn new(token: String, profile: UserProfile, now: u64) -> Self {
        let expires_at = parse_jwt_exp(&token);
        Self {
            token,
            profile,
            expires_at,
            logged_in_at: now,
        }
    }

    pub fn from_login(login: LoginResponse) -> Self {
        Self::new(login.token, login.user, now_secs())
    }

    pub fn is_expired_at(&self, now: u64) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_secs())
    }

    pub fn role(&self) -> Role {
        self.profile.role
    }
}

/// Expiry time from a JWT payload (`header.payload.signature`)
pub fn parse_jwt_exp(token: &str) -> Option<u64> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let payload_bytes = URL_SAFE_NO_PAD.decode(parts[1].trim_end_matches('=')).ok()?;
    let payload: serde_json::Value = serde_json::from_slice(&payload_bytes).ok()?;
    payload.get("exp")?.as_u64()
}

fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// JSON file store for the session
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(SESSION_FILE),
        }
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// `Ok(None)` when no session was saved
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn delete(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The one place the signed-in identity is held
#[derive(Debug)]
pub struct SessionContext {
    store: SessionStore,
    current: Option<Session>,
}

impl SessionContext {
    /// Restore the saved session. An expired or unreadable one is discarded.
    pub fn restore(store: SessionStore) -> Self {
        let current = match store.load() {
            Ok(Some(session)) if session.is_expired() => {
                tracing::info!(user = %session.profile.username, "Saved session expired");
                None
            }
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, path = %store.path().display(), "Discarding unreadable session");
                None
            }
        };
        if current.is_none() {
            if let Err(e) = store.delete() {
                tracing::warn!(error = %e, "Failed to remove session file");
            }
        }
        Self { store, current }
    }

    /// Context with nothing signed in and nothing read from disk
    pub fn empty(store: SessionStore) -> Self {
        Self {
            store,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.current.as_ref().map(|s| &s.profile)
    }

    /// Signed-in session that is still valid; expiry invalidates it
    pub fn require(&mut self) -> ClientResult<&Session> {
        if self.current.as_ref().is_some_and(Session::is_expired) {
            self.invalidate();
            return Err(SessionError::Expired.into());
        }
        self.current
            .as_ref()
            .ok_or_else(|| SessionError::NotSignedIn.into())
    }

    /// Persist a fresh session after login
    pub fn establish(&mut self, session: Session) -> ClientResult<()> {
        self.store.save(&session)?;
        tracing::info!(user = %session.profile.username, role = ?session.profile.role, "Signed in");
        self.current = Some(session);
        Ok(())
    }

    /// Replace the cached profile after a successful profile update
    pub fn refresh_profile(&mut self, profile: UserProfile) -> ClientResult<()> {
        let session = self
            .current
            .as_mut()
            .ok_or(ClientError::Session(SessionError::NotSignedIn))?;
        session.profile = profile;
        self.store.save(session)?;
        Ok(())
    }

    /// Drop the session and its file
    pub fn invalidate(&mut self) {
        if let Some(session) = self.current.take() {
            tracing::info!(user = %session.profile.username, "Session invalidated");
        }
        if let Err(e) = self.store.delete() {
            tracing::warn!(error = %e, "Failed to remove session file");
        }
    }

    /// Sign out
    pub fn logout(&mut self) {
        self.invalidate();
    }

    /// Invalidate when `result` is a 401. Returns `true` if it did.
    pub fn observe<T>(&mut self, result: &ClientResult<T>) -> bool {
        match result {
            Err(e) if e.is_unauthorized() && self.current.is_some() => {
                self.invalidate();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_with_exp(exp: u64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"1","exp":{exp}}}"#));
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn test_parse_jwt_exp() {
        assert_eq!(parse_jwt_exp(&jwt_with_exp(1_900_000_000)), Some(1_900_000_000));
        assert_eq!(parse_jwt_exp("opaque-token"), None);
        assert_eq!(parse_jwt_exp("a.!!!.c"), None);
    }

    #[test]
    fn test_session_expiry() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"id": 1, "fullName": "Admin", "role": "admin"}"#).unwrap();
        let session = Session::new(jwt_with_exp(1_000), profile.clone(), 500);
        assert!(!session.is_expired_at(999));
        assert!(session.is_expired_at(1_000));

        let opaque = Session::new("opaque".into(), profile, 500);
        assert!(!opaque.is_expired_at(u64::MAX));
    }
}
