//! # Session cookie
//!
//! The session lives entirely in the client's cookie. [`SessionData`] is
//! serialized to JSON and base64url encoded into the `inkpot_session` cookie
//! value; signing and verification are left to a signed cookie jar keyed by
//! [`session_key`].

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use cookie::{Cookie, Key, SameSite};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SESSION_COOKIE: &str = "inkpot_session";

/// Shortest secret accepted for signing sessions.
pub const MIN_KEY_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum SessionKeyError {
    #[error("session key must be at least {MIN_KEY_LEN} bytes, got {0}")]
    TooShort(usize),
}

/// Derives the cookie signing key from the configured secret.
pub fn session_key(secret: &[u8]) -> Result<Key, SessionKeyError> {
    if secret.len() < MIN_KEY_LEN {
        return Err(SessionKeyError::TooShort(secret.len()));
    }
    Ok(Key::derive_from(secret))
}

/// Everything the server remembers about a visitor between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// Authenticated user id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<i64>,
    /// One-time notices for the next rendered page
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flashes: Vec<String>,
}

impl SessionData {
    pub fn is_empty(&self) -> bool {
        self.uid.is_none() && self.flashes.is_empty()
    }

    /// The unsigned session cookie; a signed jar signs it when added.
    pub fn to_cookie(&self) -> Result<Cookie<'static>, serde_json::Error> {
        let value = URL_SAFE_NO_PAD.encode(serde_json::to_vec(self)?);
        Ok(Cookie::build((SESSION_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build())
    }

    /// Matches the session cookie's path so the jar can expire it.
    pub fn removal() -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE).path("/").build()
    }

    /// Reads a cookie whose signature has already been verified.
    pub fn from_cookie(cookie: &Cookie<'_>) -> Option<Self> {
        let decoded = URL_SAFE_NO_PAD
            .decode(cookie.value())
            .ok()
            .and_then(|json| serde_json::from_slice(&json).ok());
        if decoded.is_none() {
            tracing::warn!("signed session cookie has an unreadable payload");
        }
        decoded
    }
}
