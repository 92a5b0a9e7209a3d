//! Session extractor to keep HTTP handlers free of cookie plumbing.
//!
//! [`Session`] wraps the signed cookie jar. Handlers mutate it and return it
//! alongside their response; the cookie is rewritten only when something
//! changed, and expired once the session holds nothing.

use std::convert::Infallible;
use std::mem;

use auth_adapters::{SessionData, SESSION_COOKIE};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponseParts, ResponseParts};
use axum_extra::extract::cookie::{CookieJar, SignedCookieJar};
use domains::{User, UserId};

use crate::state::AppState;

pub struct Session {
    jar: SignedCookieJar,
    data: SessionData,
    dirty: bool,
}

impl Session {
    /// Reads the session out of an already verified jar.
    pub fn new(jar: SignedCookieJar) -> Self {
        let data = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| SessionData::from_cookie(&cookie))
            .unwrap_or_default();
        Self {
            jar,
            data,
            dirty: false,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.data.uid.map(UserId)
    }

    /// Marks `user` as authenticated for subsequent requests.
    pub fn log_in(&mut self, user: &User) {
        self.data.uid = Some(user.id.0);
        self.dirty = true;
    }

    /// Forgets everything, including pending flashes.
    pub fn log_out(&mut self) {
        self.data = SessionData::default();
        self.dirty = true;
    }

    pub fn flash(&mut self, message: impl Into<String>) {
        self.data.flashes.push(message.into());
        self.dirty = true;
    }

    /// Removes and returns the pending flash messages.
    pub fn take_flashes(&mut self) -> Vec<String> {
        if self.data.flashes.is_empty() {
            return Vec::new();
        }
        self.dirty = true;
        mem::take(&mut self.data.flashes)
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::from_request_parts(parts, state).await?;
        if jar.get(SESSION_COOKIE).is_none()
            && CookieJar::from_headers(&parts.headers)
                .get(SESSION_COOKIE)
                .is_some()
        {
            tracing::warn!("session cookie failed signature check");
        }
        Ok(Self::new(jar))
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if !self.dirty {
            return Ok(res);
        }

        let jar = if self.data.is_empty() {
            self.jar.remove(SessionData::removal())
        } else {
            match self.data.to_cookie() {
                Ok(cookie) => self.jar.add(cookie),
                Err(err) => {
                    tracing::error!(error = %err, "could not encode session cookie");
                    return Ok(res);
                }
            }
        };
        jar.into_response_parts(res)
    }
}
