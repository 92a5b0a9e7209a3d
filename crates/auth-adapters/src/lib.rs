//! # auth-adapters
//!
//! Argon2-based implementation of the `PasswordHasher` port and the signed
//! cookie that carries a visitor's session.

pub mod password;
pub mod session_cookie;

pub use password::Argon2PasswordHasher;
pub use session_cookie::{session_key, SessionData, SessionKeyError, MIN_KEY_LEN, SESSION_COOKIE};
