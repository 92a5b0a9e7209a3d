//! # Authorization policy
//!
//! Inkpot has a single privileged account: the first one ever registered.
//! The rule lives here as a named function so a role column can replace it
//! without touching the HTTP layer.

use crate::error::{DomainError, Result};
use crate::models::{User, UserId};

/// Id of the first row ever inserted into the user table.
pub const ADMIN_USER_ID: UserId = UserId(1);

/// Returns true if `user` is the admin account.
pub fn is_admin(user: &User) -> bool {
    user.id == ADMIN_USER_ID
}

/// Authorizes post management: there must be a current user and it must be
/// the admin.
pub fn admin_only(current: Option<&User>) -> Result<&User> {
    match current {
        Some(user) if is_admin(user) => Ok(user),
        Some(user) => Err(DomainError::Forbidden(format!(
            "user {} may not manage posts",
            user.id
        ))),
        None => Err(DomainError::Forbidden("not logged in".to_owned())),
    }
}
