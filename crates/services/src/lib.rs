//! # services
//!
//! Use cases composed from the domain ports: accounts, posts, comments and
//! the contact relay. Handlers call these; adapters are injected as
//! `Arc<dyn Port>` at construction time.

pub mod auth;
pub mod comments;
pub mod contact;
pub mod posts;

pub use auth::{AuthService, LoginOutcome, Registration};
pub use comments::CommentService;
pub use contact::{ContactEnquiry, ContactService, CONTACT_SUBJECT};
pub use posts::{PostDraft, PostService, DATE_FORMAT};

use domains::{DomainError, Result};

/// Rejects blank input; returns the trimmed value.
pub(crate) fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::ValidationError(format!("{field} is required")));
    }
    Ok(trimmed)
}
