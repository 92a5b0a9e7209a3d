//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the binary.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    AuthoredPost, Comment, CommentThreadEntry, NewComment, NewPost, NewUser, OutboundEmail, Post,
    PostEdit, PostId, User, UserId,
};

/// Account persistence.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, id: UserId) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Fails with `Conflict` when the email is already registered.
    async fn create_user(&self, user: NewUser) -> Result<User>;
}

/// Post persistence.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<AuthoredPost>>;
    async fn get_post(&self, id: PostId) -> Result<Option<AuthoredPost>>;
    /// Fails with `Conflict` when the title is taken.
    async fn create_post(&self, post: NewPost) -> Result<Post>;
    /// Overwrites the post's text fields and renames its author in one
    /// transaction. Fails with `NotFound` or `Conflict`.
    async fn update_post(&self, id: PostId, edit: PostEdit) -> Result<()>;
    /// Deletes the post together with its comments.
    async fn delete_post(&self, id: PostId) -> Result<()>;
}

/// Comment persistence. There is deliberately no update or delete.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Every comment in the store, across all posts.
    async fn list_comments(&self) -> Result<Vec<Comment>>;
    /// Comments on one post, oldest first, with commenter details.
    async fn comments_for_post(&self, post_id: PostId) -> Result<Vec<CommentThreadEntry>>;
    async fn create_comment(&self, comment: NewComment) -> Result<Comment>;
}

/// Salted, slow one-way password hashing.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String>;
    /// Returns `Ok(false)` on mismatch or an unparseable stored hash.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}

/// Outbound transactional mail.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends one message; relay failures surface as `DomainError::Relay`.
    async fn send(&self, email: OutboundEmail) -> Result<()>;
}
