//! # Domain Models
//!
//! These structs represent the core entities of Inkpot.
//! Relationships are plain foreign keys; joined read models (`AuthoredPost`,
//! `CommentThreadEntry`) are produced by queries rather than object graphs.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

id_type!(
    /// Surrogate key of a registered account.
    UserId
);
id_type!(PostId);
id_type!(CommentId);

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Unique across all users
    pub email: String,
    /// PHC-formatted salted hash, never the plaintext
    pub password_hash: String,
}

/// Insert payload for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// A blog post as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    /// Unique across all posts
    pub title: String,
    pub subtitle: String,
    /// Display date fixed at creation (e.g. "March 04, 2026")
    pub date: String,
    /// Rich text, stored as submitted
    pub body: String,
}

/// A post joined with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoredPost {
    pub post: Post,
    pub author_name: String,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: UserId,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: String,
}

/// Fields an admin may overwrite on an existing post.
///
/// `author_name` renames the author's account, not just this post's byline.
#[derive(Debug, Clone)]
pub struct PostEdit {
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub author_name: String,
}

/// A comment as stored. Comments are never edited or deleted directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub user_id: UserId,
    pub post_id: PostId,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: UserId,
    pub post_id: PostId,
    pub text: String,
}

/// A comment joined with the commenter's name and email (for avatars).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentThreadEntry {
    pub comment: Comment,
    pub author_name: String,
    pub author_email: String,
}

/// A plain-text message handed to the outbound mail relay.
///
/// Sender and recipient are fixed by the relay's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub subject: String,
    pub body: String,
}
