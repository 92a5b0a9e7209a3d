//! Askama page templates and the data they receive.

use askama::Template;
use domains::{AuthoredPost, CommentThreadEntry};
use sha2::{Digest, Sha256};

use crate::forms::{CommentForm, ContactForm, FieldErrors, PostForm, RegisterForm};

/// Data every page layout needs.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub logged_in: bool,
    pub is_admin: bool,
    pub year: i32,
    /// Consumed by this render
    pub flashes: Vec<String>,
}

/// Avatar for a commenter: SHA-256 of the trimmed, lower-cased address.
pub fn gravatar_url(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    let hash = hex::encode(hasher.finalize());
    format!("https://www.gravatar.com/avatar/{hash}?s=100&r=g&d=retro")
}

pub struct CommentView {
    pub author_name: String,
    pub avatar_url: String,
    pub text: String,
}

impl From<CommentThreadEntry> for CommentView {
    fn from(entry: CommentThreadEntry) -> Self {
        Self {
            avatar_url: gravatar_url(&entry.author_email),
            author_name: entry.author_name,
            text: entry.comment.text,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub page: PageContext,
    pub posts: Vec<AuthoredPost>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
    pub form: RegisterForm,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub email: String,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub page: PageContext,
    pub post: AuthoredPost,
    pub comments: Vec<CommentView>,
    pub form: CommentForm,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub page: PageContext,
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub page: PageContext,
    pub form: ContactForm,
    pub errors: FieldErrors,
}

/// New-post and edit-post share one form.
#[derive(Template)]
#[template(path = "make_post.html")]
pub struct MakePostTemplate {
    pub page: PageContext,
    pub editing: bool,
    pub action: String,
    pub form: PostForm,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub message: &'static str,
}
