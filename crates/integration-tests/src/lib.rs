//! Shared fixtures for the cross-crate scenarios under `tests/`.
//!
//! A [`Blog`] wires the real services to a private in-memory database and
//! the real password hasher, so scenarios exercise the same code paths as
//! the server without HTTP in between.

use std::sync::Arc;

use auth_adapters::Argon2PasswordHasher;
use domains::User;
use services::{AuthService, CommentService, PostDraft, PostService, Registration};
use storage_adapters::SqliteStore;

pub struct Blog {
    pub store: Arc<SqliteStore>,
    pub auth: AuthService,
    pub posts: PostService,
    pub comments: CommentService,
}

impl Blog {
    pub async fn new() -> Self {
        let store = Arc::new(
            SqliteStore::in_memory()
                .await
                .expect("in-memory database"),
        );
        Self {
            auth: AuthService::new(store.clone(), Arc::new(Argon2PasswordHasher::new())),
            posts: PostService::new(store.clone()),
            comments: CommentService::new(store.clone(), store.clone()),
            store,
        }
    }

    /// Registers an account with a fixed password.
    pub async fn register(&self, name: &str, email: &str) -> User {
        self.auth
            .register(Registration {
                name: name.to_owned(),
                email: email.to_owned(),
                password: PASSWORD.to_owned(),
            })
            .await
            .expect("registration")
    }
}

pub const PASSWORD: &str = "correct horse";

pub fn draft(title: &str) -> PostDraft {
    PostDraft {
        title: title.to_owned(),
        subtitle: format!("About {title}"),
        body: format!("<p>{title} body</p>"),
    }
}
