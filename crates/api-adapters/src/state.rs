//! Shared application state handed to every handler.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use domains::{CommentRepository, Mailer, PasswordHasher, PostRepository, UserRepository};
use services::{AuthService, CommentService, ContactService, PostService};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
    pub contact: Arc<ContactService>,
    /// Signs and verifies the session cookie
    pub session_key: Key,
}

impl AppState {
    /// Wires the services around one store that serves every repository port.
    pub fn new<S>(
        store: Arc<S>,
        hasher: Arc<dyn PasswordHasher>,
        mailer: Arc<dyn Mailer>,
        session_key: Key,
    ) -> Self
    where
        S: UserRepository + PostRepository + CommentRepository + 'static,
    {
        Self {
            auth: Arc::new(AuthService::new(store.clone(), hasher)),
            posts: Arc::new(PostService::new(store.clone())),
            comments: Arc::new(CommentService::new(store.clone(), store)),
            contact: Arc::new(ContactService::new(mailer)),
            session_key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.session_key.clone()
    }
}
