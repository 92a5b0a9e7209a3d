//! # api-adapters
//!
//! The web routing and orchestration layer for Inkpot.

pub mod error;
pub mod forms;
pub mod guard;
pub mod handlers;
pub mod session;
pub mod state;
pub mod views;

use axum::routing::get;
use axum::{middleware, Router};

pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Builds the complete router.
///
/// ## Public
/// - `GET /` - all posts
/// - `GET|POST /register`, `GET|POST /login`, `GET /logout`
/// - `GET|POST /post/{post_id}` - read a post, comment when logged in
/// - `GET /about`, `GET|POST /contact`
///
/// ## Admin only
/// - `GET|POST /new-post`
/// - `GET|POST /edit-post/{post_id}`
/// - `GET /delete/{post_id}`
pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .route(
            "/new-post",
            get(handlers::new_post_form).post(handlers::create_post),
        )
        .route(
            "/edit-post/{post_id}",
            get(handlers::edit_post_form).post(handlers::update_post),
        )
        .route("/delete/{post_id}", get(handlers::delete_post))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_admin,
        ));

    Router::new()
        .route("/", get(handlers::list_posts))
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register),
        )
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route(
            "/post/{post_id}",
            get(handlers::show_post).post(handlers::add_comment),
        )
        .route("/about", get(handlers::about))
        .route(
            "/contact",
            get(handlers::contact_form).post(handlers::send_contact),
        )
        .merge(admin)
        .with_state(state)
}
