//! Request handlers. Each one resolves the viewer, validates its form,
//! calls a single service, then renders a page or redirects with a flash.

use askama::Template;
use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Extension, Form};
use chrono::{Datelike, Local};
use domains::policy::is_admin;
use domains::{DomainError, PostEdit, PostId, User};
use services::{ContactEnquiry, LoginOutcome, PostDraft, Registration};

use crate::error::ApiResult;
use crate::forms::{CommentForm, ContactForm, FieldErrors, LoginForm, PostForm, RegisterForm};
use crate::guard::AdminUser;
use crate::session::Session;
use crate::state::AppState;
use crate::views::{
    AboutTemplate, CommentView, ContactTemplate, IndexTemplate, LoginTemplate, MakePostTemplate,
    PageContext, PostTemplate, RegisterTemplate,
};

pub const ALREADY_REGISTERED: &str = "User already exists, Log In instead!";
pub const UNKNOWN_EMAIL: &str = "There is no account with that email, Register with a new account.";
pub const WRONG_PASSWORD: &str = "Incorrect Password. Try Again";
pub const LOGIN_TO_COMMENT: &str = "You need to be logged in to comment";
pub const DUPLICATE_TITLE: &str = "A post with that title already exists.";
pub const MESSAGE_SENT: &str = "Message successfully sent";
pub const MESSAGE_FAILED: &str = "Sorry, your message could not be sent. Please try again later.";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolves the session's user. A stale id is dropped from the cookie.
async fn viewer(state: &AppState, session: &mut Session) -> ApiResult<Option<User>> {
    let id = session.user_id();
    let user = state.auth.current_user(id).await?;
    if id.is_some() && user.is_none() {
        tracing::warn!(user_id = ?id, "session refers to a missing user");
        session.log_out();
    }
    Ok(user)
}

fn page_context(viewer: Option<&User>, session: &mut Session) -> PageContext {
    PageContext {
        logged_in: viewer.is_some(),
        is_admin: viewer.is_some_and(is_admin),
        year: Local::now().year(),
        flashes: session.take_flashes(),
    }
}

async fn page(state: &AppState, session: &mut Session) -> ApiResult<PageContext> {
    let user = viewer(state, session).await?;
    Ok(page_context(user.as_ref(), session))
}

fn render(session: Session, template: impl Template) -> ApiResult<Response> {
    let html = template.render()?;
    Ok((session, Html(html)).into_response())
}

fn found(location: String) -> (StatusCode, [(axum::http::HeaderName, String); 1]) {
    (StatusCode::FOUND, [(LOCATION, location)])
}

fn redirect(session: Session, location: impl Into<String>) -> Response {
    (session, found(location.into())).into_response()
}

fn post_path(id: PostId) -> String {
    format!("/post/{id}")
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

pub async fn list_posts(State(state): State<AppState>, mut session: Session) -> ApiResult<Response> {
    let page = page(&state, &mut session).await?;
    let posts = state.posts.list().await?;
    render(session, IndexTemplate { page, posts })
}

pub async fn about(State(state): State<AppState>, mut session: Session) -> ApiResult<Response> {
    let page = page(&state, &mut session).await?;
    render(session, AboutTemplate { page })
}

async fn post_page(
    state: &AppState,
    session: &mut Session,
    id: PostId,
    form: CommentForm,
    errors: FieldErrors,
) -> ApiResult<PostTemplate> {
    let post = state.posts.get(id).await?;
    let comments = state
        .comments
        .thread(id)
        .await?
        .into_iter()
        .map(CommentView::from)
        .collect();
    let page = page(state, session).await?;
    Ok(PostTemplate {
        page,
        post,
        comments,
        form,
        errors,
    })
}

pub async fn show_post(
    State(state): State<AppState>,
    mut session: Session,
    Path(post_id): Path<i64>,
) -> ApiResult<Response> {
    let template = post_page(
        &state,
        &mut session,
        PostId(post_id),
        CommentForm::default(),
        FieldErrors::default(),
    )
    .await?;
    render(session, template)
}

pub async fn add_comment(
    State(state): State<AppState>,
    mut session: Session,
    Path(post_id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> ApiResult<Response> {
    let post_id = PostId(post_id);
    let errors = form.validate();
    if !errors.is_empty() {
        let template = post_page(&state, &mut session, post_id, form, errors).await?;
        return render(session, template);
    }

    let Some(author) = viewer(&state, &mut session).await? else {
        // Still 404 for a post that does not exist
        state.posts.get(post_id).await?;
        session.flash(LOGIN_TO_COMMENT);
        return Ok(redirect(session, post_path(post_id)));
    };

    state.comments.add(&author, post_id, &form.comment).await?;
    Ok(redirect(session, post_path(post_id)))
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

pub async fn register_form(
    State(state): State<AppState>,
    mut session: Session,
) -> ApiResult<Response> {
    let page = page(&state, &mut session).await?;
    render(
        session,
        RegisterTemplate {
            page,
            form: RegisterForm::default(),
            errors: FieldErrors::default(),
        },
    )
}

pub async fn register(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<RegisterForm>,
) -> ApiResult<Response> {
    let errors = form.validate();
    if !errors.is_empty() {
        let page = page(&state, &mut session).await?;
        let form = form.without_password();
        return render(session, RegisterTemplate { page, form, errors });
    }

    let registration = Registration {
        name: form.name,
        email: form.email,
        password: form.password,
    };
    match state.auth.register(registration).await {
        Ok(user) => {
            session.log_in(&user);
            Ok(redirect(session, "/"))
        }
        Err(DomainError::Conflict(_)) => {
            session.flash(ALREADY_REGISTERED);
            Ok(redirect(session, "/login"))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn login_form(State(state): State<AppState>, mut session: Session) -> ApiResult<Response> {
    let page = page(&state, &mut session).await?;
    render(
        session,
        LoginTemplate {
            page,
            email: String::new(),
            errors: FieldErrors::default(),
        },
    )
}

pub async fn login(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<LoginForm>,
) -> ApiResult<Response> {
    let errors = form.validate();
    if !errors.is_empty() {
        let page = page(&state, &mut session).await?;
        let email = form.email;
        return render(session, LoginTemplate { page, email, errors });
    }

    match state.auth.login(&form.email, &form.password).await? {
        LoginOutcome::Authenticated(user) => {
            session.log_in(&user);
            Ok(redirect(session, "/"))
        }
        LoginOutcome::UnknownEmail => {
            session.flash(UNKNOWN_EMAIL);
            Ok(redirect(session, "/login"))
        }
        LoginOutcome::WrongPassword => {
            session.flash(WRONG_PASSWORD);
            Ok(redirect(session, "/login"))
        }
    }
}

pub async fn logout(mut session: Session) -> Response {
    if let Some(id) = session.user_id() {
        tracing::info!(user_id = %id, "user logged out");
    }
    session.log_out();
    redirect(session, "/")
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

pub async fn contact_form(
    State(state): State<AppState>,
    mut session: Session,
) -> ApiResult<Response> {
    let page = page(&state, &mut session).await?;
    render(
        session,
        ContactTemplate {
            page,
            form: ContactForm::default(),
            errors: FieldErrors::default(),
        },
    )
}

pub async fn send_contact(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<ContactForm>,
) -> ApiResult<Response> {
    let errors = form.validate();
    if !errors.is_empty() {
        let page = page(&state, &mut session).await?;
        return render(session, ContactTemplate { page, form, errors });
    }

    let enquiry = ContactEnquiry {
        name: form.name,
        email: form.email,
        phone: form.phone,
        message: form.message,
    };
    match state.contact.send(enquiry).await {
        Ok(()) => session.flash(MESSAGE_SENT),
        // Logged by the contact service
        Err(_) => session.flash(MESSAGE_FAILED),
    }
    Ok(redirect(session, "/contact"))
}

// ---------------------------------------------------------------------------
// Post management (behind `guard::require_admin`)
// ---------------------------------------------------------------------------

pub async fn new_post_form(
    Extension(AdminUser(admin)): Extension<AdminUser>,
    mut session: Session,
) -> ApiResult<Response> {
    let page = page_context(Some(&admin), &mut session);
    render(
        session,
        MakePostTemplate {
            page,
            editing: false,
            action: "/new-post".to_owned(),
            form: PostForm::default(),
            errors: FieldErrors::default(),
        },
    )
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(AdminUser(admin)): Extension<AdminUser>,
    mut session: Session,
    Form(form): Form<PostForm>,
) -> ApiResult<Response> {
    let errors = form.validate(false);
    if !errors.is_empty() {
        let page = page_context(Some(&admin), &mut session);
        return render(
            session,
            MakePostTemplate {
                page,
                editing: false,
                action: "/new-post".to_owned(),
                form,
                errors,
            },
        );
    }

    let draft = PostDraft {
        title: form.title,
        subtitle: form.subtitle,
        body: form.body,
    };
    match state.posts.create(&admin, draft).await {
        Ok(_) => Ok(redirect(session, "/")),
        Err(DomainError::Conflict(_)) => {
            session.flash(DUPLICATE_TITLE);
            Ok(redirect(session, "/new-post"))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn edit_post_form(
    State(state): State<AppState>,
    Extension(AdminUser(admin)): Extension<AdminUser>,
    mut session: Session,
    Path(post_id): Path<i64>,
) -> ApiResult<Response> {
    let id = PostId(post_id);
    let authored = state.posts.get(id).await?;
    let form = PostForm {
        title: authored.post.title,
        subtitle: authored.post.subtitle,
        author: authored.author_name,
        body: authored.post.body,
    };
    let page = page_context(Some(&admin), &mut session);
    render(
        session,
        MakePostTemplate {
            page,
            editing: true,
            action: format!("/edit-post/{id}"),
            form,
            errors: FieldErrors::default(),
        },
    )
}

pub async fn update_post(
    State(state): State<AppState>,
    Extension(AdminUser(admin)): Extension<AdminUser>,
    mut session: Session,
    Path(post_id): Path<i64>,
    Form(form): Form<PostForm>,
) -> ApiResult<Response> {
    let id = PostId(post_id);
    state.posts.get(id).await?;
    let action = format!("/edit-post/{id}");
    let errors = form.validate(true);
    if !errors.is_empty() {
        let page = page_context(Some(&admin), &mut session);
        return render(
            session,
            MakePostTemplate {
                page,
                editing: true,
                action,
                form,
                errors,
            },
        );
    }

    let edit = PostEdit {
        title: form.title,
        subtitle: form.subtitle,
        body: form.body,
        author_name: form.author,
    };
    match state.posts.edit(&admin, id, edit).await {
        Ok(()) => Ok(redirect(session, post_path(id))),
        Err(DomainError::Conflict(_)) => {
            session.flash(DUPLICATE_TITLE);
            Ok(redirect(session, action))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_post(
    State(state): State<AppState>,
    Extension(AdminUser(admin)): Extension<AdminUser>,
    session: Session,
    Path(post_id): Path<i64>,
) -> ApiResult<Response> {
    state.posts.delete(&admin, PostId(post_id)).await?;
    Ok(redirect(session, "/"))
}
