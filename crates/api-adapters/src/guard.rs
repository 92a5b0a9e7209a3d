//! Admin-only route layer.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use domains::policy::admin_only;
use domains::User;

use crate::error::ApiError;
use crate::session::Session;
use crate::state::AppState;

/// The authorized admin, placed in request extensions by [`require_admin`].
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

/// Rejects the request with 403 unless the session belongs to the admin.
pub async fn require_admin(
    State(state): State<AppState>,
    session: Session,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let current = state.auth.current_user(session.user_id()).await?;
    let admin = match admin_only(current.as_ref()) {
        Ok(user) => user.clone(),
        Err(err) => {
            tracing::debug!(path = %req.uri().path(), reason = %err, "admin route denied");
            return Err(ApiError::Forbidden);
        }
    };

    req.extensions_mut().insert(AdminUser(admin));
    Ok(next.run(req).await)
}
