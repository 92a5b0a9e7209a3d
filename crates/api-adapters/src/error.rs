//! HTTP error type and response formatting.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use domains::DomainError;

use crate::views::ErrorTemplate;

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that end a request without the handler's normal response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Admin-only route reached by anyone else.
    #[error("forbidden")]
    Forbidden,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(..) => Self::NotFound(err.to_string()),
            DomainError::Forbidden(_) => Self::Forbidden,
            // Handlers deal with these two before calling a service
            DomainError::ValidationError(_)
            | DomainError::Conflict(_)
            | DomainError::Relay(_)
            | DomainError::Internal(_) => Self::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // No page content at all for forbidden requests
            Self::Forbidden => return StatusCode::FORBIDDEN.into_response(),
            Self::NotFound(msg) => {
                tracing::debug!(%msg, "not found");
                (StatusCode::NOT_FOUND, "The page you requested does not exist.")
            }
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong on our side.")
            }
            Self::Template(err) => {
                tracing::error!(error = %err, "template rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong on our side.")
            }
        };

        let page = ErrorTemplate {
            status: status.as_u16(),
            message,
        };
        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(_) => (status, message).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::not_found("Post", 3), StatusCode::NOT_FOUND),
            (DomainError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (
                DomainError::ValidationError("title is required".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DomainError::Conflict("dup".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DomainError::Internal("disk".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let response = ApiError::Internal("sqlite: disk I/O error".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
    }
}
