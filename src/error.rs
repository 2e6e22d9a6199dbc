use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

use crate::db::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No session, or a session that does not resolve. Answered with a
    /// redirect to the auth page rather than an error status.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// A store failure. `context` is the only part the client sees.
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |source| AppError::Store { context, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Unauthenticated => Redirect::to("/auth").into_response(),
            AppError::Store {
                context,
                source: StoreError::NotFound,
            } => {
                tracing::warn!("{}: not found", context);
                (StatusCode::NOT_FOUND, context).into_response()
            }
            AppError::Store { context, source } => {
                tracing::error!("{}: {}", context, source);
                (StatusCode::INTERNAL_SERVER_ERROR, context).into_response()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    fn response_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn bad_request_returns_400() {
        assert_eq!(
            response_status(AppError::BadRequest("oops".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn unauthenticated_redirects_to_auth() {
        let response = AppError::Unauthenticated.into_response();
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/auth");
    }

    #[test]
    fn store_not_found_returns_404() {
        let err = AppError::store("Error getting post")(StoreError::NotFound);
        assert_eq!(response_status(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_store_errors_return_500() {
        let err = AppError::store("Error creating user")(StoreError::DuplicateEmail);
        assert_eq!(response_status(err), StatusCode::INTERNAL_SERVER_ERROR);

        let err = AppError::store("Error liking post")(StoreError::Persistence(
            rusqlite::Error::InvalidQuery,
        ));
        assert_eq!(response_status(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_returns_500() {
        assert_eq!(
            response_status(AppError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
