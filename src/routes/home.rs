use askama::Template;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};

use crate::extractors::SessionCookie;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate;

#[derive(Template)]
#[template(path = "auth.html")]
pub struct AuthTemplate;

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

// Both pages only look at whether the cookie is there. A stale cookie still
// reaches the home page; its protected calls then bounce to /auth.

/// GET /
pub async fn index(SessionCookie(token): SessionCookie) -> Response {
    if token.is_none() {
        return Redirect::to("/auth").into_response();
    }
    Html(IndexTemplate).into_response()
}

/// GET /auth
pub async fn auth_page(SessionCookie(token): SessionCookie) -> Response {
    if token.is_some() {
        return Redirect::to("/").into_response();
    }
    Html(AuthTemplate).into_response()
}
