use axum::extract::rejection::FormRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::Form;
use serde::de::DeserializeOwned;

use crate::auth::session::get_cookie_value;
use crate::error::AppError;
use crate::state::AppState;

/// The user behind a resolved session.
///
/// Only available on routes behind `auth::session::require_session`; the
/// middleware puts it in the request extensions and this extractor takes it
/// back out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}

/// Raw session token from the request cookie, if any. Not checked against the
/// store.
pub struct SessionCookie(pub Option<String>);

impl FromRequestParts<AppState> for SessionCookie {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = get_cookie_value(&parts.headers, &state.config.auth.cookie_name);
        Ok(SessionCookie(token.map(str::to_owned)))
    }
}

/// Form body whose fields all default to empty.
///
/// A request with no form content type at all is read as an empty form, so
/// missing fields reach the handler's own emptiness checks. A body that is
/// there but cannot be decoded is a 400.
pub struct FormFields<T>(pub T);

impl<S, T> FromRequest<S> for FormFields<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<T>::from_request(req, state).await {
            Ok(Form(fields)) => Ok(FormFields(fields)),
            Err(FormRejection::InvalidFormContentType(_)) => Ok(FormFields(T::default())),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}
