use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::auth::password;
use crate::auth::session::{clear_session_cookie, session_cookie};
use crate::db::store::StoreError;
use crate::error::{AppError, AppResult};
use crate::extractors::{FormFields, SessionCookie};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/get_auth", get(get_auth))
        .route("/logout", post(logout))
}

#[derive(Deserialize, Default)]
pub struct CredentialsForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl CredentialsForm {
    fn require_both(&self) -> AppResult<()> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(AppError::BadRequest("Email or password missing".into()));
        }
        Ok(())
    }
}

const BAD_CREDENTIALS: &str = "Incorrect email or password";

/// 200 with a fresh session cookie
fn with_session(state: &AppState, token: &str, body: &'static str) -> Response {
    let auth = &state.config.auth;
    (
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            session_cookie(&auth.cookie_name, token, auth.cookie_max_age_secs),
        )],
        body,
    )
        .into_response()
}

/// POST /signup — create a user and log them in
async fn signup(
    State(state): State<AppState>,
    FormFields(form): FormFields<CredentialsForm>,
) -> AppResult<Response> {
    form.require_both()?;

    let user_id = state
        .store
        .create_user(&form.email, &form.password)
        .await
        .map_err(AppError::store("Error creating user"))?;

    // The user row stays even if this fails; they can still log in.
    let token = state
        .store
        .create_session(&user_id)
        .await
        .map_err(AppError::store("Error creating session"))?;

    tracing::info!(user_id = %user_id, "User signed up");
    Ok(with_session(&state, &token, "User created"))
}

/// POST /login — check credentials and issue a new session
async fn login(
    State(state): State<AppState>,
    FormFields(form): FormFields<CredentialsForm>,
) -> AppResult<Response> {
    form.require_both()?;

    let user = match state.store.get_user_by_email(&form.email).await {
        Ok(user) => user,
        Err(StoreError::NotFound) => {
            // Same bcrypt work as a real check so unknown emails are not faster.
            password::decoy_verify(&form.password, state.config.auth.bcrypt_cost);
            return Err(AppError::BadRequest(BAD_CREDENTIALS.into()));
        }
        Err(e) => return Err(AppError::store("Error getting user")(e)),
    };

    let matches = password::verify_password(&form.password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("stored hash for {} unreadable: {}", user.id, e)))?;
    if !matches {
        return Err(AppError::BadRequest(BAD_CREDENTIALS.into()));
    }

    let token = state
        .store
        .create_session(&user.id)
        .await
        .map_err(AppError::store("Error creating session"))?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(with_session(&state, &token, "User logged in"))
}

/// GET /get_auth — the user id behind the session cookie
async fn get_auth(
    State(state): State<AppState>,
    SessionCookie(token): SessionCookie,
) -> AppResult<String> {
    let token =
        token.ok_or_else(|| AppError::BadRequest("Session cookie not found".into()))?;

    state
        .store
        .resolve_session(&token)
        .await
        .map_err(AppError::store("Error getting user"))
}

/// POST /logout — delete the session and clear the cookie
async fn logout(
    State(state): State<AppState>,
    SessionCookie(token): SessionCookie,
) -> AppResult<Response> {
    if let Some(token) = token {
        state
            .store
            .delete_session(&token)
            .await
            .map_err(AppError::store("Error logging out"))?;
    }

    Ok((
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, "/auth".to_string()),
            (
                header::SET_COOKIE,
                clear_session_cookie(&state.config.auth.cookie_name),
            ),
        ],
    )
        .into_response())
}
