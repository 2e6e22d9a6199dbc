use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;

use crate::db::store::StoreError;
use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

pub fn session_cookie(name: &str, token: &str, max_age_secs: u64) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        name, token, max_age_secs
    )
}

pub fn clear_session_cookie(name: &str) -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", name)
}

/// Value of the first cookie called `name`. Empty values count as absent.
pub fn get_cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == name && !val.is_empty() {
                Some(val)
            } else {
                None
            }
        })
}

/// Gate for protected routes. Resolves the session cookie to a user and
/// stores the result as a `CurrentUser` request extension; anything else
/// redirects to the auth page.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = get_cookie_value(req.headers(), &state.config.auth.cookie_name)
        .map(str::to_owned)
        .ok_or(AppError::Unauthenticated)?;

    let user_id = match state.store.resolve_session(&token).await {
        Ok(user_id) => user_id,
        Err(StoreError::NotFound) => return Err(AppError::Unauthenticated),
        Err(e) => {
            tracing::warn!("Session lookup failed: {}", e);
            return Err(AppError::Unauthenticated);
        }
    };

    req.extensions_mut().insert(CurrentUser { id: user_id });
    Ok(next.run(req).await)
}
