use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::db::models::User;
use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, FormFields};
use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bio: String,
}

/// GET /user/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<User>> {
    let user = state
        .store
        .get_user(&user_id)
        .await
        .map_err(AppError::store("Error getting user"))?;
    Ok(Json(user))
}

/// POST /update_user — overwrites both fields, missing ones become empty
pub async fn update_user(
    State(state): State<AppState>,
    user: CurrentUser,
    FormFields(form): FormFields<ProfileForm>,
) -> AppResult<&'static str> {
    state
        .store
        .update_user(&user.id, &form.name, &form.bio)
        .await
        .map_err(AppError::store("Error updating user"))?;
    Ok("User updated")
}
