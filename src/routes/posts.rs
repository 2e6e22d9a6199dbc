use askama::Template;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::db::models::{FullPost, Like, Post};
use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, FormFields};
use crate::routes::home::Html;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "posts.html")]
pub struct PostsTemplate {
    pub posts: Vec<Post>,
}

#[derive(Deserialize, Default)]
pub struct NewPostForm {
    #[serde(default)]
    pub content: String,
}

#[derive(Deserialize, Default)]
pub struct LikesForm {
    #[serde(default)]
    pub post_id: String,
}

/// POST /create_post — returns the new post id
pub async fn create_post(
    State(state): State<AppState>,
    user: CurrentUser,
    FormFields(form): FormFields<NewPostForm>,
) -> AppResult<String> {
    if form.content.is_empty() {
        return Err(AppError::BadRequest("Content cannot be empty".into()));
    }

    state
        .store
        .create_post(&user.id, &form.content)
        .await
        .map_err(AppError::store("Error creating post"))
}

/// GET /post/{post_id}
pub async fn get_full_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> AppResult<Json<FullPost>> {
    let post = state
        .store
        .get_full_post(&post_id)
        .await
        .map_err(AppError::store("Error getting post"))?;
    Ok(Json(post))
}

/// POST /get_posts — the caller's own posts as an HTML fragment
pub async fn user_posts(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Html<PostsTemplate>> {
    let posts = state
        .store
        .get_posts_by_user(&user.id)
        .await
        .map_err(AppError::store("Error getting posts"))?;
    Ok(Html(PostsTemplate { posts }))
}

/// POST /like/{post_id}
pub async fn like(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(post_id): Path<String>,
) -> AppResult<&'static str> {
    state
        .store
        .like_post(&user.id, &post_id)
        .await
        .map_err(AppError::store("Error liking post"))?;
    Ok("liked")
}

/// POST /unlike/{post_id}
pub async fn unlike(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(post_id): Path<String>,
) -> AppResult<&'static str> {
    state
        .store
        .unlike_post(&user.id, &post_id)
        .await
        .map_err(AppError::store("Error unliking post"))?;
    Ok("unliked")
}

/// POST /get_likes
pub async fn get_likes(
    State(state): State<AppState>,
    FormFields(form): FormFields<LikesForm>,
) -> AppResult<Json<Vec<Like>>> {
    let likes = state
        .store
        .post_likes(&form.post_id)
        .await
        .map_err(AppError::store("Error getting likes"))?;
    Ok(Json(likes))
}

/// POST /get_like_status/{post_id} — "true" or "false", never an error
pub async fn like_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(post_id): Path<String>,
) -> &'static str {
    match state.store.is_liked(&user.id, &post_id).await {
        Ok(true) => "true",
        Ok(false) => "false",
        Err(e) => {
            tracing::warn!("Like status for {} failed: {}", post_id, e);
            "false"
        }
    }
}
