pub mod assets;
pub mod auth;
pub mod home;
pub mod posts;
pub mod users;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::session::require_session;
use crate::state::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/create_post", post(posts::create_post))
        .route("/update_user", post(users::update_user))
        .route("/like/{post_id}", post(posts::like))
        .route("/unlike/{post_id}", post(posts::unlike))
        .route("/get_likes", post(posts::get_likes))
        .route("/get_posts", post(posts::user_posts))
        .route("/get_like_status/{post_id}", post(posts::like_status))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/", get(home::index))
        .route("/auth", get(home::auth_page))
        .route("/static/{*path}", get(assets::serve))
        .route("/user/{user_id}", get(users::get_user))
        .route("/post/{post_id}", get(posts::get_full_post))
        .merge(auth::router())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
