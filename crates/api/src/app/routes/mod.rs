use axum::{
    routing::{get, post},
    Router,
};

pub mod admin;
pub mod game;
pub mod profile;
pub mod system;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new()
        .route("/profile", get(profile::get_profile))
        .route("/profile/save", post(profile::save_profile))
        .nest("/game", game::router())
        .nest("/admin", admin::router())
}
