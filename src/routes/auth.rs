use crate::commands;
use crate::state::AppState;
use axum::{routing::post, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(commands::auth::register))
        .route("/api/auth/login", post(commands::auth::login))
}
