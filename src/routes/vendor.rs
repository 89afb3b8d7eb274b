use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/vendors", get(commands::vendor::list_vendors))
        .route("/api/vendors", post(commands::vendor::create_vendor))
        .route("/api/vendors/:id", get(commands::vendor::get_vendor))
        .route("/api/vendors/:id", put(commands::vendor::update_vendor))
        .route("/api/vendors/:id", delete(commands::vendor::delete_vendor))
}
