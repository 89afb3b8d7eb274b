use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/crops", get(commands::crop::list_crops))
        .route("/api/crops", post(commands::crop::create_crop))
        .route("/api/crops/:id", get(commands::crop::get_crop))
        .route("/api/crops/:id", put(commands::crop::update_crop))
        .route("/api/crops/:id", delete(commands::crop::delete_crop))
}
