use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/livestock", get(commands::livestock::list_livestock))
        .route(
            "/api/livestock",
            post(commands::livestock::create_livestock),
        )
        .route(
            "/api/livestock/:id",
            get(commands::livestock::get_livestock),
        )
        .route(
            "/api/livestock/:id",
            put(commands::livestock::update_livestock),
        )
        .route(
            "/api/livestock/:id",
            delete(commands::livestock::delete_livestock),
        )
}
