use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/inventory", get(commands::inventory::list_inventory))
        .route(
            "/api/inventory",
            post(commands::inventory::create_inventory_item),
        )
        .route(
            "/api/inventory/:id",
            get(commands::inventory::get_inventory_item),
        )
        .route(
            "/api/inventory/:id",
            put(commands::inventory::update_inventory_item),
        )
        .route(
            "/api/inventory/:id",
            delete(commands::inventory::delete_inventory_item),
        )
}
