use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/farms", get(commands::farm::list_farms))
        .route("/api/farms", post(commands::farm::create_farm))
        .route("/api/farms/:id", get(commands::farm::get_farm))
        .route("/api/farms/:id", put(commands::farm::update_farm))
        .route("/api/farms/:id", delete(commands::farm::delete_farm))
        .route(
            "/api/farms/:id/dashboard",
            get(commands::farm::farm_dashboard),
        )
}
