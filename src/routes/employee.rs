use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/employees", get(commands::employee::list_employees))
        .route("/api/employees", post(commands::employee::create_employee))
        .route("/api/employees/:id", get(commands::employee::get_employee))
        .route(
            "/api/employees/:id",
            put(commands::employee::update_employee),
        )
        .route(
            "/api/employees/:id",
            delete(commands::employee::delete_employee),
        )
}
