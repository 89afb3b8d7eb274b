use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/transactions",
            get(commands::transaction::list_transactions),
        )
        .route(
            "/api/transactions",
            post(commands::transaction::create_transaction),
        )
        .route(
            "/api/transactions/:id",
            get(commands::transaction::get_transaction),
        )
        .route(
            "/api/transactions/:id",
            put(commands::transaction::update_transaction),
        )
        .route(
            "/api/transactions/:id",
            delete(commands::transaction::delete_transaction),
        )
}
