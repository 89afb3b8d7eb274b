use crate::state::AppState;
use axum::Router;

pub mod auth;
pub mod crop;
pub mod employee;
pub mod farm;
pub mod inventory;
pub mod livestock;
pub mod plot;
pub mod transaction;
pub mod vehicle;
pub mod vendor;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(farm::router())
        .merge(plot::router())
        .merge(employee::router())
        .merge(livestock::router())
        .merge(crop::router())
        .merge(vehicle::router())
        .merge(inventory::router())
        .merge(transaction::router())
        .merge(vendor::router())
}
