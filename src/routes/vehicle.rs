use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/vehicles", get(commands::vehicle::list_vehicles))
        .route("/api/vehicles", post(commands::vehicle::create_vehicle))
        .route("/api/vehicles/:id", get(commands::vehicle::get_vehicle))
        .route("/api/vehicles/:id", put(commands::vehicle::update_vehicle))
        .route(
            "/api/vehicles/:id",
            delete(commands::vehicle::delete_vehicle),
        )
        .route(
            "/api/fuel-records",
            get(commands::vehicle::list_fuel_records),
        )
        .route(
            "/api/fuel-records",
            post(commands::vehicle::create_fuel_record),
        )
        .route(
            "/api/fuel-records/:id",
            get(commands::vehicle::get_fuel_record),
        )
        .route(
            "/api/fuel-records/:id",
            put(commands::vehicle::update_fuel_record),
        )
        .route(
            "/api/fuel-records/:id",
            delete(commands::vehicle::delete_fuel_record),
        )
        .route(
            "/api/maintenance-records",
            get(commands::vehicle::list_maintenance_records),
        )
        .route(
            "/api/maintenance-records",
            post(commands::vehicle::create_maintenance_record),
        )
        .route(
            "/api/maintenance-records/:id",
            get(commands::vehicle::get_maintenance_record),
        )
        .route(
            "/api/maintenance-records/:id",
            put(commands::vehicle::update_maintenance_record),
        )
        .route(
            "/api/maintenance-records/:id",
            delete(commands::vehicle::delete_maintenance_record),
        )
}
