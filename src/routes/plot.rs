use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/plots", get(commands::plot::list_plots))
        .route("/api/plots", post(commands::plot::create_plot))
        .route("/api/plots/:id", get(commands::plot::get_plot))
        .route("/api/plots/:id", put(commands::plot::update_plot))
        .route("/api/plots/:id", delete(commands::plot::delete_plot))
        .route("/api/plot-images", get(commands::plot::list_plot_images))
        .route("/api/plot-images", post(commands::plot::create_plot_image))
        .route("/api/plot-images/:id", get(commands::plot::get_plot_image))
        .route(
            "/api/plot-images/:id",
            put(commands::plot::update_plot_image),
        )
        .route(
            "/api/plot-images/:id",
            delete(commands::plot::delete_plot_image),
        )
        .route("/api/plot-workers", get(commands::plot::list_plot_workers))
        .route(
            "/api/plot-workers",
            post(commands::plot::create_plot_worker),
        )
        .route(
            "/api/plot-workers/:id",
            get(commands::plot::get_plot_worker),
        )
        .route(
            "/api/plot-workers/:id",
            put(commands::plot::update_plot_worker),
        )
        .route(
            "/api/plot-workers/:id",
            delete(commands::plot::delete_plot_worker),
        )
        .route(
            "/api/planting-cycles",
            get(commands::plot::list_planting_cycles),
        )
        .route(
            "/api/planting-cycles",
            post(commands::plot::create_planting_cycle),
        )
        .route(
            "/api/planting-cycles/:id",
            get(commands::plot::get_planting_cycle),
        )
        .route(
            "/api/planting-cycles/:id",
            put(commands::plot::update_planting_cycle),
        )
        .route(
            "/api/planting-cycles/:id",
            delete(commands::plot::delete_planting_cycle),
        )
}
