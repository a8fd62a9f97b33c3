pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::compose::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/compositions/:job_id",
            post(handlers::handle_open)
                .get(handlers::handle_get)
                .delete(handlers::handle_close),
        )
        .route(
            "/api/v1/compositions/:job_id/toggle",
            post(handlers::handle_toggle),
        )
        .route(
            "/api/v1/compositions/:job_id/selection",
            post(handlers::handle_selection),
        )
        .route("/api/v1/compositions/:job_id/move", post(handlers::handle_move))
        .route(
            "/api/v1/compositions/:job_id/items",
            post(handlers::handle_add_item),
        )
        .route(
            "/api/v1/compositions/:job_id/items/:source/:id",
            patch(handlers::handle_edit_item),
        )
        .route(
            "/api/v1/compositions/:job_id/payload",
            get(handlers::handle_payload),
        )
        .route(
            "/api/v1/compositions/:job_id/submit",
            post(handlers::handle_submit),
        )
        .with_state(state)
}
