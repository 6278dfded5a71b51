use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/steps", get(handlers::get_steps))
        .route("/api/totals", get(handlers::get_totals))
        .route("/api/gamification", get(handlers::get_gamification))
        .route("/api/participants/:name", get(handlers::get_participant))
        .route("/api/tabs", get(handlers::get_tabs))
        .with_state(state)
}
