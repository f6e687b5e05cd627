mod assistant;
mod cards;
mod health;

use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::response::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .nest("/api/cards", cards::router())
        .merge(cards::session_router())
        .nest("/api/assistant", assistant::router())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> Response {
    AppError::not_found("route not found").into_response()
}
