use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/live", get(live))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    uptime: u64,
    cards: usize,
    assistant: &'static str,
}

#[derive(Serialize)]
struct LivenessResponse {
    status: &'static str,
    uptime: u64,
}

async fn root(State(state): State<AppState>) -> Response {
    let cards = state.session().lock().stats().total;
    let response = HealthResponse {
        status: "ok",
        timestamp: now_iso(),
        uptime: state.uptime_seconds(),
        cards,
        assistant: if state.assistant().is_available() {
            "configured"
        } else {
            "disabled"
        },
    };
    Json(response).into_response()
}

async fn live(State(state): State<AppState>) -> Response {
    Json(LivenessResponse {
        status: "healthy",
        uptime: state.uptime_seconds(),
    })
    .into_response()
}

fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
