use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use parking_lot::MutexGuard;
use parola_algo::{Direction, Verdict};
use serde::{Deserialize, Serialize};

use crate::response::{ok, AppError};
use crate::session::{DrillSession, ReviewStep};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/next", get(next))
        .route("/browse", get(browse))
        .route("/:id/response", post(respond))
        .route("/:id/example", post(example))
}

pub fn session_router() -> Router<AppState> {
    Router::new()
        .route("/api/stats", get(stats))
        .route("/api/review", get(review))
        .route("/api/goal/continue", post(continue_learning))
}

#[derive(Debug, Deserialize)]
struct ResponseRequest {
    verdict: String,
}

#[derive(Debug, Deserialize)]
struct BrowseQuery {
    direction: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReviewQuery {
    direction: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExampleResponse {
    card_id: u32,
    sentence: String,
}

/// Lock the session with the daily rollover already applied
fn session(state: &AppState) -> MutexGuard<'_, DrillSession> {
    let mut session = state.session().lock();
    session.roll_over(Local::now());
    session
}

async fn list(State(state): State<AppState>) -> Response {
    let cards = session(&state).cards();
    ok(cards)
}

async fn next(State(state): State<AppState>) -> Response {
    let presented = session(&state).next_card();
    ok(presented)
}

async fn respond(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(payload): Json<ResponseRequest>,
) -> Result<Response, AppError> {
    let verdict = Verdict::parse(payload.verdict.trim())
        .ok_or_else(|| AppError::validation("verdict must be one of easy, medium, hard"))?;

    let view = session(&state).respond(id, verdict)?;
    Ok(ok(view))
}

async fn browse(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Response, AppError> {
    let direction = match query.direction.as_deref().unwrap_or("forward") {
        "forward" | "next" => Direction::Forward,
        "backward" | "previous" => Direction::Backward,
        other => return Err(AppError::validation(format!("unknown direction: {other}"))),
    };
    let card = session(&state).browse(direction);
    Ok(ok(card))
}

async fn stats(State(state): State<AppState>) -> Response {
    let stats = session(&state).stats();
    ok(stats)
}

async fn review(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> Result<Response, AppError> {
    let step = match query.direction.as_deref().unwrap_or("current") {
        "current" => ReviewStep::Current,
        "next" => ReviewStep::Next,
        "previous" => ReviewStep::Previous,
        other => return Err(AppError::validation(format!("unknown direction: {other}"))),
    };
    let view = session(&state).review(step);
    Ok(ok(view))
}

async fn continue_learning(State(state): State<AppState>) -> Response {
    let stats = session(&state).continue_learning();
    ok(stats)
}

async fn example(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Response, AppError> {
    // copy the card out so the lock is released before the request
    let card = session(&state)
        .card(id)
        .ok_or_else(|| AppError::not_found(format!("unknown card id: {id}")))?;

    let sentence = state.assistant().example_sentence(&card).await?;
    Ok(ok(ExampleResponse {
        card_id: card.id,
        sentence,
    }))
}
