use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::assistant::{ChatMessage, ASSISTANT_SYSTEM_PROMPT};
use crate::response::{ok, AppError};
use crate::state::AppState;

const MAX_MESSAGE_CHARS: usize = 2_000;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/history", get(history))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Serialize)]
struct ChatReply {
    reply: String,
}

async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Response, AppError> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(AppError::validation("message must not be empty"));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::validation("message is too long"));
    }
    if !state.assistant().is_available() {
        return Err(AppError::service_unavailable("assistant is not configured"));
    }

    let history = {
        let mut log = state.chat_log().lock();
        log.push(ChatMessage::user(message));
        log.messages()
    };

    let reply = state.assistant().reply(ASSISTANT_SYSTEM_PROMPT, &history).await?;
    state.chat_log().lock().push(ChatMessage::assistant(reply.clone()));

    Ok(ok(ChatReply { reply }))
}

async fn history(State(state): State<AppState>) -> Response {
    let messages = state.chat_log().lock().messages();
    ok(messages)
}
