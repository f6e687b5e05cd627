pub mod assistant;
pub mod config;
pub mod logging;
pub mod response;
pub mod routes;
pub mod session;
pub mod source;
pub mod state;
pub mod storage;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::assistant::{AssistantClient, ChatLog};
use crate::config::Config;
use crate::session::{BootstrapError, DrillSession};
use crate::state::AppState;

pub async fn create_state(config: &Config) -> Result<AppState, BootstrapError> {
    let assistant = AssistantClient::new(config.assistant.clone());
    let http = reqwest::Client::builder()
        .timeout(config.assistant.timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());

    let session = DrillSession::bootstrap(config, &http).await?;
    Ok(AppState::new(
        session,
        assistant,
        ChatLog::new(config.chat_history_limit),
    ))
}

pub async fn create_app(config: &Config) -> Result<axum::Router, BootstrapError> {
    let state = create_state(config).await?;

    Ok(routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()))
}
