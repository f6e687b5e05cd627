use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::assistant::{AssistantClient, ChatLog};
use crate::session::DrillSession;

#[derive(Clone)]
pub struct AppState {
    session: Arc<Mutex<DrillSession>>,
    assistant: Arc<AssistantClient>,
    chat_log: Arc<Mutex<ChatLog>>,
    started_at: Instant,
}

impl AppState {
    pub fn new(session: DrillSession, assistant: AssistantClient, chat_log: ChatLog) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            assistant: Arc::new(assistant),
            chat_log: Arc::new(Mutex::new(chat_log)),
            started_at: Instant::now(),
        }
    }

    /// Never hold this guard across an `.await`
    pub fn session(&self) -> &Mutex<DrillSession> {
        &self.session
    }

    pub fn assistant(&self) -> &AssistantClient {
        &self.assistant
    }

    pub fn chat_log(&self) -> &Mutex<ChatLog> {
        &self.chat_log
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
