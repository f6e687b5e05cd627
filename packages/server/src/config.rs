use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use parola_algo::DEFAULT_DAILY_GOAL;

use crate::assistant::AssistantConfig;

const DEFAULT_VOCAB_SOURCE: &str = "vocab.json";
const DEFAULT_STATE_DIR: &str = "./data";
const DEFAULT_CHAT_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// File path or http(s) URL of the vocabulary list
    pub vocab_source: String,
    pub state_dir: PathBuf,
    pub daily_goal: u32,
    /// Fixed seed for reproducible sessions
    pub scheduler_seed: Option<u64>,
    pub chat_history_limit: usize,
    pub assistant: AssistantConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let vocab_source = env_string("VOCAB_SOURCE").unwrap_or_else(|| DEFAULT_VOCAB_SOURCE.to_string());
        let state_dir = PathBuf::from(env_string("STATE_DIR").unwrap_or_else(|| DEFAULT_STATE_DIR.to_string()));

        let daily_goal = env_string("DAILY_GOAL")
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(DEFAULT_DAILY_GOAL);

        let scheduler_seed = env_string("SCHEDULER_SEED").and_then(|value| value.parse::<u64>().ok());

        let chat_history_limit = env_string("CHAT_HISTORY_LIMIT")
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|&limit| limit > 0)
            .unwrap_or(DEFAULT_CHAT_HISTORY_LIMIT);

        Self {
            host,
            port,
            log_level,
            vocab_source,
            state_dir,
            daily_goal,
            scheduler_seed,
            chat_history_limit,
            assistant: AssistantConfig::from_env(),
        }
    }

    /// Defaults rooted at `state_dir`, without reading the environment
    pub fn local(vocab_source: impl Into<String>, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            log_level: "info".to_string(),
            vocab_source: vocab_source.into(),
            state_dir: state_dir.into(),
            daily_goal: DEFAULT_DAILY_GOAL,
            scheduler_seed: None,
            chat_history_limit: DEFAULT_CHAT_HISTORY_LIMIT,
            assistant: AssistantConfig::default(),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

pub(crate) fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
