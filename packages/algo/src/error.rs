//! Error types for the card store, the scheduler and state persistence.

use thiserror::Error;

/// Card store errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("vocabulary source is empty")]
    EmptySource,

    #[error("persisted state is corrupt: {0}")]
    CorruptState(String),

    #[error("unknown card id: {0}")]
    UnknownCard(u32),
}

/// Scheduler errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("unknown card id: {0}")]
    UnknownCard(u32),
}

/// Failures reported by a [`crate::persist::StateStore`] implementation
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
