//! State Persistence
//!
//! The engine never performs I/O itself. After every proficiency change the
//! scheduler hands a [`SessionSnapshot`] to a [`StateStore`] collaborator
//! (write-through); at start-up the host asks the same collaborator for the
//! last snapshot and falls back to a fresh store when there is none.

use serde::{Deserialize, Serialize};

use crate::error::{PersistError, StoreError, StoreResult};
use crate::types::VocabCard;

/// Everything needed to resume a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub cards: Vec<VocabCard>,
    #[serde(default)]
    pub tick: u64,
    #[serde(default)]
    pub active_pool: Vec<u32>,
    #[serde(default)]
    pub daily_goal: Option<u32>,
    #[serde(default)]
    pub remaining_today: Option<u32>,
}

/// Accepted on-disk shapes: the snapshot object, or the legacy bare card array
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotWire {
    Snapshot(SessionSnapshot),
    Cards(Vec<VocabCard>),
}

impl SessionSnapshot {
    pub fn from_cards(cards: Vec<VocabCard>) -> Self {
        Self {
            cards,
            tick: 0,
            active_pool: Vec::new(),
            daily_goal: None,
            remaining_today: None,
        }
    }

    pub fn from_json(json: &str) -> StoreResult<Self> {
        let wire: SnapshotWire =
            serde_json::from_str(json).map_err(|e| StoreError::CorruptState(e.to_string()))?;
        Ok(match wire {
            SnapshotWire::Snapshot(snapshot) => snapshot,
            SnapshotWire::Cards(cards) => Self::from_cards(cards),
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Storage collaborator for write-through persistence
pub trait StateStore {
    fn save(&mut self, snapshot: &SessionSnapshot) -> Result<(), PersistError>;

    /// Last saved snapshot; `None` when absent or unreadable
    fn load(&mut self) -> Option<SessionSnapshot>;
}

/// Keeps the last snapshot as serialized JSON in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    saved: Option<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw persisted text, e.g. a legacy export
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            saved: Some(raw.into()),
            saves: 0,
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }

    pub fn raw(&self) -> Option<&str> {
        self.saved.as_deref()
    }
}

impl StateStore for MemoryStore {
    fn save(&mut self, snapshot: &SessionSnapshot) -> Result<(), PersistError> {
        self.saved = Some(snapshot.to_json()?);
        self.saves += 1;
        Ok(())
    }

    fn load(&mut self) -> Option<SessionSnapshot> {
        let raw = self.saved.as_deref()?;
        match SessionSnapshot::from_json(raw) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable snapshot");
                None
            }
        }
    }
}
