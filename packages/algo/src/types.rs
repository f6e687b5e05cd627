//! Common Types and Constants
//!
//! Card data, proficiency levels, verdicts and scheduler events shared by the
//! store and the scheduler.

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Number of simultaneously weak cards that switches selection to the overflow pool
pub const OVERFLOW_THRESHOLD: usize = 7;

/// Weighted entries contributed by a due Hard card
pub const HARD_WEIGHT: usize = 4;

/// Weighted entries contributed by a due Medium card
pub const MEDIUM_WEIGHT: usize = 3;

/// Inclusive due-time offset (in ticks) for Hard cards
pub const HARD_DELAY: (u64, u64) = (4, 6);

/// Inclusive due-time offset (in ticks) for Medium cards
pub const MEDIUM_DELAY: (u64, u64) = (5, 7);

/// Default number of cards to master per day
pub const DEFAULT_DAILY_GOAL: u32 = 50;

/// Largest tick or due tick accepted from persisted state
pub const MAX_RESTORED_TICK: u64 = u64::MAX / 2;

// ==================== Card Types ====================

/// Three-level mastery state of a vocabulary item.
///
/// Serialized as the integers 0, 1, 2; any other value is rejected on restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Proficiency {
    /// Unseen or answered "hard"
    #[default]
    Hard = 0,
    Medium = 1,
    Mastered = 2,
}

impl Proficiency {
    /// Hard and Medium cards count towards the overflow threshold
    pub fn is_difficult(self) -> bool {
        !matches!(self, Proficiency::Mastered)
    }

    /// Sampling weight and due-time jitter range, `None` for Mastered cards
    pub fn frequency_weight(self) -> Option<(usize, (u64, u64))> {
        match self {
            Proficiency::Hard => Some((HARD_WEIGHT, HARD_DELAY)),
            Proficiency::Medium => Some((MEDIUM_WEIGHT, MEDIUM_DELAY)),
            Proficiency::Mastered => None,
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Proficiency {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Proficiency::Hard),
            1 => Ok(Proficiency::Medium),
            2 => Ok(Proficiency::Mastered),
            other => Err(format!("proficiency out of range: {other}")),
        }
    }
}

impl From<Proficiency> for u8 {
    fn from(value: Proficiency) -> Self {
        value.level()
    }
}

/// Raw vocabulary record as delivered by the source list.
///
/// The legacy `italian` / `chinese` field names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabEntry {
    #[serde(alias = "italian")]
    pub text: String,
    #[serde(alias = "chinese")]
    pub translation: String,
    #[serde(default)]
    pub part_of_speech: Option<String>,
}

impl VocabEntry {
    pub fn new(text: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            translation: translation.into(),
            part_of_speech: None,
        }
    }
}

/// A vocabulary item together with its learning state.
///
/// This is also the persisted record shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabCard {
    pub id: u32,
    #[serde(alias = "italian")]
    pub text: String,
    #[serde(alias = "chinese")]
    pub translation: String,
    #[serde(default)]
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub proficiency: Proficiency,
    /// Logical-clock threshold for the frequency pool; ignored while Mastered
    #[serde(default)]
    pub due_at_tick: u64,
}

impl VocabCard {
    pub fn from_entry(id: u32, entry: VocabEntry) -> Self {
        Self {
            id,
            text: entry.text,
            translation: entry.translation,
            part_of_speech: entry.part_of_speech,
            proficiency: Proficiency::Hard,
            due_at_tick: 0,
        }
    }

    pub fn is_mastered(&self) -> bool {
        self.proficiency == Proficiency::Mastered
    }
}

// ==================== Scheduler Types ====================

/// User feedback on a presented card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Easy,
    Medium,
    Hard,
}

impl Verdict {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Verdict::Easy),
            "medium" => Some(Verdict::Medium),
            "hard" => Some(Verdict::Hard),
            _ => None,
        }
    }

    /// Proficiency a card moves to after this verdict
    pub fn target(self) -> Proficiency {
        match self {
            Verdict::Easy => Proficiency::Mastered,
            Verdict::Medium => Proficiency::Medium,
            Verdict::Hard => Proficiency::Hard,
        }
    }
}

/// Which branch produced a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Uniform draw from the active pool
    Overflow,
    /// Uniform draw from the frequency-weighted candidate list
    Frequency,
    /// Both pools empty: first card in store order, if any
    Fallback,
}

/// Notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SchedulerEvent {
    #[serde(rename_all = "camelCase")]
    CardSelected { card_id: u32 },
    PoolEmpty,
    GoalReached,
}
