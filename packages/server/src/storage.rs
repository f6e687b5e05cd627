//! File-backed persistence
//!
//! - [`FileStateStore`] - write-through session snapshots (`vocab_progress.json`)
//! - [`GoalMarker`] - timestamp of the last daily-goal reset (`last_reset.txt`)
//!
//! Both write to a temporary file first and rename it into place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use parola_algo::{PersistError, SessionSnapshot, StateStore};
use tracing::{debug, warn};

pub const PROGRESS_FILE: &str = "vocab_progress.json";
pub const RESET_MARKER_FILE: &str = "last_reset.txt";

fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

// ============================================================
// FileStateStore
// ============================================================

/// JSON snapshot file under the state directory.
///
/// Writes are blocking `std::fs` calls made while the session lock is held.
/// A snapshot is a few KB per thousand cards, and holding the lock keeps
/// saves in verdict order.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(PROGRESS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStateStore {
    fn save(&mut self, snapshot: &SessionSnapshot) -> Result<(), PersistError> {
        let json = snapshot.to_json()?;
        write_atomic(&self.path, &json)?;
        debug!(path = %self.path.display(), cards = snapshot.cards.len(), "progress saved");
        Ok(())
    }

    fn load(&mut self) -> Option<SessionSnapshot> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to read saved progress");
                return None;
            }
        };
        match SessionSnapshot::from_json(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "saved progress is unreadable, ignoring");
                None
            }
        }
    }
}

// ============================================================
// GoalMarker
// ============================================================

/// Remembers when the daily goal was last reset and detects calendar-day rollover
#[derive(Debug, Clone)]
pub struct GoalMarker {
    path: PathBuf,
}

impl GoalMarker {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(RESET_MARKER_FILE),
        }
    }

    pub fn last_reset(&self) -> Option<DateTime<Local>> {
        let raw = fs::read_to_string(&self.path).ok()?;
        DateTime::parse_from_rfc3339(raw.trim())
            .map(|dt| dt.with_timezone(&Local))
            .ok()
    }

    /// True when no reset was recorded or it happened on another calendar date
    pub fn needs_reset(&self, now: DateTime<Local>) -> bool {
        match self.last_reset() {
            Some(last) => last.date_naive() != now.date_naive(),
            None => true,
        }
    }

    pub fn record(&self, now: DateTime<Local>) -> io::Result<()> {
        write_atomic(&self.path, &now.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use parola_algo::{VocabCard, VocabEntry};

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, 12, 0, 0).single().unwrap()
    }

    #[test]
    fn test_state_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStateStore::new(dir.path());
        assert!(store.load().is_none());

        let snapshot = SessionSnapshot {
            tick: 12,
            active_pool: vec![0],
            ..SessionSnapshot::from_cards(vec![VocabCard::from_entry(0, VocabEntry::new("mare", "sea"))])
        };
        store.save(&snapshot).unwrap();
        assert!(store.path().exists());
        assert_eq!(store.load(), Some(snapshot));
    }

    #[test]
    fn test_state_store_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PROGRESS_FILE), "{broken").unwrap();
        let mut store = FileStateStore::new(dir.path());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_state_store_reads_legacy_array() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(PROGRESS_FILE),
            r#"[{"id":0,"italian":"sole","chinese":"太阳","proficiency":1}]"#,
        )
        .unwrap();
        let snapshot = FileStateStore::new(dir.path()).load().unwrap();
        assert_eq!(snapshot.cards[0].text, "sole");
    }

    #[test]
    fn test_marker_missing_needs_reset() {
        let dir = tempfile::tempdir().unwrap();
        let marker = GoalMarker::new(dir.path());
        assert!(marker.needs_reset(noon(2026, 3, 1)));
    }

    #[test]
    fn test_marker_compares_calendar_dates() {
        let dir = tempfile::tempdir().unwrap();
        let marker = GoalMarker::new(dir.path());
        marker.record(noon(2026, 3, 1)).unwrap();

        assert!(!marker.needs_reset(noon(2026, 3, 1)));
        let late = Local.with_ymd_and_hms(2026, 3, 1, 23, 30, 0).single().unwrap();
        assert!(!marker.needs_reset(late));
        assert!(marker.needs_reset(noon(2026, 3, 2)));
        assert!(marker.needs_reset(noon(2026, 2, 28)));
    }

    #[test]
    fn test_marker_garbage_needs_reset() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(RESET_MARKER_FILE), "yesterday-ish").unwrap();
        let marker = GoalMarker::new(dir.path());
        assert!(marker.last_reset().is_none());
        assert!(marker.needs_reset(noon(2026, 3, 1)));
    }
}
