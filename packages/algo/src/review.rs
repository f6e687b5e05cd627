//! Review deck: cards the learner marked easy this session, browsable with wrap-around.

use serde::Serialize;

#[derive(Debug, Clone, Default)]
pub struct ReviewDeck {
    ids: Vec<u32>,
    cursor: usize,
}

/// Cursor position reported to the host, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeckPosition {
    pub position: usize,
    pub total: usize,
}

impl ReviewDeck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = u32>) -> Self {
        let mut deck = Self::new();
        for id in ids {
            deck.push(id);
        }
        deck
    }

    /// Append a card once; repeated pushes are ignored
    pub fn push(&mut self, id: u32) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn current(&self) -> Option<u32> {
        self.ids.get(self.cursor).copied()
    }

    pub fn next(&mut self) -> Option<u32> {
        if self.ids.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.ids.len();
        self.current()
    }

    pub fn previous(&mut self) -> Option<u32> {
        if self.ids.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + self.ids.len() - 1) % self.ids.len();
        self.current()
    }

    pub fn position(&self) -> Option<DeckPosition> {
        if self.ids.is_empty() {
            return None;
        }
        Some(DeckPosition {
            position: self.cursor + 1,
            total: self.ids.len(),
        })
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
