//! Card Store
//!
//! Holds every vocabulary card in presentation order, with an id index for
//! lookups. The store is built once per session, either fresh from a source
//! list ([`CardStore::initialize`]) or from persisted records
//! ([`CardStore::restore`]), and mutated in place afterwards.

use std::collections::HashMap;

use crate::error::{StoreError, StoreResult};
use crate::rng::{shuffle, RandomSource};
use crate::types::{Proficiency, VocabCard, VocabEntry};

#[derive(Debug, Clone, Default)]
pub struct CardStore {
    /// Cards in presentation order
    cards: Vec<VocabCard>,
    /// id -> position in `cards`
    index: HashMap<u32, usize>,
}

impl CardStore {
    /// Build a fresh store: ids follow source order, presentation order is shuffled.
    ///
    /// An empty source yields an empty store.
    pub fn initialize<R: RandomSource + ?Sized>(entries: Vec<VocabEntry>, rng: &mut R) -> Self {
        let mut cards: Vec<VocabCard> = entries
            .into_iter()
            .enumerate()
            .map(|(id, entry)| VocabCard::from_entry(id as u32, entry))
            .collect();
        shuffle(&mut cards, rng);
        Self::from_ordered(cards)
    }

    /// Like [`CardStore::initialize`] for callers that treat an empty source as invalid
    pub fn initialize_non_empty<R: RandomSource + ?Sized>(
        entries: Vec<VocabEntry>,
        rng: &mut R,
    ) -> StoreResult<Self> {
        if entries.is_empty() {
            return Err(StoreError::EmptySource);
        }
        Ok(Self::initialize(entries, rng))
    }

    /// Replace the store with persisted card records.
    ///
    /// Record order becomes presentation order. Duplicate ids are rejected.
    pub fn restore(records: Vec<VocabCard>) -> StoreResult<Self> {
        let mut seen = HashMap::with_capacity(records.len());
        for (pos, card) in records.iter().enumerate() {
            if seen.insert(card.id, pos).is_some() {
                return Err(StoreError::CorruptState(format!(
                    "duplicate card id {}",
                    card.id
                )));
            }
        }
        Ok(Self {
            cards: records,
            index: seen,
        })
    }

    fn from_ordered(cards: Vec<VocabCard>) -> Self {
        let index = cards
            .iter()
            .enumerate()
            .map(|(pos, card)| (card.id, pos))
            .collect();
        Self { cards, index }
    }

    // ========== Accessors ==========

    pub fn get(&self, id: u32) -> Option<&VocabCard> {
        self.index.get(&id).map(|&pos| &self.cards[pos])
    }

    /// Cards in presentation order
    pub fn all(&self) -> &[VocabCard] {
        &self.cards
    }

    pub fn first(&self) -> Option<&VocabCard> {
        self.cards.first()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.index.contains_key(&id)
    }

    pub fn mastered_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_mastered()).count()
    }

    // ========== Mutation ==========

    pub fn set_proficiency(&mut self, id: u32, level: Proficiency) -> StoreResult<()> {
        let card = self.get_mut(id).ok_or(StoreError::UnknownCard(id))?;
        card.proficiency = level;
        Ok(())
    }

    pub(crate) fn set_due(&mut self, id: u32, due_at_tick: u64) -> StoreResult<()> {
        let card = self.get_mut(id).ok_or(StoreError::UnknownCard(id))?;
        card.due_at_tick = due_at_tick;
        Ok(())
    }

    pub(crate) fn card_at_mut(&mut self, pos: usize) -> &mut VocabCard {
        &mut self.cards[pos]
    }

    fn get_mut(&mut self, id: u32) -> Option<&mut VocabCard> {
        let pos = *self.index.get(&id)?;
        self.cards.get_mut(pos)
    }

    // ========== Serialization ==========

    pub fn to_records(&self) -> Vec<VocabCard> {
        self.cards.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedRandom, SeededRandom};

    fn entries(n: usize) -> Vec<VocabEntry> {
        (0..n)
            .map(|i| VocabEntry::new(format!("parola{i}"), format!("word{i}")))
            .collect()
    }

    #[test]
    fn test_initialize_assigns_ids_in_source_order() {
        let store = CardStore::initialize(entries(10), &mut SeededRandom::new(1));
        assert_eq!(store.len(), 10);
        for id in 0..10u32 {
            let card = store.get(id).unwrap();
            assert_eq!(card.text, format!("parola{id}"));
            assert_eq!(card.proficiency, Proficiency::Hard);
            assert_eq!(card.due_at_tick, 0);
        }
    }

    #[test]
    fn test_initialize_shuffles_presentation_order() {
        // script: i=2 -> 0, i=1 -> 0
        let store = CardStore::initialize(entries(3), &mut ScriptedRandom::new([0, 0]));
        let order: Vec<u32> = store.all().iter().map(|c| c.id).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(store.get(0).unwrap().text, "parola0");
    }

    #[test]
    fn test_initialize_empty_source() {
        let store = CardStore::initialize(Vec::new(), &mut SeededRandom::new(1));
        assert!(store.is_empty());
        assert!(store.first().is_none());

        let err = CardStore::initialize_non_empty(Vec::new(), &mut SeededRandom::new(1));
        assert_eq!(err.unwrap_err(), StoreError::EmptySource);
    }

    #[test]
    fn test_restore_preserves_state_and_order() {
        let mut card = VocabCard::from_entry(5, VocabEntry::new("gatto", "cat"));
        card.proficiency = Proficiency::Medium;
        card.due_at_tick = 12;
        let other = VocabCard::from_entry(2, VocabEntry::new("cane", "dog"));

        let store = CardStore::restore(vec![card.clone(), other]).unwrap();
        assert_eq!(store.get(5), Some(&card));
        assert_eq!(store.all()[1].id, 2);
    }

    #[test]
    fn test_restore_rejects_duplicate_ids() {
        let a = VocabCard::from_entry(1, VocabEntry::new("a", "a"));
        let b = VocabCard::from_entry(1, VocabEntry::new("b", "b"));
        let err = CardStore::restore(vec![a, b]).unwrap_err();
        assert!(matches!(err, StoreError::CorruptState(_)));
    }

    #[test]
    fn test_json_roundtrip_is_identical() {
        let mut store = CardStore::initialize(entries(6), &mut SeededRandom::new(9));
        store.set_proficiency(3, Proficiency::Mastered).unwrap();
        store.set_due(4, 17).unwrap();

        let json = serde_json::to_string(&store.to_records()).unwrap();
        let records: Vec<VocabCard> = serde_json::from_str(&json).unwrap();
        let restored = CardStore::restore(records).unwrap();
        for card in store.all() {
            assert_eq!(restored.get(card.id), Some(card));
        }
    }

    #[test]
    fn test_set_proficiency_leaves_other_fields() {
        let mut store = CardStore::initialize(entries(2), &mut SeededRandom::new(1));
        store.set_due(1, 9).unwrap();
        store.set_proficiency(1, Proficiency::Medium).unwrap();
        let card = store.get(1).unwrap();
        assert_eq!(card.proficiency, Proficiency::Medium);
        assert_eq!(card.due_at_tick, 9);
        assert_eq!(card.text, "parola1");

        assert_eq!(
            store.set_proficiency(42, Proficiency::Hard),
            Err(StoreError::UnknownCard(42))
        );
    }
}
