//! Adaptive Card Scheduler
//!
//! Decides which card to present next and evolves card state from learner
//! feedback.
//!
//! Selection, once per presentation:
//! - Advance the logical clock (`tick`).
//! - If at least [`OVERFLOW_THRESHOLD`] cards are below Mastered, the whole
//!   difficult set replaces the active pool.
//! - Otherwise every due card joins a frequency-weighted candidate list (Hard x4,
//!   Medium x3) and is rescheduled a few ticks ahead.
//! - A non-empty active pool wins over the candidate list; with both empty the
//!   first card in store order is returned.
//!
//! Transitions: `easy` masters a card and drops it from the active pool,
//! `medium` / `hard` reschedule it and add it to the pool. Every transition is
//! written through to the [`StateStore`] before the next card is selected.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{SchedulerError, StoreError, StoreResult};
use crate::persist::{SessionSnapshot, StateStore};
use crate::review::{DeckPosition, ReviewDeck};
use crate::rng::RandomSource;
use crate::store::CardStore;
use crate::types::{
    Policy, Proficiency, SchedulerEvent, VocabCard, Verdict, DEFAULT_DAILY_GOAL,
    MAX_RESTORED_TICK, OVERFLOW_THRESHOLD,
};

// ==================== Result Types ====================

/// Outcome of one `select_next` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Clock value this presentation happened at
    pub tick: u64,
    pub policy: Policy,
    /// `None` only when the store is empty
    pub card_id: Option<u32>,
}

impl Selection {
    pub fn events(&self) -> Vec<SchedulerEvent> {
        let mut events = Vec::with_capacity(2);
        if self.policy == Policy::Fallback {
            events.push(SchedulerEvent::PoolEmpty);
        }
        if let Some(card_id) = self.card_id {
            events.push(SchedulerEvent::CardSelected { card_id });
        }
        events
    }
}

/// Outcome of one `record_response` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseOutcome {
    pub card_id: u32,
    pub verdict: Verdict,
    pub proficiency: Proficiency,
    pub due_at_tick: u64,
    /// `remaining_today` hit zero with this verdict
    pub goal_reached: bool,
    /// Write-through succeeded
    pub persisted: bool,
    pub next: Selection,
    pub events: Vec<SchedulerEvent>,
}

/// Session statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStats {
    pub total: usize,
    pub mastered: usize,
    /// Rounded share of mastered cards, 0 for an empty store
    pub percentage: u32,
    pub daily_goal: u32,
    pub remaining_today: u32,
    pub tick: u64,
    pub active_pool_size: usize,
    pub review_size: usize,
}

/// One review-deck card with its position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub card: VocabCard,
    #[serde(flatten)]
    pub position: DeckPosition,
    /// Rounded share of deck cards still Mastered
    pub mastered_percentage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Precedence between the three selection branches.
///
/// A non-empty active pool always wins, then the frequency-weighted list,
/// then the store-order fallback.
pub fn decide(active_pool_len: usize, candidate_len: usize) -> Policy {
    if active_pool_len > 0 {
        Policy::Overflow
    } else if candidate_len > 0 {
        Policy::Frequency
    } else {
        Policy::Fallback
    }
}

fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        ((part as f64 / total as f64) * 100.0).round() as u32
    }
}

// ==================== Scheduler ====================

pub struct Scheduler<R: RandomSource> {
    store: CardStore,
    rng: R,
    /// Monotonic logical clock, +1 per presentation
    tick: u64,
    /// Ordered set; never contains a Mastered card
    active_pool: Vec<u32>,
    daily_goal: u32,
    remaining_today: u32,
    review: ReviewDeck,
    /// Position in store order for linear browsing
    browse_cursor: usize,
}

impl<R: RandomSource> Scheduler<R> {
    pub fn new(store: CardStore, rng: R) -> Self {
        Self::with_daily_goal(store, rng, DEFAULT_DAILY_GOAL)
    }

    pub fn with_daily_goal(store: CardStore, rng: R, daily_goal: u32) -> Self {
        let review = ReviewDeck::from_ids(
            store.all().iter().filter(|c| c.is_mastered()).map(|c| c.id),
        );
        Self {
            store,
            rng,
            tick: 0,
            active_pool: Vec::new(),
            daily_goal,
            remaining_today: daily_goal,
            review,
            browse_cursor: 0,
        }
    }

    /// Resume from a persisted snapshot.
    ///
    /// Pool entries that are unknown, duplicated or Mastered are dropped so the
    /// pool invariant holds on a restored session. Clock values above
    /// [`MAX_RESTORED_TICK`] are rejected as corrupt.
    pub fn restore(snapshot: SessionSnapshot, rng: R, default_goal: u32) -> StoreResult<Self> {
        let SessionSnapshot {
            cards,
            tick,
            active_pool,
            daily_goal,
            remaining_today,
        } = snapshot;

        if tick > MAX_RESTORED_TICK {
            return Err(StoreError::CorruptState(format!("tick {tick} out of range")));
        }
        if let Some(card) = cards.iter().find(|c| c.due_at_tick > MAX_RESTORED_TICK) {
            return Err(StoreError::CorruptState(format!(
                "card {} due tick {} out of range",
                card.id, card.due_at_tick
            )));
        }

        let store = CardStore::restore(cards)?;
        let daily_goal = daily_goal.unwrap_or(default_goal);
        let mut scheduler = Self::with_daily_goal(store, rng, daily_goal);
        scheduler.tick = tick;
        scheduler.remaining_today = remaining_today.unwrap_or(daily_goal).min(daily_goal);
        for id in active_pool {
            let eligible = scheduler.store.get(id).is_some_and(|c| !c.is_mastered());
            if eligible {
                scheduler.pool_insert(id);
            }
        }
        Ok(scheduler)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            cards: self.store.to_records(),
            tick: self.tick,
            active_pool: self.active_pool.clone(),
            daily_goal: Some(self.daily_goal),
            remaining_today: Some(self.remaining_today),
        }
    }

    // ========== Selection ==========

    pub fn select_next(&mut self) -> Selection {
        self.tick += 1;
        let tick = self.tick;

        let difficult: Vec<u32> = self
            .store
            .all()
            .iter()
            .filter(|c| c.proficiency.is_difficult())
            .map(|c| c.id)
            .collect();

        let candidates = if difficult.len() >= OVERFLOW_THRESHOLD {
            // wholesale replacement, no frequency pool in this mode
            self.active_pool = difficult;
            Vec::new()
        } else {
            self.frequency_candidates(tick)
        };

        let policy = decide(self.active_pool.len(), candidates.len());
        let card_id = match policy {
            Policy::Overflow => {
                let pos = self.rng.index(self.active_pool.len());
                Some(self.active_pool[pos])
            }
            Policy::Frequency => {
                let pos = self.rng.index(candidates.len());
                Some(candidates[pos])
            }
            Policy::Fallback => self.store.first().map(|c| c.id),
        };

        debug!(
            tick,
            ?policy,
            ?card_id,
            pool = self.active_pool.len(),
            candidates = candidates.len(),
            "card selected"
        );

        Selection {
            tick,
            policy,
            card_id,
        }
    }

    /// Weighted list of due cards; each due card is rescheduled as it is listed
    fn frequency_candidates(&mut self, tick: u64) -> Vec<u32> {
        let mut candidates = Vec::new();
        for pos in 0..self.store.len() {
            let card = self.store.card_at_mut(pos);
            if card.due_at_tick > tick {
                continue;
            }
            let Some((weight, (low, high))) = card.proficiency.frequency_weight() else {
                continue;
            };
            candidates.extend(std::iter::repeat(card.id).take(weight));
            let due = tick + self.rng.between(low, high);
            self.store.card_at_mut(pos).due_at_tick = due;
        }
        candidates
    }

    // ========== Transitions ==========

    /// Apply a verdict, persist the whole session, then select the next card
    pub fn record_response<S: StateStore + ?Sized>(
        &mut self,
        id: u32,
        verdict: Verdict,
        storage: &mut S,
    ) -> Result<ResponseOutcome, SchedulerError> {
        if !self.store.contains(id) {
            return Err(SchedulerError::UnknownCard(id));
        }

        let tick = self.tick;
        let target = verdict.target();
        let mut goal_reached = false;
        self.set_level(id, target)?;

        match target.frequency_weight() {
            Some((_, (low, high))) => {
                let due = tick + self.rng.between(low, high);
                self.store
                    .set_due(id, due)
                    .map_err(|_| SchedulerError::UnknownCard(id))?;
                self.pool_insert(id);
            }
            None => {
                self.active_pool.retain(|&pooled| pooled != id);
                self.review.push(id);
                goal_reached = self.count_towards_goal();
            }
        }

        let persisted = match storage.save(&self.snapshot()) {
            Ok(()) => true,
            Err(err) => {
                warn!(card_id = id, error = %err, "failed to persist progress");
                false
            }
        };

        let (proficiency, due_at_tick) = self
            .store
            .get(id)
            .map(|c| (c.proficiency, c.due_at_tick))
            .ok_or(SchedulerError::UnknownCard(id))?;

        let next = self.select_next();
        let mut events = Vec::new();
        if goal_reached {
            events.push(SchedulerEvent::GoalReached);
        }
        events.extend(next.events());

        debug!(card_id = id, ?verdict, due_at_tick, goal_reached, "response recorded");

        Ok(ResponseOutcome {
            card_id: id,
            verdict,
            proficiency,
            due_at_tick,
            goal_reached,
            persisted,
            next,
            events,
        })
    }

    fn set_level(&mut self, id: u32, level: Proficiency) -> Result<(), SchedulerError> {
        self.store
            .set_proficiency(id, level)
            .map_err(|_| SchedulerError::UnknownCard(id))
    }

    fn pool_insert(&mut self, id: u32) {
        if !self.active_pool.contains(&id) {
            self.active_pool.push(id);
        }
    }

    /// Returns true exactly when the counter reaches zero
    fn count_towards_goal(&mut self) -> bool {
        if self.remaining_today == 0 {
            return false;
        }
        self.remaining_today -= 1;
        self.remaining_today == 0
    }

    // ========== Daily goal ==========

    /// Calendar-day rollover
    pub fn reset_daily_goal(&mut self) {
        self.remaining_today = self.daily_goal;
    }

    /// Another round on the same day
    pub fn continue_learning(&mut self) {
        self.reset_daily_goal();
    }

    pub fn set_daily_goal(&mut self, goal: u32) {
        self.daily_goal = goal;
        self.remaining_today = self.remaining_today.min(goal);
    }

    // ========== Browsing ==========

    /// Step through store order without touching the clock or learning state
    pub fn browse(&mut self, direction: Direction) -> Option<&VocabCard> {
        let len = self.store.len();
        if len == 0 {
            return None;
        }
        self.browse_cursor = match direction {
            Direction::Forward => (self.browse_cursor + 1) % len,
            Direction::Backward => (self.browse_cursor + len - 1) % len,
        };
        self.store.all().get(self.browse_cursor)
    }

    pub fn browse_current(&self) -> Option<&VocabCard> {
        self.store.all().get(self.browse_cursor)
    }

    pub fn review_current(&self) -> Option<ReviewView> {
        self.review_view(self.review.current())
    }

    pub fn review_next(&mut self) -> Option<ReviewView> {
        let id = self.review.next();
        self.review_view(id)
    }

    pub fn review_previous(&mut self) -> Option<ReviewView> {
        let id = self.review.previous();
        self.review_view(id)
    }

    fn review_view(&self, id: Option<u32>) -> Option<ReviewView> {
        let card = self.store.get(id?)?.clone();
        let position = self.review.position()?;
        let still_mastered = self
            .review
            .ids()
            .iter()
            .filter(|&&id| self.store.get(id).is_some_and(|c| c.is_mastered()))
            .count();
        Some(ReviewView {
            card,
            position,
            mastered_percentage: percentage(still_mastered, self.review.len()),
        })
    }

    // ========== Accessors ==========

    pub fn stats(&self) -> SchedulerStats {
        let total = self.store.len();
        let mastered = self.store.mastered_count();
        SchedulerStats {
            total,
            mastered,
            percentage: percentage(mastered, total),
            daily_goal: self.daily_goal,
            remaining_today: self.remaining_today,
            tick: self.tick,
            active_pool_size: self.active_pool.len(),
            review_size: self.review.len(),
        }
    }

    pub fn card(&self, id: u32) -> Option<&VocabCard> {
        self.store.get(id)
    }

    pub fn store(&self) -> &CardStore {
        &self.store
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn active_pool(&self) -> &[u32] {
        &self.active_pool
    }

    pub fn daily_goal(&self) -> u32 {
        self.daily_goal
    }

    pub fn remaining_today(&self) -> u32 {
        self.remaining_today
    }

    pub fn review_deck(&self) -> &ReviewDeck {
        &self.review
    }
}
