//! Drill session: owns the scheduler and its storage collaborators.
//!
//! Every request that touches learning state goes through one `DrillSession`
//! behind a mutex, so `tick` and the active pool have a single owner.

use chrono::{DateTime, Local};
use parola_algo::{
    CardStore, Direction, Policy, ResponseOutcome, ReviewView, Scheduler, SchedulerError,
    SchedulerEvent, SchedulerStats, SeededRandom, Selection, StateStore, Verdict, VocabCard,
};
use rand::seq::IndexedRandom;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::source;
use crate::storage::{FileStateStore, GoalMarker};

const ENCOURAGEMENTS: &[&str] = &[
    "Daily goal reached. Remember to rest your eyes.",
    "That was the hardest-working session in the world.",
    "Look at that pace, goal done already.",
    "Great effort today, you earned a break.",
    "Still right here cheering you on.",
    "Keep going, the trip to Italy gets closer every day.",
];

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to prepare state directory {path}: {source}")]
    StateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A presented card together with the branch that chose it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentedCard {
    pub tick: u64,
    pub policy: Policy,
    pub card: Option<VocabCard>,
    pub events: Vec<SchedulerEvent>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseView {
    #[serde(flatten)]
    pub outcome: ResponseOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encouragement: Option<&'static str>,
    pub next_card: Option<VocabCard>,
}

pub struct DrillSession {
    scheduler: Scheduler<SeededRandom>,
    storage: FileStateStore,
    marker: GoalMarker,
}

impl DrillSession {
    /// Restore saved progress, or build a fresh store from the vocabulary source
    pub async fn bootstrap(config: &Config, client: &reqwest::Client) -> Result<Self, BootstrapError> {
        std::fs::create_dir_all(&config.state_dir).map_err(|source| BootstrapError::StateDir {
            path: config.state_dir.display().to_string(),
            source,
        })?;

        let mut storage = FileStateStore::new(&config.state_dir);
        let mut rng = match config.scheduler_seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        };

        let restored = match storage.load() {
            Some(snapshot) => match Scheduler::restore(snapshot, rng.clone(), config.daily_goal) {
                Ok(scheduler) => {
                    info!(cards = scheduler.store().len(), tick = scheduler.tick(), "progress restored");
                    Some(scheduler)
                }
                Err(err) => {
                    warn!(error = %err, "saved progress rejected, starting fresh");
                    None
                }
            },
            None => None,
        };

        let scheduler = match restored {
            Some(mut scheduler) => {
                if scheduler.daily_goal() != config.daily_goal {
                    info!(
                        saved = scheduler.daily_goal(),
                        configured = config.daily_goal,
                        "daily goal changed"
                    );
                    scheduler.set_daily_goal(config.daily_goal);
                }
                scheduler
            }
            None => {
                let entries = match source::load_entries(&config.vocab_source, client).await {
                    Ok(entries) => entries,
                    Err(err) => {
                        error!(error = %err, source = %config.vocab_source, "failed to load vocabulary");
                        Vec::new()
                    }
                };
                let store = match CardStore::initialize_non_empty(entries, &mut rng) {
                    Ok(store) => store,
                    Err(err) => {
                        warn!(error = %err, source = %config.vocab_source, "starting with an empty store");
                        CardStore::default()
                    }
                };
                Scheduler::with_daily_goal(store, rng, config.daily_goal)
            }
        };

        let mut session = Self::from_parts(scheduler, storage, GoalMarker::new(&config.state_dir));
        session.roll_over(Local::now());
        Ok(session)
    }

    pub fn from_parts(
        scheduler: Scheduler<SeededRandom>,
        storage: FileStateStore,
        marker: GoalMarker,
    ) -> Self {
        Self {
            scheduler,
            storage,
            marker,
        }
    }

    /// Reset the daily goal when `now` falls on a new calendar date
    pub fn roll_over(&mut self, now: DateTime<Local>) -> bool {
        if !self.marker.needs_reset(now) {
            return false;
        }
        self.scheduler.reset_daily_goal();
        // counter first, so a restart later today restores the fresh goal
        self.persist("daily reset");
        if let Err(err) = self.marker.record(now) {
            warn!(error = %err, "failed to record daily reset");
        }
        info!(goal = self.scheduler.daily_goal(), "daily goal reset");
        true
    }

    pub fn next_card(&mut self) -> PresentedCard {
        let selection = self.scheduler.select_next();
        self.present(selection)
    }

    pub fn respond(&mut self, id: u32, verdict: Verdict) -> Result<ResponseView, SchedulerError> {
        let outcome = self.scheduler.record_response(id, verdict, &mut self.storage)?;
        let encouragement = if outcome.goal_reached {
            ENCOURAGEMENTS.choose(&mut rand::rng()).copied()
        } else {
            None
        };
        let next_card = outcome
            .next
            .card_id
            .and_then(|next| self.scheduler.card(next).cloned());
        Ok(ResponseView {
            outcome,
            encouragement,
            next_card,
        })
    }

    fn present(&self, selection: Selection) -> PresentedCard {
        let events = selection.events();
        PresentedCard {
            tick: selection.tick,
            policy: selection.policy,
            card: selection.card_id.and_then(|id| self.scheduler.card(id).cloned()),
            events,
        }
    }

    pub fn card(&self, id: u32) -> Option<VocabCard> {
        self.scheduler.card(id).cloned()
    }

    pub fn cards(&self) -> Vec<VocabCard> {
        self.scheduler.store().to_records()
    }

    pub fn browse(&mut self, direction: Direction) -> Option<VocabCard> {
        self.scheduler.browse(direction).cloned()
    }

    pub fn review(&mut self, step: ReviewStep) -> Option<ReviewView> {
        match step {
            ReviewStep::Current => self.scheduler.review_current(),
            ReviewStep::Next => self.scheduler.review_next(),
            ReviewStep::Previous => self.scheduler.review_previous(),
        }
    }

    /// Another round today; persisted so a restart keeps the counter
    pub fn continue_learning(&mut self) -> SchedulerStats {
        self.scheduler.continue_learning();
        self.persist("goal counter");
        self.scheduler.stats()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    /// An empty store is never saved, so a later start retries the source
    fn persist(&mut self, what: &'static str) {
        if self.scheduler.store().is_empty() {
            return;
        }
        if let Err(err) = self.storage.save(&self.scheduler.snapshot()) {
            warn!(error = %err, what, "failed to persist session");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStep {
    Current,
    Next,
    Previous,
}
