//! # parola-algo - vocabulary drilling scheduler
//!
//! Pure Rust core of the drilling tool:
//!
//! - **Card Store** - vocabulary cards with their proficiency and due-tick
//! - **Scheduler** - picks the next card (overflow pool, frequency-weighted
//!   sampling, store-order fallback) and applies easy/medium/hard verdicts
//!
//! The crate performs no I/O. Randomness is injected through
//! [`RandomSource`] and persistence through [`StateStore`].
//!
//! ## Module layout
//!
//! - [`types`] - cards, proficiency, verdicts, events and constants
//! - [`store`] - the card store
//! - [`scheduler`] - selection and transitions
//! - [`persist`] - snapshots and the storage collaborator trait
//! - [`review`] - session review deck
//! - [`rng`] - random sources and the Fisher-Yates shuffle
//! - [`error`] - error types
//!
//! ## Example
//!
//! ```rust
//! use parola_algo::{CardStore, MemoryStore, Scheduler, SeededRandom, VocabEntry, Verdict};
//!
//! let mut rng = SeededRandom::new(7);
//! let store = CardStore::initialize(
//!     vec![VocabEntry::new("ciao", "hello"), VocabEntry::new("grazie", "thanks")],
//!     &mut rng,
//! );
//! let mut scheduler = Scheduler::new(store, rng);
//! let mut storage = MemoryStore::new();
//!
//! let first = scheduler.select_next();
//! let id = first.card_id.unwrap();
//! let outcome = scheduler.record_response(id, Verdict::Easy, &mut storage).unwrap();
//! assert!(outcome.persisted);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod error;
pub mod persist;
pub mod review;
pub mod rng;
pub mod scheduler;
pub mod store;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{PersistError, SchedulerError, StoreError, StoreResult};
pub use persist::{MemoryStore, SessionSnapshot, StateStore};
pub use review::{DeckPosition, ReviewDeck};
pub use rng::{shuffle, RandomSource, ScriptedRandom, SeededRandom};
pub use scheduler::{
    decide, Direction, ResponseOutcome, ReviewView, Scheduler, SchedulerStats, Selection,
};
pub use store::CardStore;
pub use types::*;
