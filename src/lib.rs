//! mneme — spaced repetition flashcard scheduling
//!
//! The core is two pieces: a pure [`scheduler`] that maps one recall
//! rating to a card's next state and due time, and a [`session`] queue
//! manager that selects and orders the cards for one sitting, folds
//! failures back in, and hands the results to the deck owner when the
//! sitting ends. [`storage`] implements the deck-owner side: JSON deck
//! persistence and the id-keyed merge of session outcomes.
//!
//! Time and randomness are always injected by the caller, so the core has
//! no hidden clock or rng and every behavior is reproducible in tests.

pub mod models;
pub mod scheduler;
pub mod session;
pub mod storage;

pub use models::{Card, CardState, Deck, Rating, SessionConfig, SessionOutcome};
pub use session::{SessionError, SessionStatus, StudySession};
pub use storage::{DeckStorage, DeckStorageError};
