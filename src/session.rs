//! Study session queue management
//!
//! A session is built once from a deck snapshot, then driven entirely by
//! learner input: `flip` shows the back, `answer` grades the current card
//! and advances, `end` hands the accumulated gradings back to the deck
//! owner. Cards rated `again` are folded back into the same session via a
//! relearning queue, so the session cannot complete until every failed
//! card has been answered with something better.
//!
//! The session owns copies of the cards; the source deck is never touched.
//! Both the clock and the rng are injected so that sessions are
//! deterministic under test.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::models::{Card, CardState, Deck, Rating, SessionConfig, SessionOutcome};
use crate::scheduler::schedule;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("deck card '{front}' has no id")]
    MissingCardId { front: String },

    #[error("session is not active")]
    NotActive,
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Where a session currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// A card is being presented
    Active,
    /// The deck had no new or due cards when the session was built
    NothingToStudy,
    /// Every queued card (including relearning passes) has been answered
    Complete,
}

/// One bounded study session over a deck snapshot
#[derive(Debug)]
pub struct StudySession {
    deck_id: String,
    queue: Vec<Card>,
    relearning: Vec<Card>,
    /// Latest grading per card, in first-graded order
    updated: Vec<Card>,
    cursor: usize,
    revealed: bool,
    status: SessionStatus,
}

/// Due horizon for session selection: anything due today counts
fn end_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    // 23:59:59.999 is always a valid time of day
    now.date_naive()
        .and_hms_milli_opt(23, 59, 59, 999)
        .unwrap()
        .and_utc()
}

impl StudySession {
    /// Build a session from a deck snapshot
    ///
    /// Takes at most `new_card_cap` of the deck's new cards (a fair random
    /// sample), all learning/review cards due by the end of today, and
    /// shuffles them into one queue with no ordering between new and due.
    /// A card without an id is a contract violation by the snapshot
    /// supplier and rejected here rather than mid-session.
    pub fn new(
        deck: &Deck,
        config: &SessionConfig,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        if let Some(card) = deck.cards.iter().find(|c| c.id.is_empty()) {
            return Err(SessionError::MissingCardId {
                front: card.front.clone(),
            });
        }

        let horizon = end_of_day(now);

        let mut new_cards: Vec<Card> = deck
            .cards
            .iter()
            .filter(|c| c.state == CardState::New)
            .cloned()
            .collect();
        new_cards.shuffle(rng);
        new_cards.truncate(config.new_card_cap);

        let mut queue = new_cards;
        let new_count = queue.len();
        queue.extend(
            deck.cards
                .iter()
                .filter(|c| c.state != CardState::New && c.is_due_by(horizon))
                .cloned(),
        );
        queue.shuffle(rng);

        let status = if queue.is_empty() {
            SessionStatus::NothingToStudy
        } else {
            SessionStatus::Active
        };

        log::debug!(
            "session for deck {}: {} new, {} due",
            deck.id,
            new_count,
            queue.len() - new_count
        );

        Ok(Self {
            deck_id: deck.id.clone(),
            queue,
            relearning: Vec::new(),
            updated: Vec::new(),
            cursor: 0,
            revealed: false,
            status,
        })
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn deck_id(&self) -> &str {
        &self.deck_id
    }

    /// The card currently presented, if the session is active
    pub fn current(&self) -> Option<&Card> {
        match self.status {
            SessionStatus::Active => self.queue.get(self.cursor),
            _ => None,
        }
    }

    /// Whether the back of the current card is showing
    pub fn revealed(&self) -> bool {
        self.revealed
    }

    /// 1-based position in the current queue, with the queue length
    ///
    /// The total resets when the relearning queue takes over.
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor + 1, self.queue.len())
    }

    /// Number of cards graded at least once so far
    pub fn graded_count(&self) -> usize {
        self.updated.len()
    }

    /// Toggle the front/back display. No-op unless the session is active.
    pub fn flip(&mut self) {
        if self.status == SessionStatus::Active {
            self.revealed = !self.revealed;
        }
    }

    /// Grade the current card and advance
    ///
    /// The scheduled result replaces any earlier grading of the same card
    /// this session; only the latest survives to the outcome. An `again`
    /// rating additionally requeues the card for this session regardless
    /// of its computed due time. When the last card of the queue has been
    /// answered, the relearning queue (if any) becomes the queue
    /// wholesale; otherwise the session completes.
    pub fn answer(&mut self, rating: Rating, now: DateTime<Utc>) -> Result<SessionStatus> {
        if self.status != SessionStatus::Active {
            return Err(SessionError::NotActive);
        }

        let card = &self.queue[self.cursor];
        let updated = schedule(card, rating, now);
        if rating == Rating::Again {
            self.relearning.push(updated.clone());
        }
        self.record(updated);

        if self.cursor + 1 < self.queue.len() {
            self.cursor += 1;
            self.revealed = false;
        } else if !self.relearning.is_empty() {
            self.queue = std::mem::take(&mut self.relearning);
            self.cursor = 0;
            self.revealed = false;
        } else {
            self.status = SessionStatus::Complete;
            log::debug!(
                "session for deck {} complete, {} cards graded",
                self.deck_id,
                self.updated.len()
            );
        }

        Ok(self.status)
    }

    /// Close the session and emit the accumulated gradings
    ///
    /// Valid at any point; ending before completion still emits every
    /// grading recorded so far, so partial progress is never lost.
    pub fn end(self) -> SessionOutcome {
        log::info!(
            "ending session for deck {} with {} graded cards",
            self.deck_id,
            self.updated.len()
        );
        SessionOutcome {
            deck_id: self.deck_id,
            updated_cards: self.updated,
        }
    }

    fn record(&mut self, card: Card) {
        match self.updated.iter().position(|c| c.id == card.id) {
            Some(pos) => self.updated[pos] = card,
            None => self.updated.push(card),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn new_card(id: &str) -> Card {
        Card {
            id: id.to_string(),
            front: format!("front {}", id),
            back: format!("back {}", id),
            state: CardState::New,
            interval: 0.0,
            due: None,
        }
    }

    fn review_card(id: &str, interval: f64, due: DateTime<Utc>) -> Card {
        Card {
            state: CardState::Review,
            interval,
            due: Some(due),
            ..new_card(id)
        }
    }

    fn deck_of(cards: Vec<Card>) -> Deck {
        let mut deck = Deck::new("test deck".to_string());
        deck.cards = cards;
        deck
    }

    #[test]
    fn test_empty_deck_is_nothing_to_study() {
        let now = Utc::now();
        let deck = deck_of(vec![]);
        let session =
            StudySession::new(&deck, &SessionConfig::default(), now, &mut rng()).unwrap();

        assert_eq!(session.status(), SessionStatus::NothingToStudy);
        assert!(session.current().is_none());
        assert!(session.end().updated_cards.is_empty());
    }

    #[test]
    fn test_no_due_cards_is_nothing_to_study() {
        let now = Utc::now();
        // Due well past today's horizon, so nothing qualifies
        let deck = deck_of(vec![review_card("r1", 10.0, now + Duration::days(10))]);
        let session =
            StudySession::new(&deck, &SessionConfig::default(), now, &mut rng()).unwrap();

        assert_eq!(session.status(), SessionStatus::NothingToStudy);
    }

    #[test]
    fn test_nothing_to_study_is_not_complete() {
        let now = Utc::now();
        let deck = deck_of(vec![]);
        let mut session =
            StudySession::new(&deck, &SessionConfig::default(), now, &mut rng()).unwrap();

        assert_ne!(session.status(), SessionStatus::Complete);
        assert_eq!(session.answer(Rating::Good, now), Err(SessionError::NotActive));
    }

    #[test]
    fn test_new_card_cap_bounds_queue() {
        let now = Utc::now();
        let cards = (0..30).map(|i| new_card(&format!("c{}", i))).collect();
        let deck = deck_of(cards);
        let session =
            StudySession::new(&deck, &SessionConfig::default(), now, &mut rng()).unwrap();

        assert_eq!(session.progress().1, 20);
    }

    #[test]
    fn test_cap_does_not_limit_due_cards() {
        let now = Utc::now();
        let mut cards: Vec<Card> = (0..5).map(|i| new_card(&format!("n{}", i))).collect();
        for i in 0..4 {
            cards.push(review_card(&format!("r{}", i), 2.0, now - Duration::hours(1)));
        }
        let deck = deck_of(cards);
        let config = SessionConfig { new_card_cap: 2 };
        let session = StudySession::new(&deck, &config, now, &mut rng()).unwrap();

        // 2 sampled new cards plus all 4 due cards
        assert_eq!(session.progress().1, 6);
    }

    #[test]
    fn test_learning_card_without_due_counts_as_due() {
        let now = Utc::now();
        let mut card = new_card("l1");
        card.state = CardState::Learning;
        let deck = deck_of(vec![card]);
        let session =
            StudySession::new(&deck, &SessionConfig::default(), now, &mut rng()).unwrap();

        assert_eq!(session.status(), SessionStatus::Active);
    }

    #[test]
    fn test_missing_card_id_is_rejected() {
        let now = Utc::now();
        let mut card = new_card("");
        card.front = "orphan".to_string();
        let deck = deck_of(vec![card]);
        let err = StudySession::new(&deck, &SessionConfig::default(), now, &mut rng())
            .unwrap_err();

        assert_eq!(
            err,
            SessionError::MissingCardId {
                front: "orphan".to_string()
            }
        );
    }

    #[test]
    fn test_flip_toggles_only_while_active() {
        let now = Utc::now();
        let deck = deck_of(vec![new_card("c1")]);
        let mut session =
            StudySession::new(&deck, &SessionConfig::default(), now, &mut rng()).unwrap();

        assert!(!session.revealed());
        session.flip();
        assert!(session.revealed());
        session.flip();
        assert!(!session.revealed());

        session.answer(Rating::Good, now).unwrap();
        assert_eq!(session.status(), SessionStatus::Complete);
        session.flip();
        assert!(!session.revealed());
    }

    #[test]
    fn test_failed_card_reappears_before_completion() {
        let now = Utc::now();
        let deck = deck_of(vec![new_card("c1")]);
        let mut session =
            StudySession::new(&deck, &SessionConfig::default(), now, &mut rng()).unwrap();

        // First pass fails: the card must come back this session even
        // though its computed due time is 10 minutes out
        let status = session.answer(Rating::Again, now).unwrap();
        assert_eq!(status, SessionStatus::Active);
        let current = session.current().unwrap();
        assert_eq!(current.id, "c1");
        assert_eq!(current.state, CardState::Learning);
        assert_eq!(current.interval, 0.0);

        // Second pass graduates and completes the session
        let status = session.answer(Rating::Good, now).unwrap();
        assert_eq!(status, SessionStatus::Complete);

        let outcome = session.end();
        assert_eq!(outcome.updated_cards.len(), 1);
        let card = &outcome.updated_cards[0];
        assert_eq!(card.id, "c1");
        assert_eq!(card.state, CardState::Review);
        assert_eq!(card.interval, 1.0);
    }

    #[test]
    fn test_relearning_queue_replaces_after_last_card() {
        let now = Utc::now();
        let deck = deck_of(vec![new_card("c1"), new_card("c2")]);
        let mut session =
            StudySession::new(&deck, &SessionConfig::default(), now, &mut rng()).unwrap();

        let first_id = session.current().unwrap().id.clone();
        session.answer(Rating::Again, now).unwrap();

        // Still on the initial queue: the failed card does not interleave
        assert_ne!(session.current().unwrap().id, first_id);
        assert_eq!(session.progress(), (2, 2));

        session.answer(Rating::Good, now).unwrap();

        // Relearning queue took over wholesale
        assert_eq!(session.status(), SessionStatus::Active);
        assert_eq!(session.current().unwrap().id, first_id);
        assert_eq!(session.progress(), (1, 1));

        session.answer(Rating::Easy, now).unwrap();
        assert_eq!(session.status(), SessionStatus::Complete);
    }

    #[test]
    fn test_outcome_keeps_latest_grading_per_card() {
        let now = Utc::now();
        let deck = deck_of(vec![new_card("c1"), new_card("c2")]);
        let mut session =
            StudySession::new(&deck, &SessionConfig::default(), now, &mut rng()).unwrap();

        // Fail both, then pass both on the relearning pass
        session.answer(Rating::Again, now).unwrap();
        session.answer(Rating::Again, now).unwrap();
        session.answer(Rating::Good, now).unwrap();
        session.answer(Rating::Good, now).unwrap();
        assert_eq!(session.status(), SessionStatus::Complete);

        let outcome = session.end();
        // One entry per distinct card, no matter how often requeued
        assert_eq!(outcome.updated_cards.len(), 2);
        let mut ids: Vec<&str> = outcome.updated_cards.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, ["c1", "c2"]);
        for card in &outcome.updated_cards {
            assert_eq!(card.state, CardState::Review);
            assert_eq!(card.interval, 1.0);
        }
    }

    #[test]
    fn test_early_end_keeps_partial_progress() {
        let now = Utc::now();
        let deck = deck_of(vec![new_card("c1"), new_card("c2"), new_card("c3")]);
        let mut session =
            StudySession::new(&deck, &SessionConfig::default(), now, &mut rng()).unwrap();

        session.answer(Rating::Good, now).unwrap();
        assert_eq!(session.status(), SessionStatus::Active);

        let outcome = session.end();
        assert_eq!(outcome.updated_cards.len(), 1);
    }

    #[test]
    fn test_answer_resets_reveal() {
        let now = Utc::now();
        let deck = deck_of(vec![new_card("c1"), new_card("c2")]);
        let mut session =
            StudySession::new(&deck, &SessionConfig::default(), now, &mut rng()).unwrap();

        session.flip();
        assert!(session.revealed());
        session.answer(Rating::Good, now).unwrap();
        assert!(!session.revealed());
    }

    #[test]
    fn test_answer_after_complete_is_an_error() {
        let now = Utc::now();
        let deck = deck_of(vec![new_card("c1")]);
        let mut session =
            StudySession::new(&deck, &SessionConfig::default(), now, &mut rng()).unwrap();

        session.answer(Rating::Good, now).unwrap();
        assert_eq!(session.answer(Rating::Good, now), Err(SessionError::NotActive));
    }

    #[test]
    fn test_due_horizon_is_end_of_today() {
        let now = Utc.with_ymd_and_hms(2026, 8, 29, 10, 0, 0).unwrap();
        let tonight = Utc.with_ymd_and_hms(2026, 8, 29, 23, 59, 59).unwrap();
        let tomorrow = Utc.with_ymd_and_hms(2026, 8, 30, 0, 1, 0).unwrap();

        let deck = deck_of(vec![
            review_card("today", 1.0, tonight),
            review_card("tomorrow", 1.0, tomorrow),
        ]);
        let session =
            StudySession::new(&deck, &SessionConfig::default(), now, &mut rng()).unwrap();

        // Due later today is in; due after midnight is not
        assert_eq!(session.progress().1, 1);
        assert_eq!(session.current().unwrap().id, "today");
    }

    #[test]
    fn test_review_card_due_later_today_is_included() {
        let now = Utc::now();
        let horizon = super::end_of_day(now);
        if horizon - now < Duration::minutes(5) {
            // Too close to midnight for a "later today" fixture to exist
            return;
        }
        let deck = deck_of(vec![review_card("r1", 1.0, now + Duration::minutes(4))]);
        let session =
            StudySession::new(&deck, &SessionConfig::default(), now, &mut rng()).unwrap();

        assert_eq!(session.status(), SessionStatus::Active);
    }
}
