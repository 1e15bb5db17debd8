//! Data models for decks, cards, and study sessions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Scheduling state of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardState {
    /// Never studied
    New,
    /// In the initial learning phase (or relapsed into it)
    Learning,
    /// Graduated to spaced review
    Review,
}

impl Default for CardState {
    fn default() -> Self {
        Self::New
    }
}

/// Recall quality reported by the learner for one card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Again => "again",
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }
}

/// Error for a rating token outside the four accepted values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid rating '{0}' (expected again, hard, good, or easy)")]
pub struct InvalidRating(pub String);

impl FromStr for Rating {
    type Err = InvalidRating;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "again" => Ok(Rating::Again),
            "hard" => Ok(Rating::Hard),
            "good" => Ok(Rating::Good),
            "easy" => Ok(Rating::Easy),
            other => Err(InvalidRating(other.to_string())),
        }
    }
}

/// A flashcard with question (front) and answer (back)
///
/// The SRS fields are optional in serialized form for backward
/// compatibility with decks created before scheduling existed: a card
/// without them is treated as new with a zero interval, due now.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub state: CardState,
    #[serde(default)]
    pub interval: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
}

impl Card {
    pub fn new(front: String, back: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            front,
            back,
            state: CardState::New,
            interval: 0.0,
            due: None,
        }
    }

    /// The card's due instant, defaulting to `now` when it was never set
    pub fn due_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.due.unwrap_or(now)
    }

    /// Whether the card is due at or before the given horizon
    pub fn is_due_by(&self, horizon: DateTime<Utc>) -> bool {
        self.due.map_or(true, |d| d <= horizon)
    }
}

/// A named collection of cards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            color: None,
            cards: Vec::new(),
        }
    }

    /// Count cards per state and how many are due at `now`
    pub fn stats(&self, now: DateTime<Utc>) -> DeckStats {
        let mut stats = DeckStats {
            total_cards: self.cards.len(),
            ..DeckStats::default()
        };
        for card in &self.cards {
            match card.state {
                CardState::New => stats.new_cards += 1,
                CardState::Learning => stats.learning_cards += 1,
                CardState::Review => stats.review_cards += 1,
            }
            if card.state != CardState::New && card.is_due_by(now) {
                stats.due_cards += 1;
            }
        }
        stats
    }
}

/// Per-deck card counts, for display
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub learning_cards: usize,
    pub review_cards: usize,
    pub due_cards: usize,
}

/// Tunables for building a study session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Maximum number of new cards introduced per session
    pub new_card_cap: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { new_card_cap: 20 }
    }
}

/// Everything a finished (or abandoned) session hands back to the deck owner
///
/// `updated_cards` holds the latest grading of every card graded at least
/// once this session, in first-graded order. The owner merges them into the
/// persisted deck by id; cards absent from the list are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    pub deck_id: String,
    pub updated_cards: Vec<Card>,
}
