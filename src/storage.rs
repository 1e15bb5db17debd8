//! Deck persistence and the deck-side merge boundaries
//!
//! Decks live in a single pretty-printed JSON document:
//! ```text
//! {data-dir}/decks.json   # Array of all decks, cards embedded
//! ```
//! The scheduling core never touches this layer; it reads deck snapshots
//! and returns [`SessionOutcome`]s, which are merged back here by card id.
//! Deck editing goes through [`reconcile_cards`], which preserves a card's
//! scheduling state across text edits.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::{Card, Deck, SessionOutcome};

#[derive(Error, Debug)]
pub enum DeckStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Deck not found: {0}")]
    DeckNotFound(String),

    #[error("Line {line} is not a 'front;back' pair")]
    InvalidCardLine { line: usize },
}

pub type Result<T> = std::result::Result<T, DeckStorageError>;

/// An edited or imported card before reconciliation
///
/// Text formats carry no ids, so `id` is usually `None` and identity is
/// recovered by content match against the existing deck.
#[derive(Debug, Clone)]
pub struct CardDraft {
    pub id: Option<String>,
    pub front: String,
    pub back: String,
}

/// Storage manager for deck operations
pub struct DeckStorage {
    /// Base data directory (e.g. ~/.local/share/mneme)
    data_dir: PathBuf,
}

impl DeckStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn decks_path(&self) -> PathBuf {
        self.data_dir.join("decks.json")
    }

    /// List all decks, treating a missing file as an empty collection
    pub fn list_decks(&self) -> Result<Vec<Deck>> {
        let decks_path = self.decks_path();
        if !decks_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&decks_path)?;
        let decks: Vec<Deck> = serde_json::from_str(&content)?;
        Ok(decks)
    }

    /// Get a specific deck
    pub fn get_deck(&self, deck_id: &str) -> Result<Deck> {
        let decks = self.list_decks()?;
        decks
            .into_iter()
            .find(|d| d.id == deck_id)
            .ok_or_else(|| DeckStorageError::DeckNotFound(deck_id.to_string()))
    }

    /// Create a new empty deck
    pub fn create_deck(&self, name: String, color: Option<String>) -> Result<Deck> {
        let mut deck = Deck::new(name);
        deck.color = color;

        let mut decks = self.list_decks()?;
        decks.push(deck.clone());
        self.save_decks(&decks)?;

        log::info!("created deck '{}' ({})", deck.name, deck.id);
        Ok(deck)
    }

    /// Replace a deck's stored copy
    pub fn update_deck(&self, deck: &Deck) -> Result<()> {
        let mut decks = self.list_decks()?;
        let pos = decks
            .iter()
            .position(|d| d.id == deck.id)
            .ok_or_else(|| DeckStorageError::DeckNotFound(deck.id.clone()))?;

        decks[pos] = deck.clone();
        self.save_decks(&decks)
    }

    /// Delete a deck and its cards
    pub fn delete_deck(&self, deck_id: &str) -> Result<()> {
        let mut decks = self.list_decks()?;
        let before = decks.len();
        decks.retain(|d| d.id != deck_id);
        if decks.len() == before {
            return Err(DeckStorageError::DeckNotFound(deck_id.to_string()));
        }
        self.save_decks(&decks)
    }

    /// Merge a finished session's gradings into the stored deck
    ///
    /// Cards are matched by id; cards the session never graded are left
    /// untouched. Returns the deck as persisted.
    pub fn apply_outcome(&self, outcome: &SessionOutcome) -> Result<Deck> {
        let mut deck = self.get_deck(&outcome.deck_id)?;

        for card in &mut deck.cards {
            if let Some(updated) = outcome.updated_cards.iter().find(|u| u.id == card.id) {
                *card = updated.clone();
            }
        }

        self.update_deck(&deck)?;
        log::debug!(
            "merged {} graded cards into deck {}",
            outcome.updated_cards.len(),
            deck.id
        );
        Ok(deck)
    }

    /// Replace a deck's cards with reconciled drafts (see [`reconcile_cards`])
    pub fn replace_cards(&self, deck_id: &str, drafts: Vec<CardDraft>) -> Result<Deck> {
        let mut deck = self.get_deck(deck_id)?;
        deck.cards = reconcile_cards(&deck.cards, drafts);
        self.update_deck(&deck)?;
        Ok(deck)
    }

    fn save_decks(&self, decks: &[Deck]) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        fs::write(self.decks_path(), serde_json::to_string_pretty(decks)?)?;
        Ok(())
    }
}

/// Rebuild a card list from edited drafts, preserving scheduling state
///
/// A draft keeps the existing card's id and SRS fields when it matches one:
/// by id when the draft carries an id, otherwise by exact front/back text.
/// Unmatched drafts become brand-new cards. Each existing card is consumed
/// at most once, so duplicated text does not clone scheduling state.
pub fn reconcile_cards(existing: &[Card], drafts: Vec<CardDraft>) -> Vec<Card> {
    let mut remaining: Vec<&Card> = existing.iter().collect();

    drafts
        .into_iter()
        .map(|draft| {
            let matched = remaining.iter().position(|c| match &draft.id {
                Some(id) => c.id == *id,
                None => c.front == draft.front && c.back == draft.back,
            });

            match matched {
                Some(pos) => {
                    let original = remaining.swap_remove(pos);
                    Card {
                        front: draft.front,
                        back: draft.back,
                        ..original.clone()
                    }
                }
                None => Card::new(draft.front, draft.back),
            }
        })
        .collect()
}

/// Parse the `front;back` one-card-per-line text format
///
/// Blank lines are skipped. A non-blank line without a separator, or with
/// an empty front, is rejected with its 1-based line number.
pub fn parse_cards_text(text: &str) -> Result<Vec<CardDraft>> {
    let mut drafts = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let (front, back) = line
            .split_once(';')
            .ok_or(DeckStorageError::InvalidCardLine { line: idx + 1 })?;
        let front = front.trim();
        let back = back.trim();
        if front.is_empty() {
            return Err(DeckStorageError::InvalidCardLine { line: idx + 1 });
        }

        drafts.push(CardDraft {
            id: None,
            front: front.to_string(),
            back: back.to_string(),
        });
    }

    Ok(drafts)
}
