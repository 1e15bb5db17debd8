use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use mneme::models::Deck;
use mneme::storage::DeckStorage;

/// Shared application state for CLI commands
pub struct App {
    pub storage: DeckStorage,
}

impl App {
    /// Initialize against the given data directory, or the platform default
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => dirs::data_dir()
                .context("Failed to resolve data directory")?
                .join("mneme"),
        };

        Ok(Self {
            storage: DeckStorage::new(data_dir),
        })
    }

    /// Find a deck by name (case-insensitive prefix match)
    pub fn find_deck(&self, name: &str) -> Result<Deck> {
        let decks = self.storage.list_decks().context("Failed to list decks")?;

        let name_lower = name.to_lowercase();
        if let Some(deck) = decks.iter().find(|d| d.name.to_lowercase() == name_lower) {
            return Ok(deck.clone());
        }

        let mut matches = decks
            .iter()
            .filter(|d| d.name.to_lowercase().starts_with(&name_lower));

        match (matches.next(), matches.next()) {
            (Some(deck), None) => Ok(deck.clone()),
            (Some(_), Some(_)) => bail!("Deck name '{}' is ambiguous", name),
            (None, _) => bail!("Deck '{}' not found", name),
        }
    }
}
