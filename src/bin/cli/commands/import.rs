use std::fs;
use std::io::Read;

use anyhow::{Context, Result};

use mneme::storage::parse_cards_text;

use crate::app::App;

pub fn run(app: &App, deck_name: &str, file: &str) -> Result<()> {
    let deck = app.find_deck(deck_name)?;

    let text = if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file))?
    };

    let drafts = parse_cards_text(&text)?;
    let count = drafts.len();
    let updated = app.storage.replace_cards(&deck.id, drafts)?;

    println!(
        "Deck \"{}\" now has {} cards ({} lines imported)",
        updated.name,
        updated.cards.len(),
        count
    );

    Ok(())
}
