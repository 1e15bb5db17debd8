use anyhow::Result;
use chrono::Utc;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let decks = app.storage.list_decks()?;
    let now = Utc::now();

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = decks
                .iter()
                .map(|deck| {
                    serde_json::json!({
                        "id": deck.id,
                        "name": deck.name,
                        "stats": deck.stats(now),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if decks.is_empty() {
                println!("No decks yet. Create one with 'mneme new <name>'.");
                return Ok(());
            }
            for deck in &decks {
                let stats = deck.stats(now);
                println!(
                    "{}  ({} cards: {} new, {} due)",
                    deck.name, stats.total_cards, stats.new_cards, stats.due_cards
                );
            }
        }
    }

    Ok(())
}
