use anyhow::Result;
use chrono::Utc;

use mneme::models::CardState;
use mneme::scheduler::format_delay;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, deck_name: &str, format: &OutputFormat) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    let now = Utc::now();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&deck)?);
        }
        OutputFormat::Plain => {
            let stats = deck.stats(now);
            println!("{} ({} cards)", deck.name, stats.total_cards);
            for card in &deck.cards {
                let schedule = match card.state {
                    CardState::New => "new".to_string(),
                    _ => {
                        let due = card.due_or(now);
                        if due <= now {
                            "due now".to_string()
                        } else {
                            format!("due in {}", format_delay(due - now))
                        }
                    }
                };
                println!("  {} ; {}  [{}]", card.front, card.back, schedule);
            }
        }
    }

    Ok(())
}
