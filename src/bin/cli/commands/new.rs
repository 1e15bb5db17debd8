use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, name: String, color: Option<String>, format: &OutputFormat) -> Result<()> {
    let deck = app.storage.create_deck(name, color)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&deck)?);
        }
        OutputFormat::Plain => {
            println!("Created deck \"{}\"", deck.name);
            println!("  ID: {}", deck.id);
        }
    }

    Ok(())
}
