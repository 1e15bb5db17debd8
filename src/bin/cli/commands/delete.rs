use anyhow::Result;

use crate::app::App;

pub fn run(app: &App, deck_name: &str) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    app.storage.delete_deck(&deck.id)?;
    println!("Deleted deck \"{}\"", deck.name);
    Ok(())
}
