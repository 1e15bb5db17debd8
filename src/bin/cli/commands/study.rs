use std::io::{self, BufRead, Write};

use anyhow::Result;
use chrono::Utc;

use mneme::models::{Rating, SessionConfig};
use mneme::scheduler::preview_hints;
use mneme::session::{SessionStatus, StudySession};

use crate::app::App;

pub fn run(app: &App, deck_name: &str, new_cards: usize) -> Result<()> {
    let deck = app.find_deck(deck_name)?;
    let config = SessionConfig {
        new_card_cap: new_cards,
    };
    let mut session = StudySession::new(&deck, &config, Utc::now(), &mut rand::thread_rng())?;

    if session.status() == SessionStatus::NothingToStudy {
        println!("No cards are due for review in \"{}\" today.", deck.name);
        return Ok(());
    }

    println!("Studying \"{}\". Enter flips the card, 1-4 rates it, q ends.", deck.name);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    'session: while session.status() == SessionStatus::Active {
        let (pos, total) = session.progress();
        let (front, back, hints) = match session.current() {
            Some(card) => (
                card.front.clone(),
                card.back.clone(),
                preview_hints(card, Utc::now()),
            ),
            None => break,
        };

        println!();
        println!("[{}/{}] {}", pos, total, front);

        // Flip phase
        loop {
            prompt("(enter to flip, q to end) ")?;
            match read_input(&mut lines) {
                None | Some(Input::Quit) => break 'session,
                Some(Input::Empty) => {
                    session.flip();
                    break;
                }
                Some(_) => println!("Flip the card first."),
            }
        }

        println!("  -> {}", back);
        println!(
            "  1 again ({})   2 hard ({})   3 good ({})   4 easy ({})",
            hints[0], hints[1], hints[2], hints[3]
        );

        // Rating phase
        loop {
            prompt("rate> ")?;
            match read_input(&mut lines) {
                None | Some(Input::Quit) => break 'session,
                Some(Input::Rating(rating)) => {
                    session.answer(rating, Utc::now())?;
                    break;
                }
                Some(Input::Empty) => println!("Pick a rating: 1-4 or again/hard/good/easy."),
                Some(Input::Unknown(token)) => println!("Unknown input '{}'.", token),
            }
        }
    }

    if session.status() == SessionStatus::Complete {
        println!();
        println!("Deck complete! You've reviewed all due cards for this session.");
    }

    let graded = session.graded_count();
    let outcome = session.end();
    if graded > 0 {
        app.storage.apply_outcome(&outcome)?;
        println!("Saved {} graded card(s).", graded);
    } else {
        println!("Nothing graded; deck unchanged.");
    }

    Ok(())
}

enum Input {
    Empty,
    Quit,
    Rating(Rating),
    Unknown(String),
}

/// Read one line of input; `None` means stdin was closed
fn read_input(lines: &mut impl Iterator<Item = io::Result<String>>) -> Option<Input> {
    let line = lines.next()?.ok()?;
    let input = line.trim().to_lowercase();
    Some(match input.as_str() {
        "" => Input::Empty,
        "q" | "quit" => Input::Quit,
        token => match parse_rating(token) {
            Some(rating) => Input::Rating(rating),
            None => Input::Unknown(input.clone()),
        },
    })
}

/// Accept the numbered shortcuts next to the full rating tokens
fn parse_rating(input: &str) -> Option<Rating> {
    match input {
        "1" => Some(Rating::Again),
        "2" => Some(Rating::Hard),
        "3" => Some(Rating::Good),
        "4" => Some(Rating::Easy),
        _ => input.parse().ok(),
    }
}

fn prompt(text: &str) -> Result<()> {
    print!("{}", text);
    io::stdout().flush()?;
    Ok(())
}
