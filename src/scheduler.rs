//! Spaced repetition scheduling
//!
//! A three-state, four-rating variant of the classic SRS interval model.
//! Cards start `New`, pass through a short `Learning` phase with sub-day
//! delays, and graduate to `Review` where the interval grows by a fixed
//! multiplier per rating. `Again` always demotes to `Learning`, which
//! covers both an initial failure and a lapse from `Review`.
//!
//! The transition function is pure: the current time is an argument, never
//! read from the system clock.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Card, CardState, Rating};

/// Delay before a failed card is shown again, in minutes
const LEARNING_DELAY_MINUTES: i64 = 10;

/// Delay after rating a learning card `hard`, in minutes
const LEARNING_HARD_DELAY_MINUTES: i64 = 15;

/// First review interval after graduating with `good`, in days
const INITIAL_GOOD_INTERVAL_DAYS: f64 = 1.0;

/// First review interval after graduating with `easy`, in days
const INITIAL_EASY_INTERVAL_DAYS: f64 = 4.0;

const HARD_MULTIPLIER: f64 = 1.2;
const GOOD_MULTIPLIER: f64 = 2.5;
const EASY_MULTIPLIER: f64 = 3.0;

/// Minimum interval once a card has graduated, in days
const MIN_INTERVAL_DAYS: f64 = 1.0;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Round an interval to 2 decimal places
///
/// Applied as the final step of every transition so that repeated
/// multiplication cannot accumulate floating-point drift in stored decks.
fn round_interval(days: f64) -> f64 {
    (days * 100.0).round() / 100.0
}

/// `now` plus a possibly fractional number of days
fn days_after(now: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    now + Duration::milliseconds((days * MS_PER_DAY).round() as i64)
}

fn review_multiplier(rating: Rating) -> f64 {
    match rating {
        Rating::Again => 0.0,
        Rating::Hard => HARD_MULTIPLIER,
        Rating::Good => GOOD_MULTIPLIER,
        Rating::Easy => EASY_MULTIPLIER,
    }
}

/// Compute a card's next state, interval, and due time from one rating
///
/// Every (state, rating) pair has a defined transition, so this cannot
/// fail. Missing SRS fields take their defaults (`New`, interval 0,
/// due now) before the transition, matching decks that predate scheduling.
pub fn schedule(card: &Card, rating: Rating, now: DateTime<Utc>) -> Card {
    let mut next = card.clone();

    match card.state {
        CardState::New | CardState::Learning => match rating {
            Rating::Again => {
                next.state = CardState::Learning;
                next.interval = 0.0;
                next.due = Some(now + Duration::minutes(LEARNING_DELAY_MINUTES));
            }
            Rating::Hard => {
                // Still learning, slightly longer delay
                next.state = CardState::Learning;
                next.interval = 0.0;
                next.due = Some(now + Duration::minutes(LEARNING_HARD_DELAY_MINUTES));
            }
            Rating::Good => {
                next.state = CardState::Review;
                next.interval = INITIAL_GOOD_INTERVAL_DAYS;
                next.due = Some(days_after(now, INITIAL_GOOD_INTERVAL_DAYS));
            }
            Rating::Easy => {
                next.state = CardState::Review;
                next.interval = INITIAL_EASY_INTERVAL_DAYS;
                next.due = Some(days_after(now, INITIAL_EASY_INTERVAL_DAYS));
            }
        },
        CardState::Review => match rating {
            Rating::Again => {
                // Lapse: back to learning, interval reset
                next.state = CardState::Learning;
                next.interval = 0.0;
                next.due = Some(now + Duration::minutes(LEARNING_DELAY_MINUTES));
            }
            Rating::Hard | Rating::Good | Rating::Easy => {
                let grown = card.interval * review_multiplier(rating);
                let interval = round_interval(grown.max(MIN_INTERVAL_DAYS));
                next.interval = interval;
                next.due = Some(days_after(now, interval));
            }
        },
    }

    next.interval = round_interval(next.interval);
    next
}

/// The interval each rating would produce, in review order
/// (again, hard, good, easy). Used to label rating choices.
pub fn preview_intervals(card: &Card, now: DateTime<Utc>) -> [f64; 4] {
    Rating::ALL.map(|rating| schedule(card, rating, now).interval)
}

/// Human-readable hint for when each rating would next show the card
pub fn preview_hints(card: &Card, now: DateTime<Utc>) -> [String; 4] {
    Rating::ALL.map(|rating| {
        let next = schedule(card, rating, now);
        format_delay(next.due_or(now) - now)
    })
}

/// Format a delay until the next showing, minutes for sub-day delays
pub fn format_delay(delay: Duration) -> String {
    if delay < Duration::hours(1) {
        format!("{}m", delay.num_minutes().max(1))
    } else if delay < Duration::days(1) {
        format!("{}h", delay.num_hours())
    } else {
        format_interval(delay.num_milliseconds() as f64 / MS_PER_DAY)
    }
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: f64) -> String {
    let whole = days.round() as i64;
    if days < 1.0 {
        "<1d".to_string()
    } else if whole < 7 {
        format!("{}d", whole)
    } else if whole < 30 {
        format!("{}w", whole / 7)
    } else if whole < 365 {
        format!("{}mo", whole / 30)
    } else {
        format!("{}y", whole / 365)
    }
}
