//! # Time Inference Module
//!
//! Maps a free-text request ("что приготовить на ужин?", "рецепт в 19:00")
//! to an hour of the day, and an hour of the day to a meal slot.
//!
//! ## Resolution order
//!
//! 1. Word keywords, category by category: morning → 8, midday → 13, evening/night → 19
//! 2. Standalone hour numbers (`9`, `19:30`), checked against the same categories in the same order
//! 3. The first embedded 1–2 digit number in 0–23, used verbatim
//! 4. The current wall-clock hour

use chrono::{Local, Timelike};
use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;

use crate::catalog::Slot;

/// A category of time expressions resolving to a single canonical hour
struct TimeCategory {
    name: &'static str,
    keywords: &'static [&'static str],
    hours: &'static [u32],
    canonical_hour: u32,
}

// Order matters: the first matching category wins.
const CATEGORIES: [TimeCategory; 3] = [
    TimeCategory {
        name: "morning",
        keywords: &["утро", "завтрак", "утром", "с утра", "рано"],
        hours: &[8, 9],
        canonical_hour: 8,
    },
    TimeCategory {
        name: "midday",
        keywords: &["обед", "днём", "днем"],
        hours: &[10, 11, 12, 13, 14, 15, 16, 17],
        canonical_hour: 13,
    },
    TimeCategory {
        name: "evening",
        keywords: &["ужин", "вечер", "ночь", "сейчас", "поздно"],
        hours: &[18, 19, 20, 21, 22, 23, 0, 1, 2, 3, 4, 5, 6, 7],
        canonical_hour: 19,
    },
];

lazy_static! {
    // A digit run, optionally followed by ":MM" which is consumed so minutes never count as hours
    static ref HOUR_TOKEN: Regex =
        Regex::new(r"(\d+)(?::\d{2})?").expect("Hour token pattern should be valid");
    static ref EMBEDDED_NUMBER: Regex =
        Regex::new(r"\d{1,2}").expect("Embedded number pattern should be valid");
}

/// Infer the hour a request refers to.
///
/// `current_hour` is only used when the text carries no time hint at all,
/// which keeps the function pure for a given input pair.
pub fn parse_hour(text: &str, current_hour: u32) -> u32 {
    let text = text.to_lowercase();

    for category in &CATEGORIES {
        if let Some(keyword) = category.keywords.iter().find(|k| text.contains(**k)) {
            debug!("Keyword '{}' matched {} category", keyword, category.name);
            return category.canonical_hour;
        }
    }

    let hour_tokens: Vec<u32> = HOUR_TOKEN
        .captures_iter(&text)
        .filter_map(|caps| {
            let digits = caps.get(1)?.as_str();
            if digits.len() > 2 {
                return None;
            }
            digits.parse().ok()
        })
        .collect();
    trace!("Standalone hour tokens: {:?}", hour_tokens);

    for category in &CATEGORIES {
        if hour_tokens.iter().any(|h| category.hours.contains(h)) {
            debug!("Hour token matched {} category", category.name);
            return category.canonical_hour;
        }
    }

    if let Some(found) = EMBEDDED_NUMBER.find(&text) {
        if let Ok(hour) = found.as_str().parse::<u32>() {
            if hour <= 23 {
                debug!("Using embedded number {} as hour", hour);
                return hour;
            }
        }
    }

    debug!("No time hint found, falling back to current hour {}", current_hour);
    current_hour
}

/// [`parse_hour`] against the local wall clock
pub fn parse_hour_now(text: &str) -> u32 {
    parse_hour(text, Local::now().hour())
}

/// Meal slot for an hour of the day: `[5,10)` breakfast, `[10,18)` lunch, dinner otherwise
pub fn hour_to_slot(hour: u32) -> Slot {
    match hour {
        5..=9 => Slot::Breakfast,
        10..=17 => Slot::Lunch,
        _ => Slot::Dinner,
    }
}
