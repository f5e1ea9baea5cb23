//! Book genres: a code plus display properties.

use serde_json::{json, Value};

const GENRES: &[(&str, &str)] = &[
    ("horror", "Horror"),
    ("fantasy", "Fantasy"),
    ("historicalFiction", "Historical Fiction"),
    ("scienceFiction", "Science Fiction"),
    ("nonFiction", "Non-fiction"),
    ("science", "Science"),
];

/// Genre object for a code; unknown codes keep the code and get no display name.
pub fn genre(code: &str) -> Value {
    match GENRES.iter().find(|(c, _)| *c == code) {
        Some((code, display)) => json!({ "code": code, "display": display }),
        None => json!({ "code": code }),
    }
}

pub fn all() -> Vec<Value> {
    GENRES.iter().map(|(code, _)| genre(code)).collect()
}

pub fn is_fiction(code: &str) -> bool {
    !matches!(code, "science" | "nonFiction")
}
