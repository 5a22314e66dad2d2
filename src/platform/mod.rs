//! Platform layer
//!
//! Browser-only pieces live in the wasm32 submodules:
//! - `storage`: word list, attempts and score in localStorage
//! - `web`: requestAnimationFrame / setInterval driver for a racing session
//!
//! The stored formats are decoded here so they can be tested natively.

use std::collections::HashMap;

use crate::normalize_word;
use crate::store::AttemptRecord;

#[cfg(target_arch = "wasm32")]
pub mod storage;
#[cfg(target_arch = "wasm32")]
pub mod web;

/// JSON array of words
pub const WORDS_KEY: &str = "spelling_app_words";
/// Plain decimal score
pub const SCORE_KEY: &str = "spelling_app_score";
/// JSON object of word -> attempt record
pub const ATTEMPTS_KEY: &str = "spelling_app_attempts";

/// Stored word list; corrupt or missing data reads as empty
pub fn decode_words(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(words) => {
            let mut clean: Vec<String> = Vec::with_capacity(words.len());
            for word in words.iter().filter_map(|w| normalize_word(w)) {
                if !clean.contains(&word) {
                    clean.push(word);
                }
            }
            clean
        }
        Err(err) => {
            log::warn!("Stored word list unreadable ({err}), treating as empty");
            Vec::new()
        }
    }
}

/// Stored score; anything unparsable reads as 0
pub fn decode_score(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

/// Stored attempt history; corrupt data reads as empty
pub fn decode_attempts(raw: Option<&str>) -> HashMap<String, AttemptRecord> {
    raw.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}
