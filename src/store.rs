//! Collaborator interfaces for words, scores and settings
//!
//! Storage engines live outside the game core. The core reads words and
//! attempt counts, records attempts when a word is finished and adds score.
//! Writes may fail; callers treat failures as non-fatal.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::hints::WordPresentationMode;
use crate::normalize_word;
use crate::sim::SpawnPolicy;

/// Source of the parent-curated word list and per-word attempt history
pub trait WordSource {
    /// Ordered word list (may contain mixed case; the core lowercases)
    fn words(&self) -> Vec<String>;
    /// Number of recorded attempts for `word` (0 when unknown)
    fn word_attempts(&self, word: &str) -> u32;
    /// Record a finished attempt. Counts only ever go up.
    fn record_word_attempt(&mut self, word: &str, success: bool) -> Result<(), StoreError>;
}

/// Running star total
pub trait ScoreSink {
    fn score(&self) -> u32;
    /// Add points and return the new total
    fn add_score(&mut self, points: u32) -> Result<u32, StoreError>;
}

/// Player preferences the core needs at session start
pub trait SettingsSource {
    fn difficulty(&self) -> Difficulty;
    fn word_presentation(&self) -> WordPresentationMode;
    fn spawn_policy(&self) -> SpawnPolicy {
        SpawnPolicy::default()
    }
}

/// Persistence failures (never fatal to gameplay)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// Backing storage could not be reached
    Unavailable,
    /// Data could not be encoded
    Serialize(String),
    /// Backing storage rejected the write (quota, private mode, ...)
    Write { key: String, reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::Serialize(reason) => write!(f, "failed to encode stored data: {reason}"),
            Self::Write { key, reason } => write!(f, "failed to write {key}: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Per-word attempt counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub count: u32,
    #[serde(default)]
    pub successes: u32,
}

impl AttemptRecord {
    pub fn record(&mut self, success: bool) {
        self.count = self.count.saturating_add(1);
        if success {
            self.successes = self.successes.saturating_add(1);
        }
    }
}

/// Writes that failed and get retried on the next word completion.
///
/// Gameplay never waits on these; the session's own score stays
/// authoritative until the store catches up.
#[derive(Debug, Clone, Default)]
pub struct PendingWrites {
    attempts: Vec<(String, bool)>,
    points: u32,
}

impl PendingWrites {
    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty() && self.points == 0
    }

    pub fn pending_attempts(&self) -> usize {
        self.attempts.len()
    }

    pub fn unsynced_points(&self) -> u32 {
        self.points
    }

    /// Record a successful attempt for `word` and add `points`.
    ///
    /// Earlier failed writes are retried first. Returns the score to show:
    /// the store's total, or `shown_score + points` if the store is failing.
    pub fn commit_word<S>(&mut self, store: &mut S, word: &str, points: u32, shown_score: u32) -> u32
    where
        S: WordSource + ScoreSink + ?Sized,
    {
        let mut still_pending = Vec::new();
        let queued = std::mem::take(&mut self.attempts);
        for (pending_word, success) in queued.into_iter().chain(std::iter::once((word.to_string(), true))) {
            if let Err(err) = store.record_word_attempt(&pending_word, success) {
                log::warn!("Attempt for {pending_word:?} not saved ({err}), will retry");
                still_pending.push((pending_word, success));
            }
        }
        self.attempts = still_pending;

        let owed = self.points.saturating_add(points);
        match store.add_score(owed) {
            Ok(total) => {
                self.points = 0;
                total
            }
            Err(err) => {
                log::warn!("Score not saved ({err}), keeping {owed} point(s) in memory");
                self.points = owed;
                shown_score.saturating_add(points)
            }
        }
    }
}

/// In-memory word list, attempt history and score
///
/// Used natively and in tests. `fail_writes` makes every write fail, for
/// exercising the non-fatal persistence paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    words: Vec<String>,
    attempts: HashMap<String, AttemptRecord>,
    score: u32,
    #[serde(skip)]
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `words` (normalized, duplicates dropped)
    pub fn with_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::new();
        for word in words {
            store.add_word(word.as_ref());
        }
        store
    }

    /// Add a word; returns false if blank or already present
    pub fn add_word(&mut self, word: &str) -> bool {
        match normalize_word(word) {
            Some(clean) if !self.words.contains(&clean) => {
                self.words.push(clean);
                true
            }
            _ => false,
        }
    }

    /// Remove a word; returns false if it was not present
    pub fn remove_word(&mut self, word: &str) -> bool {
        let Some(clean) = normalize_word(word) else {
            return false;
        };
        match self.words.iter().position(|w| *w == clean) {
            Some(index) => {
                self.words.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear_words(&mut self) {
        self.words.clear();
    }

    pub fn set_attempts(&mut self, word: &str, count: u32) {
        self.attempts.entry(word.to_lowercase()).or_default().count = count;
    }

    pub fn attempt_record(&self, word: &str) -> AttemptRecord {
        self.attempts
            .get(&word.to_lowercase())
            .copied()
            .unwrap_or_default()
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
    }

    /// Make every subsequent write fail (or succeed again)
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl WordSource for MemoryStore {
    fn words(&self) -> Vec<String> {
        self.words.clone()
    }

    fn word_attempts(&self, word: &str) -> u32 {
        self.attempt_record(word).count
    }

    fn record_word_attempt(&mut self, word: &str, success: bool) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable);
        }
        self.attempts
            .entry(word.to_lowercase())
            .or_default()
            .record(success);
        Ok(())
    }
}

impl ScoreSink for MemoryStore {
    fn score(&self) -> u32 {
        self.score
    }

    fn add_score(&mut self, points: u32) -> Result<u32, StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable);
        }
        self.score = self.score.saturating_add(points);
        Ok(self.score)
    }
}
