//! localStorage-backed word list, attempt history and score

use web_sys::Storage;

use super::{ATTEMPTS_KEY, SCORE_KEY, WORDS_KEY, decode_attempts, decode_score, decode_words};
use crate::store::{ScoreSink, StoreError, WordSource};

pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// Open the window's localStorage (fails in private modes that disable it)
    pub fn open() -> Result<Self, StoreError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)?;
        Ok(Self { storage })
    }

    fn read(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, value).map_err(|err| StoreError::Write {
            key: key.to_string(),
            reason: format!("{err:?}"),
        })
    }

    /// Replace the word list (parent screen)
    pub fn save_words(&self, words: &[String]) -> Result<(), StoreError> {
        let json = serde_json::to_string(words).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.write(WORDS_KEY, &json)
    }
}

impl WordSource for LocalStorageStore {
    fn words(&self) -> Vec<String> {
        decode_words(self.read(WORDS_KEY).as_deref())
    }

    fn word_attempts(&self, word: &str) -> u32 {
        decode_attempts(self.read(ATTEMPTS_KEY).as_deref())
            .get(&word.to_lowercase())
            .map_or(0, |r| r.count)
    }

    fn record_word_attempt(&mut self, word: &str, success: bool) -> Result<(), StoreError> {
        let mut attempts = decode_attempts(self.read(ATTEMPTS_KEY).as_deref());
        attempts.entry(word.to_lowercase()).or_default().record(success);
        let json =
            serde_json::to_string(&attempts).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.write(ATTEMPTS_KEY, &json)
    }
}

impl ScoreSink for LocalStorageStore {
    fn score(&self) -> u32 {
        decode_score(self.read(SCORE_KEY).as_deref())
    }

    fn add_score(&mut self, points: u32) -> Result<u32, StoreError> {
        let total = self.score().saturating_add(points);
        self.write(SCORE_KEY, &total.to_string())?;
        Ok(total)
    }
}
