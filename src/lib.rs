//! Spelling Racer - letter-spelling games for young children
//!
//! Core modules:
//! - `sim`: Deterministic falling-letter racing engine (spawns, motion, collisions)
//! - `hints`: Progressive hint levels shared by every game mode
//! - `grid`: Letter-grid mode (tap the letters of the word in order)
//! - `store`: Word/score/settings collaborators and an in-memory store
//! - `settings`: Persisted player preferences
//! - `platform`: Browser glue (localStorage, animation frame + spawn timer)

pub mod deck;
pub mod difficulty;
pub mod grid;
pub mod hints;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod store;

pub use difficulty::{ConfigError, Difficulty, DifficultyConfig, resolve};
pub use hints::{HintLevel, WordPresentation, WordPresentationMode};
pub use settings::Settings;
pub use store::{MemoryStore, ScoreSink, SettingsSource, StoreError, WordSource};

/// Game configuration constants
pub mod consts {
    /// Frame callback cadence used when the host does not supply vsync (60 Hz)
    pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

    /// Track height used until the renderer reports a measurement
    pub const DEFAULT_TRACK_HEIGHT: f32 = 300.0;
    /// Player sprite centre sits this far above the bottom of the track
    pub const PLAYER_OFFSET_FROM_BOTTOM: f32 = 55.0;
    /// Collision window extends this far below the player centre
    pub const COLLISION_WINDOW_BELOW: f32 = 30.0;

    /// Objects are created above the visible track
    pub const SPAWN_Y: f32 = -50.0;
    /// Objects are retired once this far past the bottom of the track
    pub const RETIRE_MARGIN: f32 = 50.0;
    /// Random speed added on top of the tier's base speed, in [0, SPEED_JITTER)
    pub const SPEED_JITTER: f32 = 0.3;

    /// Feedback delay before a collected correct letter disappears
    pub const CORRECT_REMOVAL_DELAY_MS: f64 = 200.0;
    /// Feedback delay before a collected wrong letter disappears (shake)
    pub const WRONG_REMOVAL_DELAY_MS: f64 = 300.0;

    /// Points awarded per completed word
    pub const POINTS_PER_WORD: u32 = 1;

    /// Distractor alphabet
    pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";
    /// Masking symbol for hidden letters
    pub const MASK_CHAR: char = '?';
}

/// Normalize a raw word for play: trimmed and lowercased, `None` when blank
#[inline]
pub fn normalize_word(raw: &str) -> Option<String> {
    let word = raw.trim().to_lowercase();
    if word.is_empty() { None } else { Some(word) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("  Cat "), Some("cat".to_string()));
        assert_eq!(normalize_word("DOG"), Some("dog".to_string()));
        assert_eq!(normalize_word("   "), None);
        assert_eq!(normalize_word(""), None);
    }
}
