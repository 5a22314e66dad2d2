//! Progressive hint levels
//!
//! The more often a child has played a word, the less of it is shown:
//! first the whole word, then only its first letter, then nothing but audio.
//! Racing and letter-grid modes both go through these functions so the
//! thresholds never drift apart between modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::MASK_CHAR;
use crate::difficulty::ConfigError;
use crate::store::WordSource;

/// Amount of scaffolding shown for a word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HintLevel {
    /// Whole word visible
    Full,
    /// First letter visible, the rest masked
    Partial,
    /// Word fully masked, spoken only
    AudioOnly,
}

/// How the parent wants words presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WordPresentationMode {
    #[default]
    Both,
    Visual,
    Audio,
}

impl WordPresentationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WordPresentationMode::Both => "both",
            WordPresentationMode::Visual => "visual",
            WordPresentationMode::Audio => "audio",
        }
    }
}

impl FromStr for WordPresentationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "both" => Ok(WordPresentationMode::Both),
            "visual" => Ok(WordPresentationMode::Visual),
            "audio" => Ok(WordPresentationMode::Audio),
            _ => Err(ConfigError::UnknownPresentationMode(s.to_string())),
        }
    }
}

impl fmt::Display for WordPresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hint level for a given number of prior attempts
pub fn hint_for_attempts(attempts: u32) -> HintLevel {
    match attempts {
        0 => HintLevel::Full,
        1 => HintLevel::Partial,
        _ => HintLevel::AudioOnly,
    }
}

/// Hint level for `word` based on its recorded attempts
pub fn hint_level(word: &str, source: &dyn WordSource) -> HintLevel {
    hint_for_attempts(source.word_attempts(word))
}

/// First letter followed by masks (`cat` -> `c??`); one-letter words unchanged
pub fn partial_hint(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.count();
            let mut hint = String::with_capacity(word.len());
            hint.push(first);
            hint.extend(std::iter::repeat_n(MASK_CHAR, rest));
            hint
        }
        None => String::new(),
    }
}

/// Every letter masked
pub fn masked(word: &str) -> String {
    std::iter::repeat_n(MASK_CHAR, word.chars().count()).collect()
}

/// What the presentation layer should show and say for the active word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPresentation {
    pub hint: HintLevel,
    /// Target text to display
    pub display: String,
    /// Text is fully hidden (style as audio-only)
    pub audio_only: bool,
    /// Word should be spoken when loaded (and the replay button shown)
    pub speak: bool,
}

impl WordPresentation {
    /// Combine the hint level with the parent's presentation mode.
    ///
    /// An explicit `Audio` mode always masks, whatever the hint level says.
    pub fn compose(word: &str, hint: HintLevel, mode: WordPresentationMode) -> Self {
        let display = if mode == WordPresentationMode::Audio {
            masked(word)
        } else {
            match hint {
                HintLevel::Full => word.to_string(),
                HintLevel::Partial => partial_hint(word),
                HintLevel::AudioOnly => masked(word),
            }
        };
        let audio_only = mode == WordPresentationMode::Audio || hint == HintLevel::AudioOnly;
        let speak = matches!(mode, WordPresentationMode::Audio | WordPresentationMode::Both)
            || matches!(hint, HintLevel::Partial | HintLevel::AudioOnly);

        Self {
            hint,
            display,
            audio_only,
            speak,
        }
    }

    /// Look up the hint level in `source` and compose
    pub fn for_word(word: &str, source: &dyn WordSource, mode: WordPresentationMode) -> Self {
        Self::compose(word, hint_level(word, source), mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_attempt_thresholds() {
        assert_eq!(hint_for_attempts(0), HintLevel::Full);
        assert_eq!(hint_for_attempts(1), HintLevel::Partial);
        assert_eq!(hint_for_attempts(2), HintLevel::AudioOnly);
        assert_eq!(hint_for_attempts(40), HintLevel::AudioOnly);
    }

    #[test]
    fn test_hint_level_reads_store() {
        let mut store = MemoryStore::new();
        assert_eq!(hint_level("cat", &store), HintLevel::Full);
        store.set_attempts("cat", 1);
        assert_eq!(hint_level("cat", &store), HintLevel::Partial);
        store.set_attempts("cat", 2);
        assert_eq!(hint_level("cat", &store), HintLevel::AudioOnly);
        // Other words unaffected
        assert_eq!(hint_level("dog", &store), HintLevel::Full);
    }

    #[test]
    fn test_partial_hint() {
        assert_eq!(partial_hint("cat"), "c??");
        assert_eq!(partial_hint("a"), "a");
        assert_eq!(partial_hint(""), "");
        assert_eq!(partial_hint("über"), "ü???");
    }

    #[test]
    fn test_masked() {
        assert_eq!(masked("cat"), "???");
        assert_eq!(masked(""), "");
    }

    #[test]
    fn test_compose_visual_follows_hint() {
        let mode = WordPresentationMode::Visual;
        let full = WordPresentation::compose("cat", HintLevel::Full, mode);
        assert_eq!(full.display, "cat");
        assert!(!full.audio_only);
        assert!(!full.speak);

        let partial = WordPresentation::compose("cat", HintLevel::Partial, mode);
        assert_eq!(partial.display, "c??");
        assert!(partial.speak);

        let audio = WordPresentation::compose("cat", HintLevel::AudioOnly, mode);
        assert_eq!(audio.display, "???");
        assert!(audio.audio_only);
        assert!(audio.speak);
    }

    #[test]
    fn test_compose_audio_mode_always_masks() {
        let p = WordPresentation::compose("cat", HintLevel::Full, WordPresentationMode::Audio);
        assert_eq!(p.display, "???");
        assert!(p.audio_only);
        assert!(p.speak);
    }

    #[test]
    fn test_compose_both_speaks() {
        let p = WordPresentation::compose("cat", HintLevel::Full, WordPresentationMode::Both);
        assert_eq!(p.display, "cat");
        assert!(p.speak);
    }

    #[test]
    fn test_presentation_mode_parse() {
        assert_eq!("Visual".parse(), Ok(WordPresentationMode::Visual));
        assert!("loud".parse::<WordPresentationMode>().is_err());
    }
}
