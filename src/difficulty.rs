//! Difficulty tiers and their tuning constants
//!
//! Racing and letter-grid modes both read their knobs from here so a tier
//! change affects every mode the same way.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Difficulty tier chosen by the parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Tunable constants for one tier (racing mode)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Spawn timer cadence
    pub spawn_interval_ms: u32,
    /// Base fall speed in track pixels per frame
    pub base_speed: f32,
    pub min_distractors: usize,
    pub max_distractors: usize,
    /// How far above the player a letter may be caught
    pub collision_threshold: f32,
    pub lane_count: usize,
}

const EASY: DifficultyConfig = DifficultyConfig {
    spawn_interval_ms: 3000,
    base_speed: 0.5,
    min_distractors: 0,
    max_distractors: 1,
    collision_threshold: 70.0,
    lane_count: 3,
};

const MEDIUM: DifficultyConfig = DifficultyConfig {
    spawn_interval_ms: 2000,
    base_speed: 0.8,
    min_distractors: 1,
    max_distractors: 2,
    collision_threshold: 60.0,
    lane_count: 3,
};

// Four lanes so a correct letter plus three distractors always fit.
const HARD: DifficultyConfig = DifficultyConfig {
    spawn_interval_ms: 1500,
    base_speed: 1.2,
    min_distractors: 2,
    max_distractors: 3,
    collision_threshold: 50.0,
    lane_count: 4,
};

/// Resolve a tier to its constants
pub fn resolve(tier: Difficulty) -> DifficultyConfig {
    tier.config()
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn config(&self) -> DifficultyConfig {
        let config = match self {
            Difficulty::Easy => EASY,
            Difficulty::Medium => MEDIUM,
            Difficulty::Hard => HARD,
        };
        debug_assert!(config.min_distractors <= config.max_distractors);
        debug_assert!(config.lane_count >= 2);
        config
    }

    /// Number of extra letter buttons in the letter-grid mode
    pub fn grid_distractors(&self) -> RangeInclusive<usize> {
        match self {
            Difficulty::Easy => 2..=4,
            Difficulty::Medium => 4..=8,
            Difficulty::Hard => 6..=12,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "med" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

impl DifficultyConfig {
    /// Distractor count bounds as a range
    pub fn distractor_range(&self) -> RangeInclusive<usize> {
        self.min_distractors..=self.max_distractors
    }
}

/// Unrecognized configuration names; a programming or data error, never defaulted
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    UnknownDifficulty(String),
    UnknownPresentationMode(String),
    UnknownSpawnPolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDifficulty(name) => write!(f, "unknown difficulty tier: {name:?}"),
            Self::UnknownPresentationMode(name) => {
                write!(f, "unknown word presentation mode: {name:?}")
            }
            Self::UnknownSpawnPolicy(name) => write!(f, "unknown spawn policy: {name:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}
