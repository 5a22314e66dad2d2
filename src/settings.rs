//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web, defaults natively.

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::hints::WordPresentationMode;
use crate::sim::SpawnPolicy;
use crate::store::SettingsSource;

/// Player/parent preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Difficulty tier for every game mode
    pub difficulty: Difficulty,
    /// How words are presented (on top of the hint level)
    pub word_presentation: WordPresentationMode,
    /// Racing spawn pacing
    pub spawn_policy: SpawnPolicy,

    // === Audio ===
    /// Sound effects on/off
    pub sounds_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            word_presentation: WordPresentationMode::Both,
            spawn_policy: SpawnPolicy::SingleObject,
            sounds_enabled: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "spelling_app_settings";

    /// Parse stored JSON, filling gaps with defaults.
    ///
    /// Unknown enum names are a data error; the caller decides whether to
    /// fall back, this never guesses a tier.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(err) => log::warn!("Stored settings unreadable ({err}), using defaults"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Settings could not be saved");
                } else {
                    log::info!("Settings saved");
                }
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

impl SettingsSource for Settings {
    fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn word_presentation(&self) -> WordPresentationMode {
        self.word_presentation
    }

    fn spawn_policy(&self) -> SpawnPolicy {
        self.spawn_policy
    }
}
