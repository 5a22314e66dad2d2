//! Events emitted to the presentation layer
//!
//! The engine never touches the DOM. Renderers drain these after each
//! frame/spawn and update sprites, sounds and speech accordingly.

use serde::Serialize;

use crate::hints::WordPresentation;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RaceEvent {
    /// A new word is active; the track is empty and the player centred
    WordLoaded {
        word: String,
        presentation: WordPresentation,
        lane_count: usize,
        lane_positions: Vec<f32>,
    },
    /// Lane count changed mid-session (difficulty change)
    LayoutChanged {
        lane_count: usize,
        lane_positions: Vec<f32>,
    },
    ObjectSpawned {
        id: u32,
        letter: char,
        lane: usize,
        y: f32,
        correct: bool,
    },
    ObjectMoved {
        id: u32,
        y: f32,
    },
    ObjectCollected {
        id: u32,
        correct: bool,
    },
    /// Object left the track; `missed` when an uncaught correct letter fell off
    ObjectRetired {
        id: u32,
        missed: bool,
    },
    /// Slot `index` of the word is now filled with `letter`
    LetterAdvanced {
        index: usize,
        letter: char,
    },
    WrongLetter {
        id: u32,
        letter: char,
    },
    WordComplete {
        word: String,
        score: u32,
        /// Last word before the list reshuffles ("Play Again")
        last_in_list: bool,
    },
    PlayerMoved {
        lane: usize,
    },
    SessionStopped,
}

impl RaceEvent {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            RaceEvent::WordLoaded { .. } => "wordLoaded",
            RaceEvent::LayoutChanged { .. } => "layoutChanged",
            RaceEvent::ObjectSpawned { .. } => "objectSpawned",
            RaceEvent::ObjectMoved { .. } => "objectMoved",
            RaceEvent::ObjectCollected { .. } => "objectCollected",
            RaceEvent::ObjectRetired { .. } => "objectRetired",
            RaceEvent::LetterAdvanced { .. } => "letterAdvanced",
            RaceEvent::WrongLetter { .. } => "wrongLetter",
            RaceEvent::WordComplete { .. } => "wordComplete",
            RaceEvent::PlayerMoved { .. } => "playerMoved",
            RaceEvent::SessionStopped => "sessionStopped",
        }
    }
}
