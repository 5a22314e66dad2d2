//! Deterministic racing simulation
//!
//! All gameplay logic for the falling-letter race lives here. This module
//! must stay pure and deterministic:
//! - Seeded RNG only
//! - Session clock supplied by the host
//! - Stable iteration order (by object id)
//! - No rendering or platform dependencies

pub mod collision;
pub mod events;
pub mod falling;
pub mod lanes;
pub mod player;
pub mod rng;
pub mod session;
pub mod spawn;
pub mod timer;
pub mod word;

pub use collision::{CollisionWindow, TrackGeometry, hits_player};
pub use events::RaceEvent;
pub use falling::{FallingObject, FallingObjects, FrameOutcome, SpawnRequest};
pub use lanes::{LaneLayout, lane_count, lane_position};
pub use player::{Direction, PlayerController, PlayerState};
pub use rng::{GameRng, RandomSource};
pub use session::{RaceOptions, RacingSession, SessionError, SessionPhase};
pub use spawn::{SpawnPolicy, SpawnScheduler, random_distractor};
pub use timer::PeriodicTask;
pub use word::{LetterOutcome, WordPhase, WordProgress};
