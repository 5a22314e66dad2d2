//! Track geometry and lane collision tests
//!
//! Collision is one-dimensional: a falling letter hits the player when it is
//! in the player's lane and inside a vertical window around the player.

use crate::consts::{
    COLLISION_WINDOW_BELOW, DEFAULT_TRACK_HEIGHT, PLAYER_OFFSET_FROM_BOTTOM, RETIRE_MARGIN,
};

use super::falling::FallingObject;

/// Vertical extent of the track, in track pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    height: f32,
}

impl Default for TrackGeometry {
    fn default() -> Self {
        Self {
            height: DEFAULT_TRACK_HEIGHT,
        }
    }
}

impl TrackGeometry {
    pub fn new(height: f32) -> Self {
        let mut track = Self::default();
        track.update(height);
        track
    }

    /// Take a new measurement; unusable values keep the last known height
    pub fn update(&mut self, measured: f32) -> bool {
        if measured.is_finite() && measured > 0.0 {
            self.height = measured;
            true
        } else {
            log::debug!("Ignoring track height {measured}, keeping {}", self.height);
            false
        }
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Vertical centre of the player sprite
    pub fn player_y(&self) -> f32 {
        self.height - PLAYER_OFFSET_FROM_BOTTOM
    }

    pub fn midpoint(&self) -> f32 {
        self.height / 2.0
    }

    /// Objects below this line are off screen
    pub fn retire_line(&self) -> f32 {
        self.height + RETIRE_MARGIN
    }
}

/// Vertical band in which a letter can be caught
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionWindow {
    pub top: f32,
    pub bottom: f32,
}

impl CollisionWindow {
    /// `[player_y - threshold, player_y + 30]`
    pub fn new(player_y: f32, threshold: f32) -> Self {
        Self {
            top: player_y - threshold,
            bottom: player_y + COLLISION_WINDOW_BELOW,
        }
    }

    pub fn for_track(track: &TrackGeometry, threshold: f32) -> Self {
        Self::new(track.player_y(), threshold)
    }

    #[inline]
    pub fn contains(&self, y: f32) -> bool {
        y >= self.top && y <= self.bottom
    }
}

/// Whether `object` hits a player standing in `player_lane`.
///
/// Collected objects never hit again.
#[inline]
pub fn hits_player(object: &FallingObject, player_lane: usize, window: &CollisionWindow) -> bool {
    !object.collected && object.lane == player_lane && window.contains(object.y)
}
