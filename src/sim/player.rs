//! Player lane control

use serde::{Deserialize, Serialize};

use super::lanes::LaneLayout;

/// Horizontal direction of a single lane step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn delta(&self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    /// Map a signed step (-1/+1) to a direction; zero is no direction
    pub fn from_step(step: i32) -> Option<Self> {
        match step.signum() {
            -1 => Some(Direction::Left),
            1 => Some(Direction::Right),
            _ => None,
        }
    }
}

/// The player's lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub lane: usize,
}

/// Bounds-checked lane movement
#[derive(Debug, Clone)]
pub struct PlayerController {
    state: PlayerState,
    layout: LaneLayout,
}

impl PlayerController {
    /// Player centred on `layout`
    pub fn new(layout: LaneLayout) -> Self {
        Self {
            state: PlayerState {
                lane: layout.center_lane(),
            },
            layout,
        }
    }

    pub fn lane(&self) -> usize {
        self.state.lane
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Step one lane; returns whether the lane changed (no-op at the edges)
    pub fn move_by(&mut self, direction: Direction) -> bool {
        let target = self.state.lane as i64 + direction.delta();
        self.set_lane_clamped(target)
    }

    /// Jump to a lane (tap input); out-of-range targets are clamped
    pub fn set_lane(&mut self, target: i64) -> bool {
        self.set_lane_clamped(target)
    }

    /// Adopt a new layout (difficulty change) and recentre
    pub fn reset(&mut self, layout: LaneLayout) {
        self.layout = layout;
        self.state.lane = layout.center_lane();
    }

    fn set_lane_clamped(&mut self, target: i64) -> bool {
        let lane = self.layout.clamp(target);
        let changed = lane != self.state.lane;
        self.state.lane = lane;
        changed
    }
}
