//! Lane layout
//!
//! Lanes are evenly spaced across the track. Positions are fractions of the
//! track width, measured at each lane's centre.

use serde::{Deserialize, Serialize};

use crate::difficulty::DifficultyConfig;

/// Horizontal centre of `lane_index` as a fraction of track width in (0, 1)
#[inline]
pub fn lane_position(lane_index: usize, lane_count: usize) -> f32 {
    let count = lane_count.max(1) as f32;
    1.0 / (2.0 * count) + lane_index as f32 / count
}

/// Lane count for a difficulty
#[inline]
pub fn lane_count(config: &DifficultyConfig) -> usize {
    config.lane_count
}

/// Track layout for the active difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneLayout {
    lane_count: usize,
}

impl LaneLayout {
    pub fn new(lane_count: usize) -> Self {
        debug_assert!(lane_count >= 2, "a track needs at least two lanes");
        Self {
            lane_count: lane_count.max(2),
        }
    }

    pub fn for_config(config: &DifficultyConfig) -> Self {
        Self::new(lane_count(config))
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    /// Centre of a lane as a fraction of track width
    pub fn position(&self, lane: usize) -> f32 {
        lane_position(lane, self.lane_count)
    }

    /// All lane centres, left to right
    pub fn positions(&self) -> Vec<f32> {
        (0..self.lane_count).map(|lane| self.position(lane)).collect()
    }

    /// Starting lane for the player
    pub fn center_lane(&self) -> usize {
        self.lane_count / 2
    }

    /// Clamp a (possibly out of range) lane into the track
    pub fn clamp(&self, lane: i64) -> usize {
        lane.clamp(0, self.lane_count as i64 - 1) as usize
    }

    pub fn contains(&self, lane: usize) -> bool {
        lane < self.lane_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::{Difficulty, resolve};

    #[test]
    fn test_three_lanes() {
        let layout = LaneLayout::new(3);
        let positions = layout.positions();
        assert!((positions[0] - 1.0 / 6.0).abs() < 1e-6);
        assert!((positions[1] - 0.5).abs() < 1e-6);
        assert!((positions[2] - 5.0 / 6.0).abs() < 1e-6);
        assert_eq!(layout.center_lane(), 1);
    }

    #[test]
    fn test_positions_increase_and_are_symmetric() {
        for tier in Difficulty::ALL {
            let layout = LaneLayout::for_config(&resolve(tier));
            let positions = layout.positions();
            assert!(positions.len() >= 2);
            for pair in positions.windows(2) {
                assert!(pair[0] < pair[1]);
            }
            let n = positions.len();
            for i in 0..n {
                let mirrored = positions[n - 1 - i];
                assert!((positions[i] + mirrored - 1.0).abs() < 1e-6, "{tier} lane {i}");
                assert!(positions[i] > 0.0 && positions[i] < 1.0);
            }
        }
    }

    #[test]
    fn test_clamp() {
        let layout = LaneLayout::new(4);
        assert_eq!(layout.clamp(-3), 0);
        assert_eq!(layout.clamp(2), 2);
        assert_eq!(layout.clamp(9), 3);
        assert_eq!(layout.center_lane(), 2);
    }
}
