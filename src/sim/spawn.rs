//! Spawn scheduling
//!
//! Decides, on each spawn tick, which letters enter the track and where.
//! A session sticks to one policy for its whole lifetime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::collision::TrackGeometry;
use super::falling::{FallingObjects, SpawnRequest};
use super::lanes::LaneLayout;
use super::rng::RandomSource;
use crate::consts::{ALPHABET, SPEED_JITTER};
use crate::difficulty::{ConfigError, DifficultyConfig};

/// How letters are paced onto the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SpawnPolicy {
    /// Each tick drops the correct letter plus a burst of distractors in
    /// distinct lanes, unless a correct letter is still in the top half
    MultiObject,
    /// Each tick drops a single letter; the correct letter only follows a
    /// distractor and never overlaps another correct letter
    #[default]
    SingleObject,
}

impl SpawnPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnPolicy::MultiObject => "multi",
            SpawnPolicy::SingleObject => "single",
        }
    }
}

impl fmt::Display for SpawnPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpawnPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multi" | "multiobject" | "multi-object" => Ok(SpawnPolicy::MultiObject),
            "single" | "singleobject" | "single-object" => Ok(SpawnPolicy::SingleObject),
            _ => Err(ConfigError::UnknownSpawnPolicy(s.to_string())),
        }
    }
}

/// Uniform letter from the alphabet other than `exclude` (reject and resample)
pub fn random_distractor<R: RandomSource>(exclude: char, rng: &mut R) -> char {
    let alphabet: Vec<char> = ALPHABET.chars().collect();
    loop {
        let letter = alphabet[rng.next_index(alphabet.len())];
        if letter != exclude {
            return letter;
        }
    }
}

/// Fall speed for a new object: base speed plus a little jitter
pub fn spawn_speed<R: RandomSource>(config: &DifficultyConfig, rng: &mut R) -> f32 {
    config.base_speed + rng.next_unit() * SPEED_JITTER
}

/// State the scheduler looks at on each tick
pub struct SpawnContext<'a> {
    pub expected: char,
    pub objects: &'a FallingObjects,
    pub layout: &'a LaneLayout,
    pub config: &'a DifficultyConfig,
    pub track: &'a TrackGeometry,
}

#[derive(Debug, Clone, Copy)]
pub struct SpawnScheduler {
    policy: SpawnPolicy,
}

impl SpawnScheduler {
    pub fn new(policy: SpawnPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SpawnPolicy {
        self.policy
    }

    /// Objects to create this tick (possibly none)
    pub fn plan<R: RandomSource>(&self, ctx: &SpawnContext<'_>, rng: &mut R) -> Vec<SpawnRequest> {
        match self.policy {
            SpawnPolicy::MultiObject => plan_multi(ctx, rng),
            SpawnPolicy::SingleObject => plan_single(ctx, rng),
        }
    }
}

fn plan_multi<R: RandomSource>(ctx: &SpawnContext<'_>, rng: &mut R) -> Vec<SpawnRequest> {
    // Don't flood the track while a correct letter is still high up
    if ctx.objects.has_pending_correct_above(ctx.track.midpoint()) {
        return Vec::new();
    }

    let mut lanes: Vec<usize> = (0..ctx.layout.lane_count()).collect();
    rng.shuffle(&mut lanes);

    let mut requests = Vec::with_capacity(lanes.len());
    requests.push(SpawnRequest {
        letter: ctx.expected,
        lane: lanes[0],
        speed: spawn_speed(ctx.config, rng),
        correct: true,
    });

    let distractors = rng.next_in_range(ctx.config.distractor_range());
    for &lane in lanes.iter().skip(1).take(distractors) {
        requests.push(SpawnRequest {
            letter: random_distractor(ctx.expected, rng),
            lane,
            speed: spawn_speed(ctx.config, rng),
            correct: false,
        });
    }
    requests
}

fn plan_single<R: RandomSource>(ctx: &SpawnContext<'_>, rng: &mut R) -> Vec<SpawnRequest> {
    let spawn_correct = ctx.objects.has_live_distractor() && !ctx.objects.has_live_correct();
    let letter = if spawn_correct {
        ctx.expected
    } else {
        random_distractor(ctx.expected, rng)
    };
    let lane = rng.next_index(ctx.layout.lane_count());
    vec![SpawnRequest {
        letter,
        lane,
        speed: spawn_speed(ctx.config, rng),
        correct: spawn_correct,
    }]
}
