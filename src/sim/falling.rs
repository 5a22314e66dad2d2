//! Falling letter objects and the per-frame simulator
//!
//! Objects live in a `Vec` in spawn order. Ids are never reused within a
//! session, so iteration order is id order and frames are reproducible.

use serde::{Deserialize, Serialize};

use super::collision::{CollisionWindow, hits_player};
use super::events::RaceEvent;
use super::word::{LetterOutcome, WordProgress};
use crate::consts::{CORRECT_REMOVAL_DELAY_MS, SPAWN_Y, WRONG_REMOVAL_DELAY_MS};

/// A letter falling down one lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: u32,
    pub letter: char,
    pub lane: usize,
    /// Vertical position in track pixels (negative = above the track)
    pub y: f32,
    /// Pixels per frame
    pub speed: f32,
    /// Spawned as the expected letter
    pub is_correct_letter: bool,
    /// Already hit the player
    pub collected: bool,
    /// Removal time after the collect feedback animation
    pub remove_at_ms: Option<f64>,
}

/// A fully decided spawn, before it gets an id
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub letter: char,
    pub lane: usize,
    pub speed: f32,
    pub correct: bool,
}

/// Per-frame inputs for the simulator
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub now_ms: f64,
    pub player_lane: usize,
    pub window: CollisionWindow,
    /// Objects below this are off the track
    pub retire_y: f32,
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    pub collected: u32,
    pub retired: u32,
    pub missed: u32,
    /// The active word was finished this frame
    pub completed: bool,
}

/// Live objects of one session
#[derive(Debug, Clone)]
pub struct FallingObjects {
    objects: Vec<FallingObject>,
    next_id: u32,
}

impl Default for FallingObjects {
    fn default() -> Self {
        Self::new()
    }
}

impl FallingObjects {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
        }
    }

    fn next_object_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Build the object completely, then publish it
    pub fn spawn(&mut self, request: SpawnRequest) -> &FallingObject {
        let object = FallingObject {
            id: self.next_object_id(),
            letter: request.letter,
            lane: request.lane,
            y: SPAWN_Y,
            speed: request.speed,
            is_correct_letter: request.correct,
            collected: false,
            remove_at_ms: None,
        };
        let index = self.objects.len();
        self.objects.push(object);
        &self.objects[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &FallingObject> {
        self.objects.iter()
    }

    pub fn get(&self, id: u32) -> Option<&FallingObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Drop every live object (ids keep counting up)
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Remove objects matching `predicate`, returning their ids
    pub fn remove_where(&mut self, predicate: impl Fn(&FallingObject) -> bool) -> Vec<u32> {
        let removed = self
            .objects
            .iter()
            .filter(|o| predicate(o))
            .map(|o| o.id)
            .collect();
        self.objects.retain(|o| !predicate(o));
        removed
    }

    /// Any live object spawned as the expected letter
    pub fn has_live_correct(&self) -> bool {
        self.objects.iter().any(|o| o.is_correct_letter)
    }

    pub fn has_live_distractor(&self) -> bool {
        self.objects.iter().any(|o| !o.is_correct_letter)
    }

    pub fn live_correct_count(&self) -> usize {
        self.objects.iter().filter(|o| o.is_correct_letter).count()
    }

    /// Uncollected correct letter still above `y`
    pub fn has_pending_correct_above(&self, y: f32) -> bool {
        self.objects
            .iter()
            .any(|o| o.is_correct_letter && !o.collected && o.y < y)
    }

    /// Advance every object by one frame.
    ///
    /// Order per object: expire after feedback delay, drop if stale, move,
    /// collide, fall off. Once the word completes, later objects still move
    /// this frame but can no longer be collected.
    ///
    /// An uncollected object is stale when its correct flag disagrees with
    /// the letter expected now: a distractor that matches the next letter, or
    /// a correct letter the word has moved past. Stale objects are retired
    /// (never missed) so a distractor is never collected as correct.
    pub fn step(
        &mut self,
        ctx: &FrameContext,
        progress: &mut WordProgress,
        events: &mut Vec<RaceEvent>,
    ) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();
        let mut retired: Vec<u32> = Vec::new();
        let mut expected = progress.expected_letter();
        let mut advanced = false;

        for object in self.objects.iter_mut() {
            if object.remove_at_ms.is_some_and(|at| ctx.now_ms >= at) {
                retired.push(object.id);
                outcome.retired += 1;
                events.push(RaceEvent::ObjectRetired {
                    id: object.id,
                    missed: false,
                });
                continue;
            }

            if !outcome.completed && is_stale(object, expected) {
                log::debug!("Dropping stale letter {:?} (#{})", object.letter, object.id);
                retired.push(object.id);
                outcome.retired += 1;
                events.push(RaceEvent::ObjectRetired {
                    id: object.id,
                    missed: false,
                });
                continue;
            }

            object.y += object.speed;
            events.push(RaceEvent::ObjectMoved {
                id: object.id,
                y: object.y,
            });

            if !outcome.completed && hits_player(object, ctx.player_lane, &ctx.window) {
                object.collected = true;
                outcome.collected += 1;

                let result = progress.accept(object.letter);
                let correct = result.is_correct();
                events.push(RaceEvent::ObjectCollected {
                    id: object.id,
                    correct,
                });
                match result {
                    LetterOutcome::Advanced { index, letter } => {
                        log::debug!("Letter {letter:?} collected (slot {index})");
                        events.push(RaceEvent::LetterAdvanced { index, letter });
                        expected = progress.expected_letter();
                        advanced = true;
                    }
                    LetterOutcome::Completed { index, letter } => {
                        log::debug!("Letter {letter:?} collected (slot {index}), word done");
                        events.push(RaceEvent::LetterAdvanced { index, letter });
                        outcome.completed = true;
                    }
                    LetterOutcome::Wrong { letter } => {
                        log::debug!("Wrong letter {letter:?} hit");
                        events.push(RaceEvent::WrongLetter {
                            id: object.id,
                            letter,
                        });
                    }
                    LetterOutcome::Ignored => {}
                }

                let delay = if correct {
                    CORRECT_REMOVAL_DELAY_MS
                } else {
                    WRONG_REMOVAL_DELAY_MS
                };
                object.remove_at_ms = Some(ctx.now_ms + delay);
            }

            if object.y > ctx.retire_y {
                let missed = object.is_correct_letter && !object.collected;
                if missed {
                    outcome.missed += 1;
                    log::debug!("Missed letter {:?}", object.letter);
                }
                retired.push(object.id);
                outcome.retired += 1;
                events.push(RaceEvent::ObjectRetired {
                    id: object.id,
                    missed,
                });
            }
        }

        // Objects visited before the word moved on this frame
        if advanced && !outcome.completed {
            for object in &self.objects {
                if !retired.contains(&object.id) && is_stale(object, expected) {
                    retired.push(object.id);
                    outcome.retired += 1;
                    events.push(RaceEvent::ObjectRetired {
                        id: object.id,
                        missed: false,
                    });
                }
            }
        }

        if !retired.is_empty() {
            self.objects.retain(|o| !retired.contains(&o.id));
        }
        outcome
    }
}

/// Uncollected object whose correct flag no longer matches `expected`
fn is_stale(object: &FallingObject, expected: Option<char>) -> bool {
    match expected {
        Some(letter) => !object.collected && object.is_correct_letter != (object.letter == letter),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::TrackGeometry;

    fn request(letter: char, lane: usize, correct: bool) -> SpawnRequest {
        SpawnRequest {
            letter,
            lane,
            speed: 10.0,
            correct,
        }
    }

    fn ctx(now_ms: f64, player_lane: usize) -> FrameContext {
        let track = TrackGeometry::default();
        FrameContext {
            now_ms,
            player_lane,
            window: CollisionWindow::for_track(&track, 60.0),
            retire_y: track.retire_line(),
        }
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut objects = FallingObjects::new();
        let a = objects.spawn(request('c', 0, true)).id;
        let b = objects.spawn(request('x', 1, false)).id;
        objects.clear();
        let c = objects.spawn(request('y', 2, false)).id;
        assert!(a < b && b < c);
        assert_eq!(objects.get(c).unwrap().y, SPAWN_Y);
    }

    #[test]
    fn test_collect_correct_letter_once() {
        let mut objects = FallingObjects::new();
        let mut progress = WordProgress::new("cat");
        let mut events = Vec::new();
        let id = objects.spawn(request('c', 1, true)).id;

        let mut collected = 0;
        let mut now = 0.0;
        for _ in 0..40 {
            now += 16.0;
            collected += objects.step(&ctx(now, 1), &mut progress, &mut events).collected;
        }
        assert_eq!(collected, 1);
        assert_eq!(progress.expected_index(), 1);
        assert!(events.contains(&RaceEvent::ObjectCollected { id, correct: true }));
        assert!(events.contains(&RaceEvent::LetterAdvanced { index: 0, letter: 'c' }));
        // Gone after the feedback delay
        assert!(objects.get(id).is_none());
        assert!(events.contains(&RaceEvent::ObjectRetired { id, missed: false }));
    }

    #[test]
    fn test_wrong_lane_is_missed() {
        let mut objects = FallingObjects::new();
        let mut progress = WordProgress::new("cat");
        let mut events = Vec::new();
        let id = objects.spawn(request('c', 0, true)).id;

        let mut outcome = FrameOutcome::default();
        for frame in 0..60 {
            let step = objects.step(&ctx(frame as f64 * 16.0, 2), &mut progress, &mut events);
            outcome.missed += step.missed;
        }
        assert_eq!(outcome.missed, 1);
        assert!(objects.is_empty());
        assert!(events.contains(&RaceEvent::ObjectRetired { id, missed: true }));
        assert_eq!(progress.expected_index(), 0);
    }

    #[test]
    fn test_wrong_letter_signals_without_advancing() {
        let mut objects = FallingObjects::new();
        let mut progress = WordProgress::new("cat");
        let mut events = Vec::new();
        let id = objects.spawn(request('z', 1, false)).id;

        for frame in 0..40 {
            objects.step(&ctx(frame as f64 * 16.0, 1), &mut progress, &mut events);
        }
        assert!(events.contains(&RaceEvent::WrongLetter { id, letter: 'z' }));
        assert!(events.contains(&RaceEvent::ObjectCollected { id, correct: false }));
        assert_eq!(progress.expected_index(), 0);
    }

    #[test]
    fn test_completion_blocks_further_collects_this_frame() {
        let mut objects = FallingObjects::new();
        let mut progress = WordProgress::new("a");
        let mut events = Vec::new();
        objects.spawn(request('a', 1, true));
        objects.spawn(request('q', 1, false));

        let mut completed = false;
        let mut collected = 0;
        for frame in 0..40 {
            let step = objects.step(&ctx(frame as f64 * 16.0, 1), &mut progress, &mut events);
            collected += step.collected;
            if step.completed {
                completed = true;
                break;
            }
        }
        assert!(completed);
        assert_eq!(collected, 1);
    }

    #[test]
    fn test_same_frame_collisions_follow_spawn_order() {
        let mut objects = FallingObjects::new();
        let mut progress = WordProgress::new("cat");
        let mut events = Vec::new();
        let first = objects.spawn(request('c', 1, true)).id;
        let second = objects.spawn(request('z', 1, false)).id;

        for frame in 0..40 {
            let step = objects.step(&ctx(frame as f64 * 16.0, 1), &mut progress, &mut events);
            if step.collected > 0 {
                assert_eq!(step.collected, 2);
                break;
            }
        }
        let collected: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                RaceEvent::ObjectCollected { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(collected, vec![first, second]);
        assert!(events.contains(&RaceEvent::ObjectCollected { id: first, correct: true }));
        assert!(events.contains(&RaceEvent::ObjectCollected { id: second, correct: false }));
    }

    #[test]
    fn test_distractor_matching_next_letter_is_dropped() {
        let mut objects = FallingObjects::new();
        let mut progress = WordProgress::new("cat");
        let mut events = Vec::new();
        let c = objects.spawn(request('c', 1, true)).id;
        objects.step(&ctx(0.0, 1), &mut progress, &mut events);
        objects.step(&ctx(16.0, 1), &mut progress, &mut events);
        // Spawned while 'c' was expected, trailing it down the same lane
        let a = objects.spawn(request('a', 1, false)).id;

        let mut now = 32.0;
        for _ in 0..60 {
            objects.step(&ctx(now, 1), &mut progress, &mut events);
            now += 16.0;
        }
        assert!(events.contains(&RaceEvent::ObjectCollected { id: c, correct: true }));
        assert_eq!(progress.expected_index(), 1);
        assert!(!events.iter().any(|e| matches!(e, RaceEvent::ObjectCollected { id, .. } if *id == a)));
        assert!(events.contains(&RaceEvent::ObjectRetired { id: a, missed: false }));
        assert!(objects.get(a).is_none());
    }

    #[test]
    fn test_passed_correct_letter_is_dropped_not_missed() {
        let mut objects = FallingObjects::new();
        let mut progress = WordProgress::new("cat");
        let mut events = Vec::new();
        let stale = objects.spawn(request('c', 0, true)).id;
        let keep = objects.spawn(request('q', 0, false)).id;
        // Another 'c' advanced the word
        progress.accept('c');

        let outcome = objects.step(&ctx(0.0, 2), &mut progress, &mut events);
        assert_eq!(outcome.missed, 0);
        assert!(events.contains(&RaceEvent::ObjectRetired { id: stale, missed: false }));
        assert!(!objects.has_live_correct());
        assert!(objects.get(keep).is_some());
    }

    #[test]
    fn test_repeated_letter_stays_correct() {
        let mut objects = FallingObjects::new();
        let mut progress = WordProgress::new("see");
        let mut events = Vec::new();
        let e = objects.spawn(request('e', 0, true)).id;
        progress.accept('s');
        progress.accept('e');

        objects.step(&ctx(0.0, 2), &mut progress, &mut events);
        assert!(objects.get(e).is_some_and(|o| o.is_correct_letter));
    }

    #[test]
    fn test_live_queries() {
        let mut objects = FallingObjects::new();
        assert!(!objects.has_live_correct());
        objects.spawn(request('x', 0, false));
        assert!(objects.has_live_distractor());
        assert!(!objects.has_live_correct());
        objects.spawn(request('c', 1, true));
        assert_eq!(objects.live_correct_count(), 1);
        assert!(objects.has_pending_correct_above(0.0));
        assert!(!objects.has_pending_correct_above(-60.0));

        let removed = objects.remove_where(|o| o.lane == 0);
        assert_eq!(removed.len(), 1);
        assert_eq!(objects.len(), 1);
    }
}
