//! Racing session
//!
//! One `RacingSession` per play-through. It owns the word deck, the active
//! word's progress, the falling objects, the player and the two periodic
//! tasks, and is the only entry point for host commands.
//!
//! Hosts either call `on_frame`/`on_spawn_tick` from their own animation
//! frame and interval callbacks, or call `advance` with elapsed time and let
//! the session interleave both tasks itself.

use std::fmt;

use super::collision::{CollisionWindow, TrackGeometry};
use super::events::RaceEvent;
use super::falling::{FallingObject, FallingObjects, FrameContext};
use super::lanes::LaneLayout;
use super::player::{Direction, PlayerController};
use super::rng::{GameRng, RandomSource};
use super::spawn::{SpawnContext, SpawnPolicy, SpawnScheduler};
use super::timer::PeriodicTask;
use super::word::WordProgress;
use crate::consts::{FRAME_INTERVAL_MS, POINTS_PER_WORD};
use crate::deck::WordDeck;
use crate::difficulty::{Difficulty, DifficultyConfig};
use crate::hints::{WordPresentation, WordPresentationMode, hint_level};
use crate::store::{PendingWrites, ScoreSink, SettingsSource, WordSource};

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Created, never started
    Idle,
    /// Letters falling, input accepted
    Racing,
    /// Word finished, waiting for `next_word`
    WordComplete,
    /// Explicitly stopped
    Stopped,
}

/// Session start failures
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// No playable word after normalization
    EmptyWordList,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWordList => write!(f, "cannot start a session without words"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Session-wide choices fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RaceOptions {
    pub difficulty: Difficulty,
    pub presentation: WordPresentationMode,
    pub policy: SpawnPolicy,
}

impl RaceOptions {
    pub fn from_settings(settings: &dyn SettingsSource) -> Self {
        Self {
            difficulty: settings.difficulty(),
            presentation: settings.word_presentation(),
            policy: settings.spawn_policy(),
        }
    }
}

/// Which periodic task fires next in `advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Due {
    Spawn,
    Frame,
}

pub struct RacingSession<S, R = GameRng> {
    store: S,
    rng: R,
    difficulty: Difficulty,
    config: DifficultyConfig,
    layout: LaneLayout,
    presentation_mode: WordPresentationMode,
    scheduler: SpawnScheduler,
    track: TrackGeometry,
    player: PlayerController,
    deck: Option<WordDeck>,
    progress: Option<WordProgress>,
    presentation: Option<WordPresentation>,
    objects: FallingObjects,
    phase: SessionPhase,
    score: u32,
    now_ms: f64,
    frame_task: PeriodicTask,
    spawn_task: PeriodicTask,
    pending: PendingWrites,
    events: Vec<RaceEvent>,
}

impl<S> RacingSession<S, GameRng>
where
    S: WordSource + ScoreSink,
{
    /// Session with a seeded PCG source
    pub fn with_seed(store: S, seed: u64, options: RaceOptions) -> Self {
        Self::new(store, GameRng::new(seed), options)
    }
}

impl<S, R> RacingSession<S, R>
where
    S: WordSource + ScoreSink,
    R: RandomSource,
{
    pub fn new(store: S, rng: R, options: RaceOptions) -> Self {
        let config = options.difficulty.config();
        let layout = LaneLayout::for_config(&config);
        let score = store.score();
        Self {
            store,
            rng,
            difficulty: options.difficulty,
            config,
            layout,
            presentation_mode: options.presentation,
            scheduler: SpawnScheduler::new(options.policy),
            track: TrackGeometry::default(),
            player: PlayerController::new(layout),
            deck: None,
            progress: None,
            presentation: None,
            objects: FallingObjects::new(),
            phase: SessionPhase::Idle,
            score,
            now_ms: 0.0,
            frame_task: PeriodicTask::new(FRAME_INTERVAL_MS),
            spawn_task: PeriodicTask::new(config.spawn_interval_ms as f64),
            pending: PendingWrites::default(),
            events: Vec::new(),
        }
    }

    // === Commands ===

    /// Start (or restart) with `words` at `difficulty`; loads the first word.
    pub fn start_session(&mut self, words: &[String], difficulty: Difficulty) -> Result<(), SessionError> {
        let deck = WordDeck::new(words, &mut self.rng).ok_or(SessionError::EmptyWordList)?;

        self.cancel_tasks();
        self.apply_difficulty(difficulty);
        self.objects = FallingObjects::new();
        self.deck = Some(deck);
        self.score = self.store.score();
        log::info!(
            "Racing session started: {} word(s), {} difficulty, {} spawns",
            words.len(),
            difficulty,
            self.scheduler.policy()
        );
        self.load_current_word();
        Ok(())
    }

    /// Start with the store's word list
    pub fn start_from_store(&mut self, difficulty: Difficulty) -> Result<(), SessionError> {
        let words = self.store.words();
        self.start_session(&words, difficulty)
    }

    /// Stop the session. Motion stops first, then spawning; the track is
    /// cleared and an unfinished word is not recorded.
    pub fn stop_session(&mut self) {
        if matches!(self.phase, SessionPhase::Idle | SessionPhase::Stopped) {
            return;
        }
        self.cancel_tasks();
        self.objects.clear();
        self.phase = SessionPhase::Stopped;
        self.events.push(RaceEvent::SessionStopped);
        log::info!("Racing session stopped (score {})", self.score);
    }

    /// Load the next word. From `Racing` this skips the current word
    /// without recording it. Returns the new word, or `None` when stopped.
    pub fn next_word(&mut self) -> Option<String> {
        if !matches!(self.phase, SessionPhase::Racing | SessionPhase::WordComplete) {
            return None;
        }
        let deck = self.deck.as_mut()?;
        deck.advance(&mut self.rng);
        self.load_current_word();
        self.current_word()
    }

    /// Switch tiers mid-session: new constants, new lanes, player recentred
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if difficulty == self.difficulty {
            return;
        }
        self.apply_difficulty(difficulty);
        if self.phase == SessionPhase::Idle {
            return;
        }

        let lane_count = self.layout.lane_count();
        for id in self.objects.remove_where(|o| o.lane >= lane_count) {
            self.events.push(RaceEvent::ObjectRetired { id, missed: false });
        }
        self.events.push(RaceEvent::LayoutChanged {
            lane_count,
            lane_positions: self.layout.positions(),
        });
        self.events.push(RaceEvent::PlayerMoved {
            lane: self.player.lane(),
        });
    }

    /// Renderer measurement of the track; bad values keep the last known height
    pub fn set_track_height(&mut self, height: f32) {
        self.track.update(height);
    }

    /// Step one lane left/right. Ignored unless racing.
    pub fn move_player(&mut self, direction: Direction) -> bool {
        if self.phase != SessionPhase::Racing {
            return false;
        }
        let moved = self.player.move_by(direction);
        if moved {
            self.events.push(RaceEvent::PlayerMoved {
                lane: self.player.lane(),
            });
        }
        moved
    }

    /// Jump to a tapped lane. Ignored unless racing.
    pub fn set_player_lane(&mut self, lane: usize) -> bool {
        if self.phase != SessionPhase::Racing {
            return false;
        }
        let moved = self.player.set_lane(lane as i64);
        if moved {
            self.events.push(RaceEvent::PlayerMoved {
                lane: self.player.lane(),
            });
        }
        moved
    }

    // === Periodic triggers ===

    /// Frame callback from the host (vsync). `now_ms` is the host clock.
    pub fn on_frame(&mut self, now_ms: f64) {
        self.now_ms = self.now_ms.max(now_ms);
        self.run_frame();
    }

    /// Spawn timer callback from the host
    pub fn on_spawn_tick(&mut self) {
        self.run_spawn();
    }

    /// Run both tasks for `dt_ms` of session time, in due order
    /// (spawn before frame on ties).
    pub fn advance(&mut self, dt_ms: f64) {
        let target = self.now_ms + dt_ms.max(0.0);
        loop {
            let next = match (self.spawn_task.next_due(), self.frame_task.next_due()) {
                (Some(spawn), Some(frame)) if spawn <= frame => (spawn, Due::Spawn),
                (_, Some(frame)) => (frame, Due::Frame),
                (Some(spawn), None) => (spawn, Due::Spawn),
                (None, None) => break,
            };
            if next.0 > target {
                break;
            }
            self.now_ms = self.now_ms.max(next.0);
            match next.1 {
                Due::Spawn => {
                    self.spawn_task.poll(self.now_ms);
                    self.run_spawn();
                }
                Due::Frame => {
                    self.frame_task.poll(self.now_ms);
                    self.run_frame();
                }
            }
        }
        self.now_ms = target;
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<RaceEvent> {
        std::mem::take(&mut self.events)
    }

    // === Queries ===

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Racing
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    pub fn layout(&self) -> &LaneLayout {
        &self.layout
    }

    pub fn track(&self) -> &TrackGeometry {
        &self.track
    }

    pub fn spawn_policy(&self) -> SpawnPolicy {
        self.scheduler.policy()
    }

    pub fn player_lane(&self) -> usize {
        self.player.lane()
    }

    pub fn objects(&self) -> impl Iterator<Item = &FallingObject> {
        self.objects.iter()
    }

    pub fn live_object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn progress(&self) -> Option<&WordProgress> {
        self.progress.as_ref()
    }

    pub fn presentation(&self) -> Option<&WordPresentation> {
        self.presentation.as_ref()
    }

    pub fn current_word(&self) -> Option<String> {
        self.progress.as_ref().map(|p| p.word())
    }

    pub fn word_index(&self) -> Option<usize> {
        self.deck.as_ref().map(|d| d.index())
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn frame_running(&self) -> bool {
        self.frame_task.is_running()
    }

    pub fn spawn_running(&self) -> bool {
        self.spawn_task.is_running()
    }

    pub fn pending_writes(&self) -> &PendingWrites {
        &self.pending
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    // === Internals ===

    fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.config = difficulty.config();
        self.layout = LaneLayout::for_config(&self.config);
        self.player.reset(self.layout);
        self.spawn_task.set_interval(self.config.spawn_interval_ms as f64);
        log::info!(
            "Difficulty {}: {} lanes, spawn every {} ms",
            difficulty,
            self.layout.lane_count(),
            self.config.spawn_interval_ms
        );
    }

    fn cancel_tasks(&mut self) {
        self.frame_task.cancel();
        self.spawn_task.cancel();
    }

    fn load_current_word(&mut self) {
        let Some(word) = self.deck.as_ref().map(|d| d.current().to_string()) else {
            return;
        };
        self.cancel_tasks();
        self.objects.clear();
        self.player.reset(self.layout);

        let presentation =
            WordPresentation::compose(&word, hint_level(&word, &self.store), self.presentation_mode);
        log::info!(
            "Word loaded: {:?} ({:?} hint, shown as {:?})",
            word,
            presentation.hint,
            presentation.display
        );
        self.events.push(RaceEvent::WordLoaded {
            word: word.clone(),
            presentation: presentation.clone(),
            lane_count: self.layout.lane_count(),
            lane_positions: self.layout.positions(),
        });
        self.events.push(RaceEvent::PlayerMoved {
            lane: self.player.lane(),
        });

        self.progress = Some(WordProgress::new(&word));
        self.presentation = Some(presentation);
        self.phase = SessionPhase::Racing;

        self.frame_task.start(self.now_ms);
        self.spawn_task.start(self.now_ms);
        // First letters appear right away, then on the spawn cadence
        self.run_spawn();
    }

    fn run_spawn(&mut self) {
        if self.phase != SessionPhase::Racing || !self.spawn_task.is_running() {
            return;
        }
        let Some(expected) = self.progress.as_ref().and_then(|p| p.expected_letter()) else {
            return;
        };

        let ctx = SpawnContext {
            expected,
            objects: &self.objects,
            layout: &self.layout,
            config: &self.config,
            track: &self.track,
        };
        let requests = self.scheduler.plan(&ctx, &mut self.rng);
        for request in requests {
            let object = self.objects.spawn(request);
            log::debug!(
                "Spawned #{} {:?} in lane {} ({})",
                object.id,
                object.letter,
                object.lane,
                if object.is_correct_letter { "correct" } else { "distractor" }
            );
            self.events.push(RaceEvent::ObjectSpawned {
                id: object.id,
                letter: object.letter,
                lane: object.lane,
                y: object.y,
                correct: object.is_correct_letter,
            });
        }
    }

    fn run_frame(&mut self) {
        if self.phase != SessionPhase::Racing || !self.frame_task.is_running() {
            return;
        }
        let Some(progress) = self.progress.as_mut() else {
            return;
        };

        let ctx = FrameContext {
            now_ms: self.now_ms,
            player_lane: self.player.lane(),
            window: CollisionWindow::for_track(&self.track, self.config.collision_threshold),
            retire_y: self.track.retire_line(),
        };
        let outcome = self.objects.step(&ctx, progress, &mut self.events);
        if outcome.completed {
            self.complete_word();
        }
    }

    fn complete_word(&mut self) {
        self.cancel_tasks();
        self.phase = SessionPhase::WordComplete;

        let Some(word) = self.current_word() else {
            return;
        };
        self.score = self
            .pending
            .commit_word(&mut self.store, &word, POINTS_PER_WORD, self.score);
        let last_in_list = self.deck.as_ref().is_some_and(|d| d.is_last());
        log::info!("Word complete: {:?} (score {})", word, self.score);
        self.events.push(RaceEvent::WordComplete {
            word,
            score: self.score,
            last_in_list,
        });
    }
}
