use std::collections::HashMap;

use spelling_racer::consts::FRAME_INTERVAL_MS;
use spelling_racer::grid::{GridOutcome, LetterGridSession};
use spelling_racer::sim::{
    GameRng, RaceEvent, RaceOptions, RacingSession, SessionPhase, SpawnPolicy,
};
use spelling_racer::{
    Difficulty, HintLevel, MemoryStore, ScoreSink, WordPresentationMode, WordSource,
};

fn options(difficulty: Difficulty, presentation: WordPresentationMode, policy: SpawnPolicy) -> RaceOptions {
    RaceOptions {
        difficulty,
        presentation,
        policy,
    }
}

/// Park the player under the lowest letter that is expected next
fn steer(session: &mut RacingSession<MemoryStore>) {
    let Some(expected) = session.progress().and_then(|p| p.expected_letter()) else {
        return;
    };
    let target = session
        .objects()
        .filter(|o| !o.collected && o.letter == expected)
        .max_by(|a, b| a.y.total_cmp(&b.y))
        .map(|o| o.lane);
    if let Some(lane) = target {
        session.set_player_lane(lane);
    }
}

/// Steer frame by frame until a word completes; returns every event seen
fn race_one_word(session: &mut RacingSession<MemoryStore>, max_ms: f64) -> Vec<RaceEvent> {
    let mut seen = session.drain_events();
    let deadline = session.now_ms() + max_ms;
    while session.now_ms() < deadline && session.phase() == SessionPhase::Racing {
        steer(session);
        session.advance(FRAME_INTERVAL_MS);
        seen.extend(session.drain_events());
    }
    seen
}

fn count(events: &[RaceEvent], kind: &str) -> usize {
    events.iter().filter(|e| e.kind() == kind).count()
}

#[test]
fn first_sighting_shows_full_word_and_completes_once() {
    let store = MemoryStore::with_words(["cat"]);
    let mut session = RacingSession::with_seed(
        store,
        42,
        options(Difficulty::Medium, WordPresentationMode::Both, SpawnPolicy::SingleObject),
    );
    session.start_session(&["cat".to_string()], Difficulty::Medium).unwrap();

    let presentation = session.presentation().unwrap();
    assert_eq!(presentation.hint, HintLevel::Full);
    assert_eq!(presentation.display, "cat");

    let events = race_one_word(&mut session, 120_000.0);
    assert_eq!(session.phase(), SessionPhase::WordComplete);
    assert_eq!(count(&events, "letterAdvanced"), 3);
    assert_eq!(count(&events, "wordComplete"), 1);
    assert_eq!(session.score(), 1);
    assert_eq!(session.store().score(), 1);
    assert_eq!(session.store().word_attempts("cat"), 1);

    let complete = events
        .iter()
        .find_map(|e| match e {
            RaceEvent::WordComplete { word, last_in_list, .. } => Some((word.clone(), *last_in_list)),
            _ => None,
        })
        .unwrap();
    assert_eq!(complete, ("cat".to_string(), true));
}

#[test]
fn completion_freezes_the_track_until_next_word() {
    let mut session = RacingSession::with_seed(
        MemoryStore::with_words(["sun", "dog"]),
        7,
        options(Difficulty::Easy, WordPresentationMode::Both, SpawnPolicy::SingleObject),
    );
    session.start_from_store(Difficulty::Easy).unwrap();
    race_one_word(&mut session, 180_000.0);
    assert_eq!(session.phase(), SessionPhase::WordComplete);
    assert!(!session.frame_running());
    assert!(!session.spawn_running());

    session.advance(10_000.0);
    assert!(session.drain_events().is_empty());

    let next = session.next_word().unwrap();
    assert!(session.is_active());
    let events = session.drain_events();
    assert!(matches!(&events[0], RaceEvent::WordLoaded { word, .. } if *word == next));
    assert!(session.objects().all(|o| o.y < 0.0));
}

#[test]
fn third_sighting_in_visual_mode_is_fully_masked() {
    let mut store = MemoryStore::with_words(["cat"]);
    store.set_attempts("cat", 2);
    let mut session = RacingSession::with_seed(
        store,
        1,
        options(Difficulty::Medium, WordPresentationMode::Visual, SpawnPolicy::SingleObject),
    );
    session.start_from_store(Difficulty::Medium).unwrap();

    let presentation = session.presentation().unwrap();
    assert_eq!(presentation.hint, HintLevel::AudioOnly);
    assert_eq!(presentation.display, "???");
    assert!(presentation.audio_only);
    assert!(presentation.speak);
}

#[test]
fn second_sighting_shows_first_letter() {
    let mut store = MemoryStore::with_words(["fish"]);
    store.set_attempts("fish", 1);
    let mut session = RacingSession::with_seed(
        store,
        1,
        options(Difficulty::Medium, WordPresentationMode::Visual, SpawnPolicy::SingleObject),
    );
    session.start_from_store(Difficulty::Medium).unwrap();
    assert_eq!(session.presentation().unwrap().display, "f???");
}

#[test]
fn multi_object_policy_completes_a_word() {
    let mut session = RacingSession::with_seed(
        MemoryStore::with_words(["tree"]),
        99,
        options(Difficulty::Hard, WordPresentationMode::Both, SpawnPolicy::MultiObject),
    );
    session.start_from_store(Difficulty::Hard).unwrap();
    assert_eq!(session.layout().lane_count(), 4);

    let events = race_one_word(&mut session, 180_000.0);
    assert_eq!(count(&events, "wordComplete"), 1);
    assert_eq!(session.store().word_attempts("tree"), 1);
}

#[test]
fn stop_mid_word_records_nothing_and_goes_quiet() {
    let mut session = RacingSession::with_seed(
        MemoryStore::with_words(["cat"]),
        5,
        options(Difficulty::Medium, WordPresentationMode::Both, SpawnPolicy::SingleObject),
    );
    session.start_from_store(Difficulty::Medium).unwrap();
    session.advance(4_000.0);
    session.stop_session();

    let events = session.drain_events();
    assert_eq!(events.last(), Some(&RaceEvent::SessionStopped));
    session.advance(60_000.0);
    assert!(session.drain_events().is_empty());
    assert_eq!(session.store().word_attempts("cat"), 0);
    assert_eq!(session.score(), 0);
}

#[test]
fn failing_store_keeps_score_in_memory_and_catches_up() {
    let mut store = MemoryStore::with_words(["cat", "dog"]);
    store.set_fail_writes(true);
    let mut session = RacingSession::with_seed(
        store,
        11,
        options(Difficulty::Easy, WordPresentationMode::Both, SpawnPolicy::SingleObject),
    );
    session.start_from_store(Difficulty::Easy).unwrap();

    race_one_word(&mut session, 180_000.0);
    assert_eq!(session.score(), 1);
    assert_eq!(session.store().score(), 0);
    assert_eq!(session.pending_writes().pending_attempts(), 1);

    session.store_mut().set_fail_writes(false);
    session.next_word();
    race_one_word(&mut session, 180_000.0);
    assert_eq!(session.score(), 2);
    assert_eq!(session.store().score(), 2);
    assert!(session.pending_writes().is_empty());
}

#[test]
fn same_seed_same_race() {
    let run = || {
        let mut session = RacingSession::with_seed(
            MemoryStore::with_words(["cat", "dog", "sun"]),
            2024,
            options(Difficulty::Medium, WordPresentationMode::Both, SpawnPolicy::SingleObject),
        );
        session.start_from_store(Difficulty::Medium).unwrap();
        race_one_word(&mut session, 120_000.0)
    };
    assert_eq!(run(), run());
}

#[test]
fn distractors_are_never_collected_as_correct() {
    for seed in 0..60 {
        let mut session = RacingSession::with_seed(
            MemoryStore::with_words(["cat"]),
            seed,
            options(Difficulty::Medium, WordPresentationMode::Both, SpawnPolicy::SingleObject),
        );
        session.start_from_store(Difficulty::Medium).unwrap();
        let events = race_one_word(&mut session, 120_000.0);

        let spawned_correct: HashMap<u32, bool> = events
            .iter()
            .filter_map(|e| match e {
                RaceEvent::ObjectSpawned { id, correct, .. } => Some((*id, *correct)),
                _ => None,
            })
            .collect();
        for event in &events {
            if let RaceEvent::ObjectCollected { id, correct: true } = event {
                assert_eq!(spawned_correct.get(id), Some(&true), "seed {seed}: object {id}");
            }
        }
        assert_eq!(count(&events, "wordComplete"), 1, "seed {seed}");
    }
}

#[test]
fn letter_grid_spells_a_word() {
    let mut grid = LetterGridSession::new(
        MemoryStore::with_words(["dog"]),
        GameRng::new(8),
        Difficulty::Hard,
        WordPresentationMode::Both,
    );
    grid.start(&["dog".to_string()]).unwrap();
    assert!((9..=15).contains(&grid.tiles().len()));

    let mut last = GridOutcome::Ignored;
    for letter in ['d', 'o', 'g'] {
        let index = grid
            .tiles()
            .iter()
            .position(|t| !t.used && t.letter == letter)
            .unwrap();
        last = grid.press(index);
    }
    assert!(matches!(last, GridOutcome::WordComplete { score: 1, .. }));
    assert_eq!(grid.store().word_attempts("dog"), 1);
}
