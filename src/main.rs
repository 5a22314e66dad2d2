//! Spelling Racer entry point
//!
//! On the web this only initialises logging; the page drives a `WebRacer`.
//! Natively it runs a headless race with a lane-seeking bot and reports how
//! it went.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use anyhow::{Result, bail};
    use clap::Parser;

    use spelling_racer::consts::FRAME_INTERVAL_MS;
    use spelling_racer::sim::{GameRng, RaceEvent, RaceOptions, RacingSession, SpawnPolicy};
    use spelling_racer::{Difficulty, MemoryStore, WordPresentationMode};

    const DEFAULT_WORDS: &str = "cat,dog,sun,fish,tree";

    #[derive(Parser, Debug)]
    #[command(name = "spelling-racer")]
    #[command(about = "Headless falling-letter race driven by a lane-seeking bot")]
    pub struct Cli {
        /// RNG seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// easy, medium or hard
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
        /// single or multi
        #[arg(long, default_value = "single")]
        policy: SpawnPolicy,
        /// Comma-separated word list
        #[arg(long, default_value = DEFAULT_WORDS)]
        words: String,
        /// Stop after this many completed words
        #[arg(long, default_value_t = 5)]
        target_words: u32,
        /// Give up after this much simulated time
        #[arg(long, default_value_t = 600)]
        max_seconds: u32,
        /// Print every renderer event as JSON
        #[arg(long, default_value_t = false)]
        trace: bool,
    }

    #[derive(Debug, Default)]
    struct Tally {
        completed: u32,
        letters: u32,
        wrong: u32,
        missed: u32,
        spawned: u32,
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        let words: Vec<String> = cli.words.split(',').map(str::to_string).collect();
        let rng = cli.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let seed = rng.seed();

        let store = MemoryStore::with_words(&words);
        let options = RaceOptions {
            difficulty: cli.difficulty,
            presentation: WordPresentationMode::Both,
            policy: cli.policy,
        };
        let mut session = RacingSession::new(store, rng, options);
        session.start_from_store(cli.difficulty)?;
        log::info!(
            "Autopilot: seed {seed}, {} difficulty, {} spawns",
            cli.difficulty,
            cli.policy
        );

        let mut tally = Tally::default();
        let max_ms = f64::from(cli.max_seconds) * 1000.0;
        while session.now_ms() < max_ms && tally.completed < cli.target_words {
            steer(&mut session);
            session.advance(FRAME_INTERVAL_MS);

            for event in session.drain_events() {
                if cli.trace {
                    println!("{}", serde_json::to_string(&event)?);
                }
                match event {
                    RaceEvent::ObjectSpawned { .. } => tally.spawned += 1,
                    RaceEvent::LetterAdvanced { .. } => tally.letters += 1,
                    RaceEvent::WrongLetter { .. } => tally.wrong += 1,
                    RaceEvent::ObjectRetired { missed: true, .. } => tally.missed += 1,
                    RaceEvent::WordComplete { word, score, .. } => {
                        tally.completed += 1;
                        log::info!("Spelled {word:?} at {:.1}s (score {score})", session.now_ms() / 1000.0);
                        session.next_word();
                    }
                    _ => {}
                }
            }
        }
        session.stop_session();

        println!(
            "seed={seed} words={} letters={} wrong={} missed={} spawned={} score={} time={:.1}s",
            tally.completed,
            tally.letters,
            tally.wrong,
            tally.missed,
            tally.spawned,
            session.score(),
            session.now_ms() / 1000.0
        );
        if tally.completed < cli.target_words {
            bail!(
                "only {} of {} words spelled within {}s",
                tally.completed,
                cli.target_words,
                cli.max_seconds
            );
        }
        Ok(())
    }

    /// Head for the lowest uncollected letter that matches the expected one
    fn steer(session: &mut RacingSession<MemoryStore>) {
        let Some(expected) = session.progress().and_then(|p| p.expected_letter()) else {
            return;
        };
        let target = session
            .objects()
            .filter(|o| !o.collected && o.letter == expected)
            .max_by(|a, b| a.y.total_cmp(&b.y))
            .map(|o| o.lane);
        if let Some(lane) = target
            && lane != session.player_lane()
        {
            session.set_player_lane(lane);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    spelling_racer::platform::web::init();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    autopilot::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
