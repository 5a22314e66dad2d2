//! Letter-grid mode
//!
//! The child taps letter buttons in word order. The grid holds the word's
//! letters plus a tier-dependent number of random extras, shuffled. Uses the
//! same hint progression and word cursor as the racing mode.

use crate::consts::{ALPHABET, POINTS_PER_WORD};
use crate::deck::WordDeck;
use crate::difficulty::Difficulty;
use crate::hints::{WordPresentation, WordPresentationMode, hint_level};
use crate::sim::rng::{GameRng, RandomSource};
use crate::sim::session::SessionError;
use crate::sim::word::{LetterOutcome, WordProgress};
use crate::store::{PendingWrites, ScoreSink, WordSource};

/// Correct taps in a row before the mascot gets excited
pub const EXCITED_STREAK: u32 = 3;

/// One letter button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterTile {
    pub letter: char,
    /// Already used for a filled slot
    pub used: bool,
}

/// Result of tapping a tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridOutcome {
    /// Slot `slot` filled, word continues
    Correct { slot: usize, letter: char, streak: u32 },
    /// Wrong letter; streak reset
    Wrong { letter: char },
    /// Last slot filled
    WordComplete { word: String, score: u32, last_in_list: bool },
    /// Used tile, bad index, or nothing active
    Ignored,
}

pub struct LetterGridSession<S, R = GameRng> {
    store: S,
    rng: R,
    difficulty: Difficulty,
    presentation_mode: WordPresentationMode,
    deck: Option<WordDeck>,
    progress: Option<WordProgress>,
    presentation: Option<WordPresentation>,
    tiles: Vec<LetterTile>,
    streak: u32,
    score: u32,
    pending: PendingWrites,
}

impl<S, R> LetterGridSession<S, R>
where
    S: WordSource + ScoreSink,
    R: RandomSource,
{
    pub fn new(store: S, rng: R, difficulty: Difficulty, presentation_mode: WordPresentationMode) -> Self {
        let score = store.score();
        Self {
            store,
            rng,
            difficulty,
            presentation_mode,
            deck: None,
            progress: None,
            presentation: None,
            tiles: Vec::new(),
            streak: 0,
            score,
            pending: PendingWrites::default(),
        }
    }

    /// Shuffle `words` and load the first one
    pub fn start(&mut self, words: &[String]) -> Result<(), SessionError> {
        let deck = WordDeck::new(words, &mut self.rng).ok_or(SessionError::EmptyWordList)?;
        self.deck = Some(deck);
        self.score = self.store.score();
        log::info!("Letter grid started: {} word(s), {} difficulty", words.len(), self.difficulty);
        self.load_current_word();
        Ok(())
    }

    /// Move on to the next word (reshuffles after the last)
    pub fn next_word(&mut self) -> Option<String> {
        let deck = self.deck.as_mut()?;
        deck.advance(&mut self.rng);
        self.load_current_word();
        self.current_word()
    }

    /// Tap tile `index`
    pub fn press(&mut self, index: usize) -> GridOutcome {
        let Some(progress) = self.progress.as_mut() else {
            return GridOutcome::Ignored;
        };
        let Some(tile) = self.tiles.get_mut(index) else {
            return GridOutcome::Ignored;
        };
        if tile.used {
            return GridOutcome::Ignored;
        }

        match progress.accept(tile.letter) {
            LetterOutcome::Advanced { index: slot, letter } => {
                tile.used = true;
                self.streak += 1;
                GridOutcome::Correct {
                    slot,
                    letter,
                    streak: self.streak,
                }
            }
            LetterOutcome::Completed { .. } => {
                tile.used = true;
                self.streak += 1;
                self.complete_word()
            }
            LetterOutcome::Wrong { letter } => {
                self.streak = 0;
                GridOutcome::Wrong { letter }
            }
            LetterOutcome::Ignored => GridOutcome::Ignored,
        }
    }

    pub fn tiles(&self) -> &[LetterTile] {
        &self.tiles
    }

    pub fn presentation(&self) -> Option<&WordPresentation> {
        self.presentation.as_ref()
    }

    pub fn progress(&self) -> Option<&WordProgress> {
        self.progress.as_ref()
    }

    pub fn current_word(&self) -> Option<String> {
        self.progress.as_ref().map(|p| p.word())
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn is_excited(&self) -> bool {
        self.streak >= EXCITED_STREAK
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn load_current_word(&mut self) {
        let Some(word) = self.deck.as_ref().map(|d| d.current().to_string()) else {
            return;
        };
        let presentation =
            WordPresentation::compose(&word, hint_level(&word, &self.store), self.presentation_mode);
        self.tiles = build_tiles(&word, self.difficulty, &mut self.rng);
        self.progress = Some(WordProgress::new(&word));
        self.presentation = Some(presentation);
        self.streak = 0;
        log::info!("Grid word loaded: {:?} with {} tiles", word, self.tiles.len());
    }

    fn complete_word(&mut self) -> GridOutcome {
        let Some(word) = self.current_word() else {
            return GridOutcome::Ignored;
        };
        self.score = self
            .pending
            .commit_word(&mut self.store, &word, POINTS_PER_WORD, self.score);
        let last_in_list = self.deck.as_ref().is_some_and(|d| d.is_last());
        log::info!("Grid word complete: {:?} (score {})", word, self.score);
        GridOutcome::WordComplete {
            word,
            score: self.score,
            last_in_list,
        }
    }
}

/// Word letters plus random extras for the tier, shuffled
pub fn build_tiles<R: RandomSource>(word: &str, difficulty: Difficulty, rng: &mut R) -> Vec<LetterTile> {
    let alphabet: Vec<char> = ALPHABET.chars().collect();
    let extras = rng.next_in_range(difficulty.grid_distractors());

    let mut letters: Vec<char> = word.chars().collect();
    for _ in 0..extras {
        letters.push(alphabet[rng.next_index(alphabet.len())]);
    }
    rng.shuffle(&mut letters);

    letters
        .into_iter()
        .map(|letter| LetterTile { letter, used: false })
        .collect()
}
