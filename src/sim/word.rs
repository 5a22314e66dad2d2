//! Letter-by-letter progress through the active word

use serde::{Deserialize, Serialize};

/// Progress phase for one word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordPhase {
    /// Shown, no input yet
    Loaded,
    /// At least one letter accepted
    InProgress,
    /// Every letter collected (terminal)
    Complete,
}

/// Result of feeding one letter to the word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterOutcome {
    /// Correct letter, more to go; `index` is the slot just filled
    Advanced { index: usize, letter: char },
    /// Correct letter that finished the word
    Completed { index: usize, letter: char },
    /// Not the expected letter; progress unchanged
    Wrong { letter: char },
    /// Word already complete
    Ignored,
}

impl LetterOutcome {
    pub fn is_correct(&self) -> bool {
        matches!(
            self,
            LetterOutcome::Advanced { .. } | LetterOutcome::Completed { .. }
        )
    }
}

/// Cursor over the active word
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordProgress {
    word: Vec<char>,
    expected_index: usize,
    phase: WordPhase,
}

impl WordProgress {
    /// Load a word (lowercased)
    pub fn new(word: &str) -> Self {
        Self {
            word: word.to_lowercase().chars().collect(),
            expected_index: 0,
            phase: WordPhase::Loaded,
        }
    }

    pub fn word(&self) -> String {
        self.word.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    pub fn phase(&self) -> WordPhase {
        self.phase
    }

    pub fn expected_index(&self) -> usize {
        self.expected_index
    }

    /// Next letter to collect, `None` once complete
    pub fn expected_letter(&self) -> Option<char> {
        self.word.get(self.expected_index).copied()
    }

    /// Letters collected so far
    pub fn completed_letters(&self) -> &[char] {
        &self.word[..self.expected_index]
    }

    pub fn is_complete(&self) -> bool {
        self.phase == WordPhase::Complete
    }

    /// Feed one letter
    pub fn accept(&mut self, letter: char) -> LetterOutcome {
        let Some(expected) = self.expected_letter() else {
            return LetterOutcome::Ignored;
        };

        self.phase = WordPhase::InProgress;
        if !letter.to_lowercase().eq(std::iter::once(expected)) {
            return LetterOutcome::Wrong { letter };
        }

        let index = self.expected_index;
        self.expected_index += 1;
        if self.expected_index == self.word.len() {
            self.phase = WordPhase::Complete;
            LetterOutcome::Completed { index, letter: expected }
        } else {
            LetterOutcome::Advanced { index, letter: expected }
        }
    }
}
