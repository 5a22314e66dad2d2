//! Word rotation for a play-through
//!
//! Words are shuffled on creation; once the last word is done the deck
//! reshuffles and starts over.

use crate::normalize_word;
use crate::sim::rng::RandomSource;

#[derive(Debug, Clone)]
pub struct WordDeck {
    source: Vec<String>,
    order: Vec<String>,
    index: usize,
    /// Completed passes through the whole list
    laps: u32,
}

impl WordDeck {
    /// Build a shuffled deck; `None` if no playable word remains after
    /// trimming, lowercasing and dropping blanks/duplicates.
    pub fn new<R: RandomSource>(words: &[String], rng: &mut R) -> Option<Self> {
        let mut source: Vec<String> = Vec::with_capacity(words.len());
        for word in words.iter().filter_map(|w| normalize_word(w)) {
            if !source.contains(&word) {
                source.push(word);
            }
        }
        if source.is_empty() {
            return None;
        }

        let mut order = source.clone();
        rng.shuffle(&mut order);
        Some(Self {
            source,
            order,
            index: 0,
            laps: 0,
        })
    }

    pub fn current(&self) -> &str {
        &self.order[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn laps(&self) -> u32 {
        self.laps
    }

    /// Current word is the last before a reshuffle
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.order.len()
    }

    /// Move to the next word, reshuffling after the last one
    pub fn advance<R: RandomSource>(&mut self, rng: &mut R) -> &str {
        self.index += 1;
        if self.index >= self.order.len() {
            self.order = self.source.clone();
            rng.shuffle(&mut self.order);
            self.index = 0;
            self.laps += 1;
            log::info!("Word list finished, reshuffled (lap {})", self.laps);
        }
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::GameRng;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_empty_and_blank_lists_rejected() {
        let mut rng = GameRng::new(1);
        assert!(WordDeck::new(&[], &mut rng).is_none());
        assert!(WordDeck::new(&words(&["  ", ""]), &mut rng).is_none());
    }

    #[test]
    fn test_words_are_normalized_and_deduplicated() {
        let mut rng = GameRng::new(1);
        let deck = WordDeck::new(&words(&["Cat", "cat ", "DOG"]), &mut rng).unwrap();
        assert_eq!(deck.len(), 2);
        let mut seen = vec![deck.current().to_string()];
        let mut deck = deck;
        seen.push(deck.advance(&mut rng).to_string());
        seen.sort();
        assert_eq!(seen, vec!["cat", "dog"]);
    }

    #[test]
    fn test_wraps_and_reshuffles() {
        let mut rng = GameRng::new(7);
        let list = words(&["a", "b", "c"]);
        let mut deck = WordDeck::new(&list, &mut rng).unwrap();
        let mut first_lap = vec![deck.current().to_string()];
        first_lap.push(deck.advance(&mut rng).to_string());
        first_lap.push(deck.advance(&mut rng).to_string());
        assert!(deck.is_last());
        first_lap.sort();
        assert_eq!(first_lap, list);

        deck.advance(&mut rng);
        assert_eq!(deck.index(), 0);
        assert_eq!(deck.laps(), 1);
    }

    #[test]
    fn test_same_seed_same_order() {
        let list = words(&["one", "two", "three", "four", "five"]);
        let deck1 = WordDeck::new(&list, &mut GameRng::new(42)).unwrap();
        let deck2 = WordDeck::new(&list, &mut GameRng::new(42)).unwrap();
        assert_eq!(deck1.order, deck2.order);
    }
}
