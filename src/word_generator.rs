use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::language::Language;

/// Draws batches of words from a language's word list.
pub struct WordGenerator<R: Rng = ThreadRng> {
    language: Language,
    rng: R,
}

impl WordGenerator<ThreadRng> {
    pub fn new(language: Language) -> Self {
        Self::with_rng(language, rand::thread_rng())
    }
}

impl<R: Rng> WordGenerator<R> {
    pub fn with_rng(language: Language, rng: R) -> Self {
        Self { language, rng }
    }

    /// Generate `count` words, each drawn uniformly from the word list. A word is
    /// never followed by itself inside one batch; the first word is not checked
    /// against whatever the previous batch ended with.
    pub fn generate_batch(&mut self, count: usize) -> Vec<String> {
        let mut batch: Vec<String> = Vec::with_capacity(count);

        for _ in 0..count {
            let word = loop {
                let Some(candidate) = self.language.words.choose(&mut self.rng) else {
                    return batch;
                };
                if batch.last() != Some(candidate) {
                    break candidate.clone();
                }
                // a list of one distinct word can never satisfy the guard
                if self.language.words.iter().all(|w| w == candidate) {
                    break candidate.clone();
                }
            };
            batch.push(word);
        }

        batch
    }
}
