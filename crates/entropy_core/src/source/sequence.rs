//! Fixed-sequence word source for deterministic scenarios.

use super::RandomWordSource;
use crate::error::{EntropyError, EntropyResult};

/// Replays a fixed sequence of words, wrapping around at the end.
///
/// Not random at all; intended for reproducing exact outputs of the shaping
/// layer from known inputs. Also counts how many words were drawn, which
/// lets callers observe how many source calls an operation made.
///
/// # Examples
///
/// ```rust
/// use entropy_core::source::{RandomWordSource, SequenceSource};
///
/// let mut source = SequenceSource::new(vec![1, 2, 3]).unwrap();
/// assert_eq!(source.next_word(), 1);
/// assert_eq!(source.next_word(), 2);
/// assert_eq!(source.next_word(), 3);
/// assert_eq!(source.next_word(), 1);
/// assert_eq!(source.draws(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSource {
    words: Vec<u64>,
    cursor: usize,
    draws: u64,
}

impl SequenceSource {
    /// Creates a source replaying `words`.
    ///
    /// # Errors
    ///
    /// Returns [`EntropyError::InvalidParameter`] when `words` is empty.
    pub fn new(words: Vec<u64>) -> EntropyResult<Self> {
        if words.is_empty() {
            return Err(EntropyError::InvalidParameter {
                name: "words",
                value: "sequence must not be empty".to_string(),
            });
        }
        Ok(Self {
            words,
            cursor: 0,
            draws: 0,
        })
    }

    /// A source that returns `word` forever.
    pub fn constant(word: u64) -> Self {
        Self {
            words: vec![word],
            cursor: 0,
            draws: 0,
        }
    }

    /// Number of words drawn since construction.
    #[inline]
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RandomWordSource for SequenceSource {
    /// Moves the replay cursor to `value` modulo the sequence length.
    fn seed(&mut self, value: u64) {
        self.cursor = (value % self.words.len() as u64) as usize;
    }

    #[inline]
    fn next_word(&mut self) -> u64 {
        let word = self.words[self.cursor];
        self.cursor = (self.cursor + 1) % self.words.len();
        self.draws += 1;
        word
    }
}
