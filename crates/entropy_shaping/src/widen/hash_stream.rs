//! Counter-mode byte stream over a [`HashFunction`].

use entropy_core::primitives::HashFunction;

use super::{ByteBuffer, CounterBuffer};

/// Unbounded byte stream `H(salt ^ 0), H(salt ^ 1), ...`.
///
/// The salt and the counter both have the hash's output size, so the hash
/// inputs do not repeat before `2^(8 * output_size)` blocks.
///
/// Built by [`Widener::hash_stream`](super::Widener::hash_stream).
#[derive(Debug, Clone)]
pub struct HashStream<H> {
    hash: H,
    salt: Vec<u8>,
    counter: CounterBuffer,
    buffer: ByteBuffer,
}

impl<H: HashFunction> HashStream<H> {
    /// Creates a stream from an explicit salt.
    ///
    /// The counter has the salt's length; callers pass a salt of
    /// `hash.output_size()` bytes.
    pub fn with_salt(hash: H, salt: Vec<u8>) -> Self {
        let counter = CounterBuffer::new(salt.len());
        Self {
            hash,
            salt,
            counter,
            buffer: ByteBuffer::default(),
        }
    }

    /// Salt drawn at construction.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Hashes the next counter value and advances the counter.
    pub fn next_block(&mut self) -> Vec<u8> {
        let input = self.counter.xor_with(&self.salt);
        let digest = self.hash.compute(&input);
        self.counter.increment();
        digest
    }

    /// Next byte of the stream.
    pub fn next_byte(&mut self) -> u8 {
        if self.buffer.is_exhausted() {
            let block = self.next_block();
            self.buffer.refill(block);
        }
        self.buffer.take_byte().unwrap_or_default()
    }

    /// Remaining bytes of the current digest, hashing a new block first
    /// when nothing is buffered.
    pub fn next_chunk(&mut self) -> Vec<u8> {
        if self.buffer.is_exhausted() {
            let block = self.next_block();
            self.buffer.refill(block);
        }
        self.buffer.take_rest()
    }
}

impl<H: HashFunction> Iterator for HashStream<H> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        Some(self.next_byte())
    }
}
