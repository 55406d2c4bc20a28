//! Feistel-network byte stream with data-dependent round counts.

use entropy_core::RandomWordSource;
use tracing::trace;

use super::ByteBuffer;

/// Bits of the counter consumed per output block.
const NIBBLE_BITS: u32 = 4;

const ROUND_MULTIPLIER: u32 = 0x9E37_79B9;

/// Mutable state of a [`FeistelStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeistelState {
    /// Block being enciphered; emitted after every block.
    pub state: u64,
    /// Round key; trades places with `state` after every round.
    pub key: u64,
    /// Source of per-block round counts, read four bits at a time.
    pub counter: u64,
    /// Bit offset of the next nibble in `counter` (multiple of 4, below 64).
    pub counter_index: u32,
}

/// An unbounded byte stream produced by a small keyed Feistel network.
///
/// Each block:
/// 1. takes the next nibble `c` of `counter` and runs `1 + c` rounds;
/// 2. each round is two Feistel half-rounds over the 32-bit halves of
///    `state` (keyed by the low and high halves of `key`), after which
///    `state` and `key` swap;
/// 3. the 8 bytes of `state` are emitted, least significant first;
/// 4. once all 64 counter bits are used, `counter` and `state` swap and the
///    cursor restarts, so the next block starts from the old counter.
///
/// The varying round count and the periodic recycling of `state` into the
/// counter role keep the stream out of a fixed short cycle.
///
/// Not restartable: build a new stream to start over.
///
/// # Examples
///
/// ```rust
/// use entropy_shaping::widen::FeistelStream;
///
/// let mut a = FeistelStream::new(1, 2, 3);
/// let mut b = FeistelStream::new(1, 2, 3);
/// assert_eq!(a.next_chunk(), b.next_chunk());
/// ```
#[derive(Debug, Clone)]
pub struct FeistelStream {
    state: FeistelState,
    buffer: ByteBuffer,
}

impl FeistelStream {
    /// Creates a stream from explicit `state`, `key` and `counter` words.
    pub fn new(state: u64, key: u64, counter: u64) -> Self {
        Self {
            state: FeistelState {
                state,
                key,
                counter,
                counter_index: 0,
            },
            buffer: ByteBuffer::default(),
        }
    }

    /// Seeds `state`, `key` and `counter` from three source words, in that
    /// order.
    pub fn from_source<S: RandomWordSource + ?Sized>(source: &mut S) -> Self {
        let state = source.next_word();
        let key = source.next_word();
        let counter = source.next_word();
        trace!("feistel stream seeded");
        Self::new(state, key, counter)
    }

    /// Current network state.
    pub fn state(&self) -> &FeistelState {
        &self.state
    }

    /// Runs one block and returns `state` as it stands after the rounds.
    ///
    /// Bytes buffered from earlier blocks are left untouched.
    pub fn next_block(&mut self) -> u64 {
        let st = &mut self.state;
        let rounds = 1 + ((st.counter >> st.counter_index) & 0xF);
        st.counter_index += NIBBLE_BITS;

        for _ in 0..rounds {
            st.state = feistel_rounds(st.state, st.key);
            std::mem::swap(&mut st.state, &mut st.key);
        }
        let block = st.state;

        if st.counter_index == u64::BITS {
            std::mem::swap(&mut st.counter, &mut st.state);
            st.counter_index = 0;
        }
        block
    }

    /// Next byte of the stream.
    pub fn next_byte(&mut self) -> u8 {
        if self.buffer.is_exhausted() {
            let block = self.next_block();
            self.buffer.refill(block.to_le_bytes().to_vec());
        }
        self.buffer.take_byte().unwrap_or_default()
    }

    /// Remaining bytes of the current block, producing a new block first
    /// when nothing is buffered.
    pub fn next_chunk(&mut self) -> Vec<u8> {
        if self.buffer.is_exhausted() {
            let block = self.next_block();
            self.buffer.refill(block.to_le_bytes().to_vec());
        }
        self.buffer.take_rest()
    }
}

impl Iterator for FeistelStream {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        Some(self.next_byte())
    }
}

/// Two Feistel half-rounds over the 32-bit halves of `block`.
fn feistel_rounds(block: u64, key: u64) -> u64 {
    let mut left = (block >> 32) as u32;
    let mut right = block as u32;
    left ^= round_function(right, key as u32);
    right ^= round_function(left, (key >> 32) as u32);
    ((left as u64) << 32) | right as u64
}

/// Keyed rotate/XOR round function with one odd multiply.
#[inline]
fn round_function(half: u32, key: u32) -> u32 {
    (half.rotate_left(5) ^ key).wrapping_mul(ROUND_MULTIPLIER) ^ half.rotate_right(3)
}
