//! Little-endian byte counter used as a nonce by the counter-mode wideners.

/// A byte string treated as a little-endian unsigned integer.
///
/// Starts at zero and increments with carry propagation. A counter of `n`
/// bytes visits `2^(8n)` distinct values before wrapping back to zero.
///
/// # Examples
///
/// ```rust
/// use entropy_shaping::widen::CounterBuffer;
///
/// let mut counter = CounterBuffer::new(2);
/// for _ in 0..256 {
///     counter.increment();
/// }
/// assert_eq!(counter.as_bytes(), &[0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterBuffer {
    bytes: Vec<u8>,
}

impl CounterBuffer {
    /// A zeroed counter of `len` bytes.
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-length counter.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Current value, least significant byte first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Adds one, propagating carries upward.
    ///
    /// Returns `true` when the counter wrapped around to zero.
    pub fn increment(&mut self) -> bool {
        for byte in self.bytes.iter_mut() {
            let (next, carry) = byte.overflowing_add(1);
            *byte = next;
            if !carry {
                return false;
            }
        }
        true
    }

    /// Byte-wise XOR of the counter with `other`.
    ///
    /// Only the overlapping prefix is combined; the result has the
    /// counter's length.
    pub fn xor_with(&self, other: &[u8]) -> Vec<u8> {
        let mut out = self.bytes.clone();
        for (a, b) in out.iter_mut().zip(other) {
            *a ^= b;
        }
        out
    }
}
