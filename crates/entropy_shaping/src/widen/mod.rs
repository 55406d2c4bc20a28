//! # Widening: values wider than one source word
//!
//! Fixed-width outputs:
//! - [`Widener::concat`]: `N` independent words side by side
//! - [`Widener::mix_expand`]: one word expanded through a chained mixer
//! - [`Widener::spread_bits`]: one word scattered over a wide mask
//!
//! Unbounded byte streams, each an explicit iterator that only does work
//! when pulled:
//! - [`FeistelStream`]: keyed Feistel network with varying round counts
//! - [`HashStream`]: counter-mode over any [`HashFunction`]
//! - [`CipherStream`]: counter-mode over any [`BlockCipher`]
//!
//! Streams cannot be rewound; build a fresh one to start again.

mod cipher_stream;
mod counter;
mod feistel;
mod hash_stream;

pub use cipher_stream::CipherStream;
pub use counter::CounterBuffer;
pub use feistel::{FeistelState, FeistelStream};
pub use hash_stream::HashStream;

use entropy_core::bits::{scatter_wide, validate_mask, Wide, Wide256, Wide512};
use entropy_core::primitives::{BlockCipher, HashFunction};
use entropy_core::source::splitmix64_mix;
use entropy_core::{EntropyError, EntropyResult, RandomWordSource};
use tracing::trace;

/// Builds wide values and byte streams from a word source.
///
/// # Examples
///
/// ```rust
/// use entropy_core::source::SplitMix64;
/// use entropy_shaping::widen::Widener;
///
/// let mut widener = Widener::new(SplitMix64::new(1));
/// let key: [u8; 16] = widener.next_u128().to_le_bytes();
/// let nonce = widener.concat_bytes(12);
/// assert_eq!(nonce.len(), 12);
/// # let _ = key;
/// ```
#[derive(Debug, Clone)]
pub struct Widener<S> {
    source: S,
}

impl<S: RandomWordSource> Widener<S> {
    /// Wraps `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Mutable access to the wrapped source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consumes the widener, returning the source.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// `N` consecutive source words, first draw in word 0.
    ///
    /// No mixing: the result is exactly as good as the source.
    pub fn concat<const N: usize>(&mut self) -> Wide<N> {
        Wide::from_words(std::array::from_fn(|_| self.source.next_word()))
    }

    /// 128 bits from two draws, first draw in the low half.
    pub fn next_u128(&mut self) -> u128 {
        self.concat::<2>().into()
    }

    /// 256 bits from four draws.
    pub fn next_wide256(&mut self) -> Wide256 {
        self.concat()
    }

    /// 512 bits from eight draws.
    pub fn next_wide512(&mut self) -> Wide512 {
        self.concat()
    }

    /// `N` words from a single draw.
    ///
    /// Word 0 is the raw draw; each later word is the SplitMix64 finaliser
    /// applied to its predecessor. Adjacent words are far less correlated
    /// than consecutive outputs of a weak source, at the cost of `N - 1`
    /// mixing steps.
    ///
    /// ```rust
    /// use entropy_core::source::{splitmix64_mix, SequenceSource};
    /// use entropy_shaping::widen::Widener;
    ///
    /// let mut widener = Widener::new(SequenceSource::constant(7));
    /// let wide = widener.mix_expand::<3>();
    /// assert_eq!(wide.words()[0], 7);
    /// assert_eq!(wide.words()[1], splitmix64_mix(7));
    /// ```
    pub fn mix_expand<const N: usize>(&mut self) -> Wide<N> {
        let mut words = [0u64; N];
        let mut current = self.source.next_word();
        for (i, word) in words.iter_mut().enumerate() {
            if i > 0 {
                current = splitmix64_mix(current);
            }
            *word = current;
        }
        Wide::from_words(words)
    }

    /// Scatters the low `popcount(mask)` bits of one draw onto the set
    /// positions of `mask`.
    ///
    /// Positions outside `mask` are always zero, so the result is uniform
    /// over the masked positions only.
    ///
    /// # Errors
    ///
    /// - [`EntropyError::InvalidMask`] when `mask` is zero
    /// - [`EntropyError::MaskTooWide`] when `mask` selects more than 64 bits
    pub fn spread_bits<const N: usize>(&mut self, mask: &Wide<N>) -> EntropyResult<Wide<N>> {
        validate_mask(mask.words(), u64::BITS)?;
        scatter_wide(self.source.next_word(), mask)
    }

    /// `len` bytes from `ceil(len / 8)` draws, each word little-endian.
    pub fn concat_bytes(&mut self, len: usize) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(len);
        while bytes.len() < len {
            bytes.extend_from_slice(&self.source.next_word().to_le_bytes());
        }
        bytes.truncate(len);
        bytes
    }

    /// A [`FeistelStream`] seeded from three draws (state, key, counter).
    pub fn feistel_stream(&mut self) -> FeistelStream {
        FeistelStream::from_source(&mut self.source)
    }

    /// A [`HashStream`] over `hash`, salted with `hash.output_size()`
    /// concatenated bytes.
    ///
    /// # Errors
    ///
    /// [`EntropyError::InvalidParameter`] when the hash reports a zero
    /// output size, which could never produce a byte.
    pub fn hash_stream<H: HashFunction>(&mut self, hash: H) -> EntropyResult<HashStream<H>> {
        let size = hash.output_size();
        if size == 0 {
            return Err(EntropyError::InvalidParameter {
                name: "output_size",
                value: size.to_string(),
            });
        }
        let salt = self.concat_bytes(size);
        trace!(output_size = size, "hash stream seeded");
        Ok(HashStream::with_salt(hash, salt))
    }

    /// A [`CipherStream`] over `cipher`, keyed with `key_size` and
    /// IV'd with `block_size` concatenated bytes (key drawn first).
    ///
    /// # Errors
    ///
    /// - [`EntropyError::InvalidParameter`] when the cipher reports a zero
    ///   block size
    /// - whatever [`BlockCipher::set_key`] reports
    pub fn cipher_stream<C: BlockCipher>(&mut self, cipher: C) -> EntropyResult<CipherStream<C>> {
        let block_size = cipher.block_size();
        if block_size == 0 {
            return Err(EntropyError::InvalidParameter {
                name: "block_size",
                value: block_size.to_string(),
            });
        }
        let key = self.concat_bytes(cipher.key_size());
        let iv = self.concat_bytes(block_size);
        trace!(
            key_size = key.len(),
            block_size,
            "cipher stream seeded"
        );
        CipherStream::new(cipher, &key, iv)
    }
}

/// Bytes of the current block not yet handed out.
#[derive(Debug, Clone, Default)]
pub(crate) struct ByteBuffer {
    bytes: Vec<u8>,
    pos: usize,
}

impl ByteBuffer {
    pub(crate) fn is_exhausted(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub(crate) fn refill(&mut self, bytes: Vec<u8>) {
        self.bytes = bytes;
        self.pos = 0;
    }

    pub(crate) fn take_byte(&mut self) -> Option<u8> {
        let byte = self.bytes.get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        byte
    }

    pub(crate) fn take_rest(&mut self) -> Vec<u8> {
        let rest = self.bytes.get(self.pos..).unwrap_or_default().to_vec();
        self.pos = self.bytes.len();
        rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entropy_core::bits::Wide128;
    use entropy_core::primitives::{Fnv1a64, Philox4x32};
    use entropy_core::source::{SequenceSource, SplitMix64};

    fn scripted(words: Vec<u64>) -> Widener<SequenceSource> {
        Widener::new(SequenceSource::new(words).unwrap())
    }

    #[test]
    fn test_concat_order() {
        let mut w = scripted(vec![1, 2, 3, 4]);
        assert_eq!(w.next_wide256().words(), &[1, 2, 3, 4]);

        let mut w = scripted(vec![0xAA, 0xBB]);
        assert_eq!(w.next_u128(), (0xBBu128 << 64) | 0xAA);
    }

    #[test]
    fn test_wide512_draws_eight() {
        let mut w = Widener::new(SequenceSource::constant(3));
        let wide = w.next_wide512();
        assert_eq!(wide.words(), &[3; 8]);
        assert_eq!(w.source_mut().draws(), 8);
    }

    #[test]
    fn test_mix_expand_single_draw() {
        let mut w = scripted(vec![42, 99]);
        let wide = w.mix_expand::<4>();
        let words = wide.words();
        assert_eq!(words[0], 42);
        assert_eq!(words[1], splitmix64_mix(42));
        assert_eq!(words[2], splitmix64_mix(words[1]));
        assert_eq!(words[3], splitmix64_mix(words[2]));
        assert_eq!(w.source_mut().draws(), 1);
    }

    #[test]
    fn test_spread_bits_places_low_bits() {
        // Positions 0, 64 and 127 receive bits 0, 1 and 2 of the draw.
        let mask = Wide128::from_words([1, (1 << 63) | 1]);
        let mut w = scripted(vec![0b101]);
        let spread = w.spread_bits(&mask).unwrap();
        assert_eq!(spread.words(), &[1, 1 << 63]);
        assert_eq!(spread & !mask, Wide128::ZERO);
    }

    #[test]
    fn test_spread_bits_validates_before_drawing() {
        let mut w = scripted(vec![1]);
        assert_eq!(w.spread_bits(&Wide256::ZERO), Err(EntropyError::InvalidMask));
        assert_eq!(
            w.spread_bits(&Wide128::MAX),
            Err(EntropyError::MaskTooWide {
                popcount: 128,
                budget: 64
            })
        );
        assert_eq!(w.source_mut().draws(), 0);
    }

    #[test]
    fn test_concat_bytes() {
        let mut w = scripted(vec![0x0807_0605_0403_0201, 0x100F_0E0D_0C0B_0A09]);
        assert_eq!(w.concat_bytes(10), vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(w.source_mut().draws(), 2);
        assert!(w.concat_bytes(0).is_empty());
        assert_eq!(w.source_mut().draws(), 2);

        let mut w = Widener::new(SequenceSource::constant(u64::MAX));
        let odd = w.concat_bytes(13);
        assert_eq!(odd, vec![0xFF; 13]);
        assert!(odd.capacity() >= 13);
        assert_eq!(w.source_mut().draws(), 2);
    }

    #[test]
    fn test_feistel_stream_from_widener() {
        let mut w = scripted(vec![1, 2, 3]);
        let mut from_widener = w.feistel_stream();
        let mut direct = FeistelStream::new(1, 2, 3);
        assert_eq!(from_widener.next_chunk(), direct.next_chunk());
    }

    #[test]
    fn test_hash_stream_salt_and_output() {
        let mut w = scripted(vec![0x1122_3344_5566_7788]);
        let mut stream = w.hash_stream(Fnv1a64).unwrap();
        assert_eq!(stream.salt(), &0x1122_3344_5566_7788u64.to_le_bytes());
        let first: Vec<u8> = stream.by_ref().take(8).collect();
        assert_eq!(first, Fnv1a64.compute(&0x1122_3344_5566_7788u64.to_le_bytes()));
    }

    #[test]
    fn test_cipher_stream_reproducible() {
        let a: Vec<u8> = Widener::new(SplitMix64::new(5))
            .cipher_stream(Philox4x32::default())
            .unwrap()
            .take(64)
            .collect();
        let b: Vec<u8> = Widener::new(SplitMix64::new(5))
            .cipher_stream(Philox4x32::default())
            .unwrap()
            .take(64)
            .collect();
        assert_eq!(a.len(), 64);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cipher_stream_encrypts_counter_directly() {
        let mut key_source = SplitMix64::new(5);
        let key = key_source.next_word().to_le_bytes();
        let mut cipher = Philox4x32::default();
        cipher.set_key(&key).unwrap();

        let mut stream = Widener::new(SplitMix64::new(5))
            .cipher_stream(Philox4x32::default())
            .unwrap();
        assert_eq!(stream.next_chunk().unwrap(), cipher.encrypt_block(&[0; 16]).unwrap());

        let mut one = [0u8; 16];
        one[0] = 1;
        assert_eq!(stream.next_chunk().unwrap(), cipher.encrypt_block(&one).unwrap());
    }

    #[test]
    fn test_cipher_stream_draw_count() {
        // One word of key and two words of IV for Philox-4x32.
        let mut w = Widener::new(SequenceSource::constant(1));
        let _stream = w.cipher_stream(Philox4x32::default()).unwrap();
        assert_eq!(w.source_mut().draws(), 3);
    }

    struct Empty;

    impl HashFunction for Empty {
        fn output_size(&self) -> usize {
            0
        }

        fn compute(&self, _input: &[u8]) -> Vec<u8> {
            Vec::new()
        }
    }

    #[test]
    fn test_zero_size_hash_rejected() {
        let mut w = scripted(vec![1]);
        assert!(matches!(
            w.hash_stream(Empty),
            Err(EntropyError::InvalidParameter { name: "output_size", .. })
        ));
    }

    #[test]
    fn test_byte_buffer() {
        let mut buffer = ByteBuffer::default();
        assert!(buffer.is_exhausted());
        assert_eq!(buffer.take_byte(), None);
        buffer.refill(vec![1, 2, 3]);
        assert_eq!(buffer.take_byte(), Some(1));
        assert_eq!(buffer.take_rest(), vec![2, 3]);
        assert!(buffer.is_exhausted());
        assert!(buffer.take_rest().is_empty());
    }
}
