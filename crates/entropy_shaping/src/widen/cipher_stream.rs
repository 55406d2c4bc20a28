//! Counter-mode keystream over a [`BlockCipher`].

use entropy_core::primitives::BlockCipher;
use entropy_core::EntropyResult;

use super::{ByteBuffer, CounterBuffer};

/// Unbounded keystream `E_k(0), E_k(1), ...`.
///
/// Encrypting successive counter blocks with no plaintext mixed in is
/// counter mode used as a generator. The IV is drawn and kept alongside the
/// key but never enters the counter block.
///
/// Built by [`Widener::cipher_stream`](super::Widener::cipher_stream).
#[derive(Debug, Clone)]
pub struct CipherStream<C> {
    cipher: C,
    iv: Vec<u8>,
    counter: CounterBuffer,
    buffer: ByteBuffer,
}

impl<C: BlockCipher> CipherStream<C> {
    /// Keys `cipher` and starts the counter at zero.
    ///
    /// # Errors
    ///
    /// Whatever [`BlockCipher::set_key`] reports for `key`.
    pub fn new(mut cipher: C, key: &[u8], iv: Vec<u8>) -> EntropyResult<Self> {
        cipher.set_key(key)?;
        let counter = CounterBuffer::new(cipher.block_size());
        Ok(Self {
            cipher,
            iv,
            counter,
            buffer: ByteBuffer::default(),
        })
    }

    /// The IV drawn with the key.
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    /// Encrypts the next counter block and advances the counter.
    ///
    /// # Errors
    ///
    /// Whatever [`BlockCipher::encrypt_block`] reports.
    pub fn next_block(&mut self) -> EntropyResult<Vec<u8>> {
        let ciphertext = self.cipher.encrypt_block(self.counter.as_bytes())?;
        self.counter.increment();
        Ok(ciphertext)
    }

    /// Next keystream byte.
    ///
    /// # Errors
    ///
    /// Whatever [`BlockCipher::encrypt_block`] reports.
    pub fn next_byte(&mut self) -> EntropyResult<u8> {
        self.fill_if_exhausted()?;
        Ok(self.buffer.take_byte().unwrap_or_default())
    }

    /// Remaining bytes of the current block, encrypting a new block first
    /// when nothing is buffered.
    ///
    /// # Errors
    ///
    /// Whatever [`BlockCipher::encrypt_block`] reports.
    pub fn next_chunk(&mut self) -> EntropyResult<Vec<u8>> {
        self.fill_if_exhausted()?;
        Ok(self.buffer.take_rest())
    }

    fn fill_if_exhausted(&mut self) -> EntropyResult<()> {
        if self.buffer.is_exhausted() {
            let block = self.next_block()?;
            self.buffer.refill(block);
        }
        Ok(())
    }
}

/// Yields keystream bytes; ends on the first cipher error.
impl<C: BlockCipher> Iterator for CipherStream<C> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.next_byte().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entropy_core::primitives::Philox4x32;
    use entropy_core::EntropyError;

    #[test]
    fn test_rejects_bad_key() {
        let err = CipherStream::new(Philox4x32::default(), &[0; 3], vec![0; 16]).unwrap_err();
        assert_eq!(
            err,
            EntropyError::KeySizeMismatch {
                expected: 8,
                actual: 3
            }
        );
    }

    #[test]
    fn test_encrypts_plain_counter() {
        let key = [1, 0, 0, 0, 2, 0, 0, 0];
        let mut stream = CipherStream::new(Philox4x32::default(), &key, vec![0xAA; 16]).unwrap();

        let mut cipher = Philox4x32::default();
        cipher.set_key(&key).unwrap();
        let mut counter = [0u8; 16];
        assert_eq!(stream.next_block().unwrap(), cipher.encrypt_block(&counter).unwrap());
        counter[0] = 1;
        assert_eq!(stream.next_block().unwrap(), cipher.encrypt_block(&counter).unwrap());
    }

    #[test]
    fn test_iv_does_not_enter_the_keystream() {
        let key = [9; 8];
        let mut zero = CipherStream::new(Philox4x32::default(), &key, vec![0; 16]).unwrap();
        let mut other = CipherStream::new(Philox4x32::default(), &key, vec![1; 16]).unwrap();
        assert_eq!(other.iv(), &[1; 16]);
        for _ in 0..3 {
            assert_eq!(zero.next_chunk().unwrap(), other.next_chunk().unwrap());
        }
    }

    #[test]
    fn test_iterator_matches_chunks() {
        let key = [3; 8];
        let mut chunks = CipherStream::new(Philox4x32::default(), &key, vec![5; 16]).unwrap();
        let bytes: Vec<u8> = CipherStream::new(Philox4x32::default(), &key, vec![5; 16])
            .unwrap()
            .take(32)
            .collect();

        let mut expected = chunks.next_chunk().unwrap();
        expected.extend(chunks.next_chunk().unwrap());
        assert_eq!(bytes, expected);
    }
}
