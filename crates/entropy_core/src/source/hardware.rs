//! x86_64 on-chip entropy (`RDRAND` / `RDSEED`) as a word source.

use tracing::debug;

use super::RandomWordSource;
use crate::error::{EntropyError, EntropyResult};

/// Retries per word recommended by Intel's DRNG guide before reporting
/// `RDRAND` as failed.
const RETRY_LIMIT: usize = 10;

/// Which on-chip instruction to draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardwareInstruction {
    /// Output of the DRBG reseeded from the on-chip entropy source.
    Rdrand,
    /// Conditioned entropy straight from the on-chip source; may underflow
    /// under load.
    Rdseed,
}

impl HardwareInstruction {
    fn name(self) -> &'static str {
        match self {
            Self::Rdrand => "rdrand",
            Self::Rdseed => "rdseed",
        }
    }
}

/// Draws words from the processor's entropy instructions.
///
/// Construction checks the CPU at runtime; seeding has no effect.
///
/// # Examples
///
/// ```rust
/// use entropy_core::source::{HardwareEntropySource, HardwareInstruction, RandomWordSource};
///
/// if let Ok(mut source) = HardwareEntropySource::new(HardwareInstruction::Rdrand) {
///     let _word = source.next_word();
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HardwareEntropySource {
    instruction: HardwareInstruction,
}

impl HardwareEntropySource {
    /// Creates a source for `instruction`.
    ///
    /// # Errors
    ///
    /// [`EntropyError::EntropyUnavailable`] when the instruction is not
    /// supported by this CPU or architecture.
    pub fn new(instruction: HardwareInstruction) -> EntropyResult<Self> {
        if !imp::available(instruction) {
            return Err(EntropyError::EntropyUnavailable {
                source_name: instruction.name(),
            });
        }
        debug!(instruction = instruction.name(), "hardware entropy source ready");
        Ok(Self { instruction })
    }

    /// The instruction this source draws from.
    pub fn instruction(&self) -> HardwareInstruction {
        self.instruction
    }

    /// Draws one word, giving up after a bounded number of transient
    /// failures.
    ///
    /// # Errors
    ///
    /// [`EntropyError::EntropyUnavailable`] when every retry failed.
    pub fn try_next_word(&mut self) -> EntropyResult<u64> {
        for _ in 0..RETRY_LIMIT {
            if let Some(word) = imp::step(self.instruction) {
                return Ok(word);
            }
        }
        Err(EntropyError::EntropyUnavailable {
            source_name: self.instruction.name(),
        })
    }
}

impl RandomWordSource for HardwareEntropySource {
    fn seed(&mut self, _value: u64) {}

    /// Retries until the instruction reports success.
    fn next_word(&mut self) -> u64 {
        loop {
            if let Some(word) = imp::step(self.instruction) {
                return word;
            }
            core::hint::spin_loop();
        }
    }
}

#[cfg(target_arch = "x86_64")]
mod imp {
    use super::HardwareInstruction;
    use core::arch::x86_64::{_rdrand64_step, _rdseed64_step};

    pub(super) fn available(instruction: HardwareInstruction) -> bool {
        match instruction {
            HardwareInstruction::Rdrand => std::is_x86_feature_detected!("rdrand"),
            HardwareInstruction::Rdseed => std::is_x86_feature_detected!("rdseed"),
        }
    }

    pub(super) fn step(instruction: HardwareInstruction) -> Option<u64> {
        // SAFETY: a `HardwareEntropySource` only exists after `available`
        // confirmed the instruction on this CPU.
        unsafe {
            match instruction {
                HardwareInstruction::Rdrand => rdrand(),
                HardwareInstruction::Rdseed => rdseed(),
            }
        }
    }

    #[target_feature(enable = "rdrand")]
    unsafe fn rdrand() -> Option<u64> {
        let mut word = 0u64;
        (_rdrand64_step(&mut word) == 1).then_some(word)
    }

    #[target_feature(enable = "rdseed")]
    unsafe fn rdseed() -> Option<u64> {
        let mut word = 0u64;
        (_rdseed64_step(&mut word) == 1).then_some(word)
    }
}

#[cfg(not(target_arch = "x86_64"))]
mod imp {
    use super::HardwareInstruction;

    pub(super) fn available(_instruction: HardwareInstruction) -> bool {
        false
    }

    pub(super) fn step(_instruction: HardwareInstruction) -> Option<u64> {
        None
    }
}
