//! Capability-checked bit kernels.
//!
//! A [`BitKernel`] bundles population count, parallel bit extract and
//! parallel bit scatter behind plain function pointers. Two kernels exist:
//!
//! - [`BitKernel::PORTABLE`]: loops over set bits, available everywhere
//! - [`BitKernel::hardware`]: x86_64 `POPCNT` + BMI2 `PEXT`/`PDEP`
//!
//! Both produce bit-identical results; the property tests in this crate
//! compare them over random inputs. The process-wide kernel is chosen once,
//! either explicitly by [`BitKernel::install`] or by runtime detection on
//! the first call to [`BitKernel::active`].

use std::fmt;
use std::sync::OnceLock;

use tracing::{debug, warn};

static ACTIVE: OnceLock<BitKernel> = OnceLock::new();

/// A set of bit-manipulation primitives.
#[derive(Clone, Copy)]
pub struct BitKernel {
    name: &'static str,
    popcount: fn(u64) -> u32,
    extract: fn(u64, u64) -> u64,
    scatter: fn(u64, u64) -> u64,
}

impl BitKernel {
    /// Portable kernel built from shifts and masks.
    pub const PORTABLE: BitKernel = BitKernel {
        name: "portable",
        popcount: portable::popcount,
        extract: portable::extract,
        scatter: portable::scatter,
    };

    /// Hardware kernel, if this CPU supports it.
    pub fn hardware() -> Option<BitKernel> {
        hardware::kernel()
    }

    /// Hardware kernel when available, portable otherwise.
    pub fn detect() -> BitKernel {
        Self::hardware().unwrap_or(Self::PORTABLE)
    }

    /// The kernel used by the free functions of [`crate::bits`].
    ///
    /// Selected on first use and fixed for the lifetime of the process.
    pub fn active() -> &'static BitKernel {
        ACTIVE.get_or_init(|| {
            let kernel = Self::detect();
            debug!(kernel = kernel.name, "bit kernel selected");
            kernel
        })
    }

    /// Makes `kernel` the process-wide kernel and returns the kernel in
    /// effect.
    ///
    /// Only the first selection counts: once [`active`](Self::active) has
    /// run, or another kernel was installed, that kernel stays and is
    /// returned instead.
    pub fn install(kernel: BitKernel) -> &'static BitKernel {
        let mut installed = false;
        let active = ACTIVE.get_or_init(|| {
            installed = true;
            kernel
        });
        if installed {
            debug!(kernel = kernel.name, "bit kernel installed");
        } else if *active != kernel {
            warn!(
                requested = kernel.name,
                active = active.name,
                "bit kernel already selected, keeping it"
            );
        }
        active
    }

    /// Kernel name (`"portable"` or `"bmi2"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True for the hardware kernel.
    #[inline]
    pub fn is_hardware(&self) -> bool {
        self.name != Self::PORTABLE.name
    }

    /// Number of set bits in `x`.
    #[inline]
    pub fn popcount(&self, x: u64) -> u32 {
        (self.popcount)(x)
    }

    /// Gathers the bits of `value` selected by `mask` into the low bits of
    /// the result, lowest mask bit first.
    #[inline]
    pub fn extract(&self, value: u64, mask: u64) -> u64 {
        (self.extract)(value, mask)
    }

    /// Deposits the low bits of `bits` into the positions set in `mask`,
    /// lowest mask bit first. Inverse of [`extract`](Self::extract) on the
    /// masked positions.
    #[inline]
    pub fn scatter(&self, bits: u64, mask: u64) -> u64 {
        (self.scatter)(bits, mask)
    }
}

impl fmt::Debug for BitKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitKernel").field("name", &self.name).finish()
    }
}

impl PartialEq for BitKernel {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for BitKernel {}

mod portable {
    pub(super) fn popcount(x: u64) -> u32 {
        let x = x - ((x >> 1) & 0x5555_5555_5555_5555);
        let x = (x & 0x3333_3333_3333_3333) + ((x >> 2) & 0x3333_3333_3333_3333);
        let x = (x + (x >> 4)) & 0x0F0F_0F0F_0F0F_0F0F;
        (x.wrapping_mul(0x0101_0101_0101_0101) >> 56) as u32
    }

    pub(super) fn extract(value: u64, mask: u64) -> u64 {
        let mut result = 0u64;
        let mut remaining = mask;
        let mut out_bit = 0u32;
        while remaining != 0 {
            let pos = remaining.trailing_zeros();
            result |= ((value >> pos) & 1) << out_bit;
            out_bit += 1;
            remaining &= remaining - 1;
        }
        result
    }

    pub(super) fn scatter(bits: u64, mask: u64) -> u64 {
        let mut result = 0u64;
        let mut remaining = mask;
        let mut in_bit = 0u32;
        while remaining != 0 {
            let lowest = remaining & remaining.wrapping_neg();
            if (bits >> in_bit) & 1 == 1 {
                result |= lowest;
            }
            in_bit += 1;
            remaining ^= lowest;
        }
        result
    }
}

#[cfg(target_arch = "x86_64")]
mod hardware {
    use super::BitKernel;
    use core::arch::x86_64::{_pdep_u64, _pext_u64, _popcnt64};

    pub(super) fn kernel() -> Option<BitKernel> {
        let supported =
            std::is_x86_feature_detected!("bmi2") && std::is_x86_feature_detected!("popcnt");
        supported.then_some(BitKernel {
            name: "bmi2",
            popcount,
            extract,
            scatter,
        })
    }

    // SAFETY (all three): these functions are only reachable through a
    // kernel returned by `kernel()`, which checked the CPU features first.
    fn popcount(x: u64) -> u32 {
        unsafe { popcnt(x) }
    }

    fn extract(value: u64, mask: u64) -> u64 {
        unsafe { pext(value, mask) }
    }

    fn scatter(bits: u64, mask: u64) -> u64 {
        unsafe { pdep(bits, mask) }
    }

    #[target_feature(enable = "popcnt")]
    unsafe fn popcnt(x: u64) -> u32 {
        _popcnt64(x as i64) as u32
    }

    #[target_feature(enable = "bmi2")]
    unsafe fn pext(value: u64, mask: u64) -> u64 {
        _pext_u64(value, mask)
    }

    #[target_feature(enable = "bmi2")]
    unsafe fn pdep(bits: u64, mask: u64) -> u64 {
        _pdep_u64(bits, mask)
    }
}

#[cfg(not(target_arch = "x86_64"))]
mod hardware {
    use super::BitKernel;

    pub(super) fn kernel() -> Option<BitKernel> {
        None
    }
}
