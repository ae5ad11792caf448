//! Multi-prime NTT convolution engine for multi-precision integers.
//!
//! Computes exact integer convolutions of limb sequences by transforming the
//! inputs modulo several NTT-friendly primes, multiplying pointwise, and
//! recombining the residues with the Chinese Remainder Theorem.  Two
//! configurations are provided:
//!
//! - [`mul_u32`] / [`sqr_u32`]: three 30/31-bit primes over a 32-bit limb
//!   view.  This is the path a multi-precision multiplication kernel uses
//!   after splitting its native 64-bit limbs in half.
//! - [`mul_u64`]: four 52-56-bit primes directly over 64-bit limbs.
//!
//! Transform lengths are restricted to the smooth set `{2^k, 3*2^k, 5*2^k}`
//! (see [`smooth`]); twiddle plans are precomputed per length and cached
//! process-wide on first use.  All modular arithmetic runs in Montgomery
//! form; data vectors stay in plain residue form because the twiddle tables
//! carry the Montgomery factor (see [`plan`]).

use std::alloc::Layout;
use std::ptr::NonNull;

pub mod error;
pub mod mont;
pub mod plan;
pub mod primes;
pub mod smooth;
pub mod transform;

mod conv;

pub use conv::{mul_u32, mul_u64, sqr_u32};
pub use error::Error;

/// Alignment of all transform scratch, chosen for 256-bit vector loads.
pub const DEFAULT_ALIGN: usize = 64;

/// A zero-initialized scratch buffer aligned to [`DEFAULT_ALIGN`].
///
/// Owns its allocation with the exact layout it was created with, so the
/// deallocation alignment always matches.  Carve it into typed slices with
/// `bytemuck::cast_slice_mut`.
pub struct AlignedScratch {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl AlignedScratch {
    /// Allocates `bytes` of zeroed, aligned scratch (rounded up to a multiple
    /// of [`DEFAULT_ALIGN`]).  Fails with [`Error::Allocation`] instead of
    /// aborting when the allocator cannot satisfy the request.
    pub fn try_new(bytes: usize) -> Result<Self, Error> {
        let size = bytes
            .checked_next_multiple_of(DEFAULT_ALIGN)
            .ok_or(Error::Allocation { bytes })?
            .max(DEFAULT_ALIGN);
        let layout =
            Layout::from_size_align(size, DEFAULT_ALIGN).map_err(|_| Error::Allocation { bytes })?;
        // SAFETY: layout has non-zero size.
        let ptr = unsafe { std::alloc::alloc_zeroed(layout) };
        match NonNull::new(ptr) {
            Some(ptr) => Ok(Self { ptr, layout }),
            None => Err(Error::Allocation { bytes }),
        }
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        // SAFETY: the buffer is owned, initialized, and `layout.size()` long.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.layout.size()) }
    }
}

impl Drop for AlignedScratch {
    fn drop(&mut self) {
        // SAFETY: allocated in `try_new` with this exact layout.
        unsafe { std::alloc::dealloc(self.ptr.as_ptr(), self.layout) }
    }
}
