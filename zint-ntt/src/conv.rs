//! Convolution drivers: transform, pointwise multiply, CRT, carries.
//!
//! The 32-bit entry points ([`mul_u32`], [`sqr_u32`]) run three forward
//! transforms per operand (one per prime), a pointwise product, three
//! inverse transforms, then recombine per-index residues with Garner's
//! formula and propagate base-`2^32` carries.  [`mul_u64`] is the same
//! pipeline over the four-prime 64-bit view with a fixed 256-bit
//! accumulator in the reconstruction.
//!
//! Scratch is one aligned allocation per call, carved into the residue
//! vectors; nothing is allocated inside the loops.

use bytemuck::cast_slice_mut;

use crate::plan::{plan32, plan64};
use crate::primes::{PrimeSet32, PrimeSet64, Primes31, Primes56};
use crate::smooth::{ceil_smooth, MAX_TRANSFORM};
use crate::{AlignedScratch, Error};

#[inline(always)]
fn sub_mod(a: u64, b: u64, q: u64) -> u64 {
    if a >= b {
        a - b
    } else {
        a + q - b
    }
}

#[inline(always)]
fn mul_mod(a: u64, b: u64, q: u64) -> u64 {
    (a as u128 * b as u128 % q as u128) as u64
}

// ──────────────────────────────────────────────────────────────────────────────
// 32-bit view
// ──────────────────────────────────────────────────────────────────────────────

/// Garner reconstruction of one coefficient from its three residues.
///
/// Returns the exact coefficient, which is below `Q[0]*Q[1]*Q[2] < 2^91`.
#[inline(always)]
fn garner3<P: PrimeSet32>(r0: u32, r1: u32, r2: u32) -> u128 {
    let q0 = P::Q[0] as u64;
    let q1 = P::Q[1] as u64;
    let q2 = P::Q[2] as u64;

    let v0 = r0 as u64;
    let v1 = sub_mod(r1 as u64, v0 % q1, q1) * P::GARNER_Q0_INV_Q1 as u64 % q1;
    let d = sub_mod(r2 as u64, v0 % q2, q2);
    let d = sub_mod(d, v1 * (q0 % q2) % q2, q2);
    let v2 = d * P::GARNER_Q01_INV_Q2 as u64 % q2;

    v0 as u128 + v1 as u128 * q0 as u128 + v2 as u128 * (q0 as u128 * q1 as u128)
}

/// Reconstructs the output limbs from the three residue vectors.
fn recombine3<P: PrimeSet32>(r: &mut [u32], res: &[u32], n: usize) {
    let (r0, rest) = res.split_at(n);
    let (r1, r2) = rest.split_at(n);
    let mut acc: u128 = 0;
    for (i, out) in r.iter_mut().enumerate() {
        acc += garner3::<P>(r0[i], r1[i], r2[i]);
        *out = acc as u32;
        acc >>= 32;
    }
    debug_assert_eq!(acc, 0, "convolution carry escaped the output buffer");
}

/// Exact product of two little-endian `u32` limb sequences.
///
/// `r` must be exactly `a.len() + b.len()` limbs and is fully overwritten.
/// Inputs may not alias the output (enforced by the borrows).  Fails with
/// [`Error::TransformTooLarge`] when `a.len() + b.len()` exceeds the largest
/// admissible transform, and [`Error::Allocation`] when scratch cannot be
/// obtained; `r` is unspecified on error.
pub fn mul_u32(r: &mut [u32], a: &[u32], b: &[u32]) -> Result<(), Error> {
    assert_eq!(
        r.len(),
        a.len() + b.len(),
        "output buffer must be na + nb limbs"
    );
    if a.is_empty() || b.is_empty() {
        r.fill(0);
        return Ok(());
    }
    let need = a.len() + b.len();
    let n = ceil_smooth(need).ok_or(Error::TransformTooLarge {
        n: need,
        max: MAX_TRANSFORM,
    })?;
    let plan = plan32(n);

    let mut scratch = AlignedScratch::try_new(4 * n * std::mem::size_of::<u32>())?;
    let words: &mut [u32] = cast_slice_mut(scratch.as_mut_bytes());
    let (res, tmp) = words[..4 * n].split_at_mut(3 * n);

    for k in 0..3 {
        let q = Primes31::Q[k];
        let va = &mut res[k * n..(k + 1) * n];
        for (dst, &src) in va.iter_mut().zip(a) {
            *dst = src % q;
        }
        va[a.len()..].fill(0);
        plan.forward(k, va);

        for (dst, &src) in tmp.iter_mut().zip(b) {
            *dst = src % q;
        }
        tmp[b.len()..].fill(0);
        plan.forward(k, tmp);

        plan.pointwise(k, va, tmp);
        plan.inverse(k, va);
    }

    recombine3::<Primes31>(r, res, n);
    Ok(())
}

/// Exact square of a little-endian `u32` limb sequence; one forward
/// transform per prime instead of two.
pub fn sqr_u32(r: &mut [u32], a: &[u32]) -> Result<(), Error> {
    assert_eq!(r.len(), 2 * a.len(), "output buffer must be 2 * na limbs");
    if a.is_empty() {
        return Ok(());
    }
    let need = 2 * a.len();
    let n = ceil_smooth(need).ok_or(Error::TransformTooLarge {
        n: need,
        max: MAX_TRANSFORM,
    })?;
    let plan = plan32(n);

    let mut scratch = AlignedScratch::try_new(3 * n * std::mem::size_of::<u32>())?;
    let words: &mut [u32] = cast_slice_mut(scratch.as_mut_bytes());
    let res = &mut words[..3 * n];

    for k in 0..3 {
        let q = Primes31::Q[k];
        let va = &mut res[k * n..(k + 1) * n];
        for (dst, &src) in va.iter_mut().zip(a) {
            *dst = src % q;
        }
        va[a.len()..].fill(0);
        plan.forward(k, va);
        plan.pointwise_sqr(k, va);
        plan.inverse(k, va);
    }

    recombine3::<Primes31>(r, res, n);
    Ok(())
}

// ──────────────────────────────────────────────────────────────────────────────
// 64-bit view
// ──────────────────────────────────────────────────────────────────────────────

/// Per-call Garner context: the small cross-prime residues, computed once.
struct Garner4<P: PrimeSet64> {
    q0_mod_q2: u64,
    q0_mod_q3: u64,
    q01_mod_q3: u64,
    _set: std::marker::PhantomData<P>,
}

impl<P: PrimeSet64> Garner4<P> {
    fn new() -> Self {
        let q01 = P::Q[0] as u128 * P::Q[1] as u128;
        Self {
            q0_mod_q2: P::Q[0] % P::Q[2],
            q0_mod_q3: P::Q[0] % P::Q[3],
            q01_mod_q3: (q01 % P::Q[3] as u128) as u64,
            _set: std::marker::PhantomData,
        }
    }

    /// Reconstructs one coefficient as a little-endian 256-bit value.
    /// Heap-free; the result is below `Q[0]*Q[1]*Q[2]*Q[3] < 2^218`.
    #[inline(always)]
    fn coefficient(&self, r0: u64, r1: u64, r2: u64, r3: u64) -> [u64; 4] {
        let q1 = P::Q[1];
        let q2 = P::Q[2];
        let q3 = P::Q[3];

        let v0 = r0;
        let v1 = mul_mod(sub_mod(r1, v0 % q1, q1), P::GARNER_Q0_INV_Q1, q1);
        let d = sub_mod(r2, v0 % q2, q2);
        let d = sub_mod(d, mul_mod(v1, self.q0_mod_q2, q2), q2);
        let v2 = mul_mod(d, P::GARNER_Q01_INV_Q2, q2);

        let d = sub_mod(r3, v0 % q3, q3);
        let d = sub_mod(d, mul_mod(v1, self.q0_mod_q3, q3), q3);
        let d = sub_mod(d, mul_mod(v2, self.q01_mod_q3, q3), q3);
        let v3 = mul_mod(d, P::GARNER_Q012_INV_Q3, q3);

        let mut c = [v0, 0, 0, 0];
        add_shifted(&mut c, v1 as u128 * P::Q[0] as u128, 0);
        add_shifted(&mut c, v2 as u128 * P::Q01.0 as u128, 0);
        add_shifted(&mut c, v2 as u128 * P::Q01.1 as u128, 1);
        add_shifted(&mut c, v3 as u128 * P::Q012[0] as u128, 0);
        add_shifted(&mut c, v3 as u128 * P::Q012[1] as u128, 1);
        add_shifted(&mut c, v3 as u128 * P::Q012[2] as u128, 2);
        c
    }
}

/// `acc += x << (64 * w)` with carry propagation through the 256-bit window.
#[inline(always)]
fn add_shifted(acc: &mut [u64; 4], x: u128, w: usize) {
    let mut carry: u64 = 0;
    let parts = [x as u64, (x >> 64) as u64];
    for (j, &p) in parts.iter().enumerate() {
        let idx = w + j;
        let (s, c1) = acc[idx].overflowing_add(p);
        let (s, c2) = s.overflowing_add(carry);
        acc[idx] = s;
        carry = c1 as u64 + c2 as u64;
    }
    let mut idx = w + 2;
    while carry != 0 && idx < 4 {
        let (s, c) = acc[idx].overflowing_add(carry);
        acc[idx] = s;
        carry = c as u64;
        idx += 1;
    }
    debug_assert_eq!(carry, 0, "256-bit accumulator overflow");
}

#[inline(always)]
fn add4(acc: &mut [u64; 4], c: &[u64; 4]) {
    let mut carry: u64 = 0;
    for j in 0..4 {
        let (s, c1) = acc[j].overflowing_add(c[j]);
        let (s, c2) = s.overflowing_add(carry);
        acc[j] = s;
        carry = c1 as u64 + c2 as u64;
    }
    debug_assert_eq!(carry, 0, "256-bit accumulator overflow");
}

/// Exact product of two little-endian `u64` limb sequences over the
/// four-prime 64-bit view.  Same contract as [`mul_u32`].
pub fn mul_u64(r: &mut [u64], a: &[u64], b: &[u64]) -> Result<(), Error> {
    assert_eq!(
        r.len(),
        a.len() + b.len(),
        "output buffer must be na + nb limbs"
    );
    if a.is_empty() || b.is_empty() {
        r.fill(0);
        return Ok(());
    }
    let need = a.len() + b.len();
    let n = ceil_smooth(need).ok_or(Error::TransformTooLarge {
        n: need,
        max: MAX_TRANSFORM,
    })?;
    let plan = plan64(n);

    let mut scratch = AlignedScratch::try_new(5 * n * std::mem::size_of::<u64>())?;
    let words: &mut [u64] = cast_slice_mut(scratch.as_mut_bytes());
    let (res, tmp) = words[..5 * n].split_at_mut(4 * n);

    for k in 0..4 {
        let q = Primes56::Q[k];
        let va = &mut res[k * n..(k + 1) * n];
        for (dst, &src) in va.iter_mut().zip(a) {
            *dst = src % q;
        }
        va[a.len()..].fill(0);
        plan.forward(k, va);

        for (dst, &src) in tmp.iter_mut().zip(b) {
            *dst = src % q;
        }
        tmp[b.len()..].fill(0);
        plan.forward(k, tmp);

        plan.pointwise(k, va, tmp);
        plan.inverse(k, va);
    }

    let g = Garner4::<Primes56>::new();
    let (r0, rest) = res.split_at(n);
    let (r1, rest) = rest.split_at(n);
    let (r2, r3) = rest.split_at(n);
    let mut acc = [0u64; 4];
    for (i, out) in r.iter_mut().enumerate() {
        let c = g.coefficient(r0[i], r1[i], r2[i], r3[i]);
        add4(&mut acc, &c);
        *out = acc[0];
        acc = [acc[1], acc[2], acc[3], 0];
    }
    debug_assert_eq!(acc, [0; 4], "convolution carry escaped the output buffer");
    Ok(())
}
