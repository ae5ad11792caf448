//! Multiplication: basecase, Karatsuba, and the algorithm dispatcher.
//!
//! [`mul`] selects the algorithm from the operand lengths:
//!
//! | `min(na, nb)`        | algorithm                          |
//! |----------------------|------------------------------------|
//! | `< KARATSUBA_THRESHOLD` | quadratic basecase              |
//! | `< NTT_THRESHOLD`    | Karatsuba                          |
//! | otherwise            | NTT convolution (32-bit limb view) |
//!
//! A long operand more than twice the length of the short one is first cut
//! into blocks of the short length, each block multiplied by the rule above
//! and accumulated at its offset.  If a product is too large for the biggest
//! admissible transform, the dispatcher silently falls back to Karatsuba.
//!
//! The Karatsuba middle term uses the signed form
//! `p1 = (x1 - x0) * (y1 - y0)`, so no half-sum ever grows past its half
//! length; `p1` is then subtracted or added according to the tracked sign.
//! Accumulation buffers carry one slack limb because the running sum peaks
//! at `x * y + p1 * β^b` before `p1` is taken back out.

use std::cmp::Ordering;

use crate::limbs::{self, normalized_len, Limb};

/// Operands shorter than this are multiplied by the quadratic basecase.
pub const KARATSUBA_THRESHOLD: usize = 32;

/// Operands at least this long (both of them) go through the NTT engine.
pub const NTT_THRESHOLD: usize = 1024;

// ──────────────────────────────────────────────────────────────────────────────
// Public entry points
// ──────────────────────────────────────────────────────────────────────────────

/// `r = a * b`.  `r` must be exactly `a.len() + b.len()` limbs; it is fully
/// overwritten (the top limb may end up zero).  Inputs must not alias `r`.
pub fn mul(r: &mut [Limb], a: &[Limb], b: &[Limb]) {
    debug_assert_eq!(r.len(), a.len() + b.len());
    r.fill(0);
    let (x, y) = ordered(a, b);
    if x.is_empty() {
        return;
    }
    if x.len() < KARATSUBA_THRESHOLD {
        mul_basecase_acc(r, x, y);
        return;
    }
    let mut tmp = vec![0 as Limb; r.len() + 1];
    mac3(&mut tmp, x, y, true);
    debug_assert_eq!(tmp[r.len()], 0);
    r.copy_from_slice(&tmp[..r.len()]);
}

/// `r = a * b` without ever entering the NTT, regardless of size.
pub fn mul_karatsuba(r: &mut [Limb], a: &[Limb], b: &[Limb]) {
    debug_assert_eq!(r.len(), a.len() + b.len());
    r.fill(0);
    let (x, y) = ordered(a, b);
    if x.is_empty() {
        return;
    }
    if x.len() < KARATSUBA_THRESHOLD {
        mul_basecase_acc(r, x, y);
        return;
    }
    let mut tmp = vec![0 as Limb; r.len() + 1];
    mac3(&mut tmp, x, y, false);
    debug_assert_eq!(tmp[r.len()], 0);
    r.copy_from_slice(&tmp[..r.len()]);
}

/// Quadratic product into a zeroed buffer of exactly `na + nb` limbs.
pub fn mul_basecase(r: &mut [Limb], a: &[Limb], b: &[Limb]) {
    debug_assert_eq!(r.len(), a.len() + b.len());
    r.fill(0);
    mul_basecase_acc(r, a, b);
}

/// `r = a * a`.  `r` must be exactly `2 * a.len()` limbs.
pub fn sqr(r: &mut [Limb], a: &[Limb]) {
    debug_assert_eq!(r.len(), 2 * a.len());
    r.fill(0);
    if a.is_empty() {
        return;
    }
    if a.len() < KARATSUBA_THRESHOLD {
        sqr_basecase_inner(r, a);
        return;
    }
    if a.len() >= NTT_THRESHOLD && sqr_ntt(r, a) {
        return;
    }
    let mut tmp = vec![0 as Limb; r.len() + 1];
    sqr_into(&mut tmp, a);
    debug_assert_eq!(tmp[r.len()], 0);
    r.copy_from_slice(&tmp[..r.len()]);
}

/// Quadratic square into a zeroed buffer, bit-for-bit identical to
/// `mul_basecase(r, a, a)`.
pub fn sqr_basecase(r: &mut [Limb], a: &[Limb]) {
    debug_assert_eq!(r.len(), 2 * a.len());
    r.fill(0);
    sqr_basecase_inner(r, a);
}

// ──────────────────────────────────────────────────────────────────────────────
// Accumulating cores
// ──────────────────────────────────────────────────────────────────────────────

#[inline]
fn ordered<'a>(a: &'a [Limb], b: &'a [Limb]) -> (&'a [Limb], &'a [Limb]) {
    if a.len() <= b.len() {
        (a, b)
    } else {
        (b, a)
    }
}

/// `acc += x * y` by rows of `addmul_1`, carries propagated into high limbs.
fn mul_basecase_acc(acc: &mut [Limb], x: &[Limb], y: &[Limb]) {
    debug_assert!(acc.len() >= x.len() + y.len());
    for (i, &yi) in y.iter().enumerate() {
        let hi = limbs::addmul_1(&mut acc[i..i + x.len()], x, yi);
        let carry = limbs::add_1_assign(&mut acc[i + x.len()..], hi);
        debug_assert_eq!(carry, 0);
    }
}

/// `acc += x * y`; `acc` must have at least `x.len() + y.len() + 1` limbs of
/// headroom for the Karatsuba accumulation peak.
fn mac3(acc: &mut [Limb], a: &[Limb], b: &[Limb], allow_ntt: bool) {
    let (x, y) = ordered(a, b);
    if x.is_empty() {
        return;
    }
    if x.len() < KARATSUBA_THRESHOLD {
        mul_basecase_acc(acc, x, y);
        return;
    }
    debug_assert!(acc.len() > x.len() + y.len());

    // Extreme imbalance: slice the long operand into short-sized blocks.
    if y.len() > 2 * x.len() {
        for (i, chunk) in y.chunks(x.len()).enumerate() {
            mac3(&mut acc[i * x.len()..], x, chunk, allow_ntt);
        }
        return;
    }

    if allow_ntt && x.len() >= NTT_THRESHOLD {
        let mut p = vec![0 as Limb; x.len() + y.len()];
        if mul_ntt(&mut p, x, y) {
            add_at(acc, &p[..normalized_len(&p)], 0);
            return;
        }
        // Transform too large: fall through to Karatsuba.
    }

    karatsuba(acc, x, y, allow_ntt);
}

fn karatsuba(acc: &mut [Limb], x: &[Limb], y: &[Limb], allow_ntt: bool) {
    // x.len() <= y.len() <= 2 * x.len()
    let b = x.len() / 2;
    let (x0, x1) = x.split_at(b);
    let (y0, y1) = y.split_at(b);

    // One temporary serves all three partial products.
    let mut p = vec![0 as Limb; x1.len() + y1.len() + 1];

    // p2 = x1 * y1, contributing p2 * (β^{2b} + β^b).
    mac3(&mut p, x1, y1, allow_ntt);
    add_at(acc, &p[..normalized_len(&p)], b);
    add_at(acc, &p[..normalized_len(&p)], 2 * b);

    // p0 = x0 * y0, contributing p0 * (β^b + 1).
    p.fill(0);
    mac3(&mut p[..x0.len() + y0.len() + 1], x0, y0, allow_ntt);
    add_at(acc, &p[..normalized_len(&p)], 0);
    add_at(acc, &p[..normalized_len(&p)], b);

    // p1 = (x1 - x0) * (y1 - y0), applied at β^b with its sign.
    let (sx, dx) = sub_sign(x1, x0);
    let (sy, dy) = sub_sign(y1, y0);
    match sx * sy {
        1 => {
            p.fill(0);
            mac3(&mut p[..dx.len() + dy.len() + 1], &dx, &dy, allow_ntt);
            sub_at(acc, &p[..normalized_len(&p)], b);
        }
        -1 => {
            mac3(&mut acc[b..], &dx, &dy, allow_ntt);
        }
        _ => {}
    }
}

/// `acc += x * x` into a zeroed buffer of at least `2 * x.len() + 1` limbs.
fn sqr_into(acc: &mut [Limb], x: &[Limb]) {
    if x.len() < KARATSUBA_THRESHOLD {
        sqr_basecase_inner(&mut acc[..2 * x.len()], x);
        return;
    }
    let b = x.len() / 2;
    let (x0, x1) = x.split_at(b);

    let mut p = vec![0 as Limb; 2 * x1.len() + 1];

    // p2 = x1^2
    sqr_into(&mut p, x1);
    add_at(acc, &p[..normalized_len(&p)], b);
    add_at(acc, &p[..normalized_len(&p)], 2 * b);

    // p0 = x0^2
    p.fill(0);
    sqr_into(&mut p[..2 * x0.len() + 1], x0);
    add_at(acc, &p[..normalized_len(&p)], 0);
    add_at(acc, &p[..normalized_len(&p)], b);

    // p1 = (x1 - x0)^2, always subtracted.
    let (_, d) = sub_sign(x1, x0);
    if !d.is_empty() {
        p.fill(0);
        sqr_into(&mut p[..2 * d.len() + 1], &d);
        sub_at(acc, &p[..normalized_len(&p)], b);
    }
}

/// Off-diagonal products once, doubled, then the diagonal.  `r` is zeroed.
fn sqr_basecase_inner(r: &mut [Limb], a: &[Limb]) {
    let n = a.len();
    for i in 0..n.saturating_sub(1) {
        let hi = limbs::addmul_1(&mut r[2 * i + 1..n + i], &a[i + 1..], a[i]);
        let carry = limbs::add_1_assign(&mut r[n + i..], hi);
        debug_assert_eq!(carry, 0);
    }

    // Double the off-diagonal half.
    let mut carry = 0;
    for x in r.iter_mut() {
        let top = *x >> 63;
        *x = (*x << 1) | carry;
        carry = top;
    }
    debug_assert_eq!(carry, 0);

    // Add the diagonal a[i]^2 terms.
    let mut carry: Limb = 0;
    for i in 0..n {
        let t = a[i] as u128 * a[i] as u128;
        let s = r[2 * i] as u128 + (t as u64) as u128 + carry as u128;
        r[2 * i] = s as Limb;
        let s2 = r[2 * i + 1] as u128 + (t >> 64) + (s >> 64);
        r[2 * i + 1] = s2 as Limb;
        carry = (s2 >> 64) as Limb;
    }
    debug_assert_eq!(carry, 0);
}

// ──────────────────────────────────────────────────────────────────────────────
// Offset add/sub and the signed half-difference
// ──────────────────────────────────────────────────────────────────────────────

/// `acc += p << (64 * off)`, rippling the carry to the top of `acc`.
fn add_at(acc: &mut [Limb], p: &[Limb], off: usize) {
    debug_assert!(acc.len() >= off + p.len());
    let carry = limbs::add_n_assign(&mut acc[off..off + p.len()], p);
    let carry = limbs::add_1_assign(&mut acc[off + p.len()..], carry);
    debug_assert_eq!(carry, 0, "karatsuba accumulation overflowed its buffer");
}

/// `acc -= p << (64 * off)`; the running sum stays non-negative, so the
/// borrow never escapes the buffer.
fn sub_at(acc: &mut [Limb], p: &[Limb], off: usize) {
    debug_assert!(acc.len() >= off + p.len());
    let borrow = limbs::sub_n_assign(&mut acc[off..off + p.len()], p);
    let borrow = limbs::sub_1_assign(&mut acc[off + p.len()..], borrow);
    debug_assert_eq!(borrow, 0, "karatsuba accumulation went negative");
}

/// `(sign, |a - b|)` with the magnitude normalized.
fn sub_sign(a: &[Limb], b: &[Limb]) -> (i8, Vec<Limb>) {
    let a = &a[..normalized_len(a)];
    let b = &b[..normalized_len(b)];
    match limbs::cmp(a, b) {
        Ordering::Greater => (1, diff(a, b)),
        Ordering::Less => (-1, diff(b, a)),
        Ordering::Equal => (0, Vec::new()),
    }
}

/// `a - b` for `a > b`, normalized.
fn diff(a: &[Limb], b: &[Limb]) -> Vec<Limb> {
    let mut d = a.to_vec();
    let borrow = limbs::sub_n_assign(&mut d[..b.len()], b);
    let borrow = limbs::sub_1_assign(&mut d[b.len()..], borrow);
    debug_assert_eq!(borrow, 0);
    d.truncate(normalized_len(&d));
    d
}

// ──────────────────────────────────────────────────────────────────────────────
// NTT bridge (64-bit limbs <-> 32-bit limb view)
// ──────────────────────────────────────────────────────────────────────────────

fn split_u32(a: &[Limb]) -> Vec<u32> {
    let mut out = Vec::with_capacity(2 * a.len());
    for &x in a {
        out.push(x as u32);
        out.push((x >> 32) as u32);
    }
    out
}

fn pack_u64(r: &mut [Limb], r32: &[u32]) {
    debug_assert_eq!(r32.len(), 2 * r.len());
    for (i, x) in r.iter_mut().enumerate() {
        *x = r32[2 * i] as Limb | (r32[2 * i + 1] as Limb) << 32;
    }
}

/// NTT product through the 32-bit limb view.  Returns `false` when the
/// required transform exceeds the engine's cap (caller falls back).
fn mul_ntt(r: &mut [Limb], a: &[Limb], b: &[Limb]) -> bool {
    let a32 = split_u32(a);
    let b32 = split_u32(b);
    let mut r32 = vec![0u32; a32.len() + b32.len()];
    match zint_ntt::mul_u32(&mut r32, &a32, &b32) {
        Ok(()) => {
            pack_u64(r, &r32);
            true
        }
        Err(zint_ntt::Error::TransformTooLarge { .. }) => false,
        Err(e @ zint_ntt::Error::Allocation { .. }) => {
            panic!("ntt multiplication failed: {e}")
        }
    }
}

fn sqr_ntt(r: &mut [Limb], a: &[Limb]) -> bool {
    let a32 = split_u32(a);
    let mut r32 = vec![0u32; 2 * a32.len()];
    match zint_ntt::sqr_u32(&mut r32, &a32) {
        Ok(()) => {
            pack_u64(r, &r32);
            true
        }
        Err(zint_ntt::Error::TransformTooLarge { .. }) => false,
        Err(e @ zint_ntt::Error::Allocation { .. }) => {
            panic!("ntt squaring failed: {e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basecase_known_values() {
        let mut r = [0; 2];
        mul_basecase(&mut r, &[3], &[7]);
        assert_eq!(r, [21, 0]);

        // (2^64 - 1)^2 = {1, 2^64 - 2}
        mul_basecase(&mut r, &[Limb::MAX], &[Limb::MAX]);
        assert_eq!(r, [1, Limb::MAX - 1]);

        let mut r3 = [0; 3];
        mul_basecase(&mut r3, &[Limb::MAX, Limb::MAX], &[2]);
        assert_eq!(r3, [Limb::MAX - 1, Limb::MAX, 1]);
    }

    #[test]
    fn sqr_basecase_matches_mul_basecase() {
        let a = [
            0x1234_5678_9abc_def0,
            0xfedc_ba09_8765_4321,
            0x1111_1111_1111_1111,
            0x4444_4444_4444_4444,
        ];
        for n in 1..=a.len() {
            let mut s = vec![0; 2 * n];
            let mut m = vec![0; 2 * n];
            sqr_basecase(&mut s, &a[..n]);
            mul_basecase(&mut m, &a[..n], &a[..n]);
            assert_eq!(s, m, "n = {n}");
        }
    }

    #[test]
    fn karatsuba_matches_basecase() {
        // Deterministic patterned operands across the threshold.
        for n in [32usize, 33, 40, 64, 100] {
            let a: Vec<Limb> = (0..n as u64).map(|i| i.wrapping_mul(0x9e37_79b9_7f4a_7c15) | 1).collect();
            let b: Vec<Limb> = (0..n as u64).map(|i| i.wrapping_mul(0xc2b2_ae3d_27d4_eb4f) | 1).collect();
            let mut want = vec![0; 2 * n];
            let mut got = vec![0; 2 * n];
            mul_basecase(&mut want, &a, &b);
            mul_karatsuba(&mut got, &a, &b);
            assert_eq!(got, want, "n = {n}");
        }
    }

    #[test]
    fn unbalanced_block_decomposition() {
        let a: Vec<Limb> = (0..40u64).map(|i| i.wrapping_mul(0x0123_4567_89ab_cdef) | 1).collect();
        let b: Vec<Limb> = (0..200u64).map(|i| i.wrapping_mul(0xfedc_ba98_7654_3210) | 1).collect();
        let mut want = vec![0; 240];
        let mut got = vec![0; 240];
        mul_basecase(&mut want, &a, &b);
        mul(&mut got, &a, &b);
        assert_eq!(got, want);
    }

    #[test]
    fn zero_and_identity() {
        let a = [5u64, 6];
        let mut r = vec![0; 2];
        mul(&mut r, &a, &[]);
        assert_eq!(r, [0, 0]);

        let mut r = vec![0; 3];
        mul(&mut r, &a, &[1]);
        assert_eq!(r, [5, 6, 0]);
    }
}
