//! Precomputed twiddle plans, one per transform length, cached process-wide.
//!
//! A plan for length `n = m * l` (`m` in `{1, 3, 5}`, `l = 2^j`) holds, per
//! prime:
//!
//! - the radix-2 twiddles `w^i` and `w^{-i}` for `i < l/2`, where `w` is a
//!   primitive `l`-th root of unity, all in Montgomery form;
//! - for mixed-radix lengths, the radix-`m` roots `ω_m^j` and the per-column
//!   generators `ω_n^{j}` (column twiddles themselves are produced as running
//!   products during the transform, so no length-`l` column table is stored);
//! - the fused scaling constant `n^{-1} * R^2 mod q` applied by the inverse
//!   transform, which also cancels the `R^{-1}` introduced by the pointwise
//!   Montgomery product.
//!
//! Plans are built on first use and published through a `OnceLock` slot per
//! admissible length: the first builder wins, late arrivals read the complete
//! plan, and lookups on the hot path take no lock.

use std::sync::OnceLock;

use crate::mont::{Mont32, Mont64};
use crate::primes::{PrimeSet32, PrimeSet64, Primes31, Primes56};
use crate::smooth::{split_radix, table_index, SMOOTH_TABLE};

/// Per-prime tables for one transform length (32-bit view).
pub struct PrimePlan32 {
    pub mont: Mont32,
    /// `w^i` for `i < l/2`, Montgomery form.
    pub fwd: Vec<u32>,
    /// `w^{-i}` for `i < l/2`, Montgomery form.
    pub inv: Vec<u32>,
    /// `ω_m^j` for `j < m` (unused entries are 1).
    pub wm_fwd: [u32; 5],
    pub wm_inv: [u32; 5],
    /// `ω_n^{j}` for `j` in `1..m`, the column-twiddle generators.
    pub col_fwd: [u32; 4],
    pub col_inv: [u32; 4],
    /// `n^{-1} * R^2 mod q` (plain residue).
    pub scale: u32,
}

/// A complete plan for one admissible transform length (32-bit view).
pub struct Plan32 {
    pub n: usize,
    pub m: usize,
    pub l: usize,
    pub primes: [PrimePlan32; 3],
}

impl PrimePlan32 {
    fn build<P: PrimeSet32>(k: usize, n: usize, m: usize, l: usize) -> Self {
        let mont = Mont32::new(P::Q[k], P::Q_INV[k], P::R2[k]);
        let omega = mont.to_mont(P::OMEGA[k]);
        debug_assert_eq!(P::OMEGA_ORDER % n as u64, 0, "length {n} outside root order");

        let w_l = mont.pow(omega, P::OMEGA_ORDER / l as u64);
        let w_l_inv = mont.inv(w_l);
        let half = l / 2;
        let mut fwd = Vec::with_capacity(half);
        let mut inv = Vec::with_capacity(half);
        let (mut cf, mut ci) = (mont.one(), mont.one());
        for _ in 0..half {
            fwd.push(cf);
            inv.push(ci);
            cf = mont.mul(cf, w_l);
            ci = mont.mul(ci, w_l_inv);
        }

        let mut wm_fwd = [mont.one(); 5];
        let mut wm_inv = [mont.one(); 5];
        let mut col_fwd = [mont.one(); 4];
        let mut col_inv = [mont.one(); 4];
        if m > 1 {
            let w_m = mont.pow(omega, P::OMEGA_ORDER / m as u64);
            let w_m_inv = mont.inv(w_m);
            for j in 1..m {
                wm_fwd[j] = mont.mul(wm_fwd[j - 1], w_m);
                wm_inv[j] = mont.mul(wm_inv[j - 1], w_m_inv);
            }
            let w_n = mont.pow(omega, P::OMEGA_ORDER / n as u64);
            let w_n_inv = mont.inv(w_n);
            let (mut gf, mut gi) = (mont.one(), mont.one());
            for j in 1..m {
                gf = mont.mul(gf, w_n);
                gi = mont.mul(gi, w_n_inv);
                col_fwd[j - 1] = gf;
                col_inv[j - 1] = gi;
            }
        }

        // n^{-1} * R^2 mod q, kept as a plain residue: the inverse transform's
        // final Montgomery multiply by this constant simultaneously divides by
        // n and cancels the pointwise product's R^{-1}.
        let inv_n = mont.from_mont(mont.inv(mont.to_mont(n as u32)));
        let scale = ((inv_n as u64 * P::R2[k] as u64) % P::Q[k] as u64) as u32;

        Self {
            mont,
            fwd,
            inv,
            wm_fwd,
            wm_inv,
            col_fwd,
            col_inv,
            scale,
        }
    }
}

impl Plan32 {
    pub fn build<P: PrimeSet32>(n: usize) -> Self {
        let (m, l) = split_radix(n);
        Self {
            n,
            m,
            l,
            primes: std::array::from_fn(|k| PrimePlan32::build::<P>(k, n, m, l)),
        }
    }
}

/// Per-prime tables for one transform length (64-bit view).
pub struct PrimePlan64 {
    pub mont: Mont64,
    pub fwd: Vec<u64>,
    pub inv: Vec<u64>,
    pub wm_fwd: [u64; 5],
    pub wm_inv: [u64; 5],
    pub col_fwd: [u64; 4],
    pub col_inv: [u64; 4],
    pub scale: u64,
}

/// A complete plan for one admissible transform length (64-bit view).
pub struct Plan64 {
    pub n: usize,
    pub m: usize,
    pub l: usize,
    pub primes: [PrimePlan64; 4],
}

impl PrimePlan64 {
    fn build<P: PrimeSet64>(k: usize, n: usize, m: usize, l: usize) -> Self {
        let mont = Mont64::new(P::Q[k], P::Q_INV[k], P::R2[k]);
        let omega = mont.to_mont(P::OMEGA[k]);
        debug_assert_eq!(P::OMEGA_ORDER % n as u64, 0, "length {n} outside root order");

        let w_l = mont.pow(omega, P::OMEGA_ORDER / l as u64);
        let w_l_inv = mont.inv(w_l);
        let half = l / 2;
        let mut fwd = Vec::with_capacity(half);
        let mut inv = Vec::with_capacity(half);
        let (mut cf, mut ci) = (mont.one(), mont.one());
        for _ in 0..half {
            fwd.push(cf);
            inv.push(ci);
            cf = mont.mul(cf, w_l);
            ci = mont.mul(ci, w_l_inv);
        }

        let mut wm_fwd = [mont.one(); 5];
        let mut wm_inv = [mont.one(); 5];
        let mut col_fwd = [mont.one(); 4];
        let mut col_inv = [mont.one(); 4];
        if m > 1 {
            let w_m = mont.pow(omega, P::OMEGA_ORDER / m as u64);
            let w_m_inv = mont.inv(w_m);
            for j in 1..m {
                wm_fwd[j] = mont.mul(wm_fwd[j - 1], w_m);
                wm_inv[j] = mont.mul(wm_inv[j - 1], w_m_inv);
            }
            let w_n = mont.pow(omega, P::OMEGA_ORDER / n as u64);
            let w_n_inv = mont.inv(w_n);
            let (mut gf, mut gi) = (mont.one(), mont.one());
            for j in 1..m {
                gf = mont.mul(gf, w_n);
                gi = mont.mul(gi, w_n_inv);
                col_fwd[j - 1] = gf;
                col_inv[j - 1] = gi;
            }
        }

        let inv_n = mont.from_mont(mont.inv(mont.to_mont(n as u64)));
        let scale = ((inv_n as u128 * P::R2[k] as u128) % P::Q[k] as u128) as u64;

        Self {
            mont,
            fwd,
            inv,
            wm_fwd,
            wm_inv,
            col_fwd,
            col_inv,
            scale,
        }
    }
}

impl Plan64 {
    pub fn build<P: PrimeSet64>(n: usize) -> Self {
        let (m, l) = split_radix(n);
        Self {
            n,
            m,
            l,
            primes: std::array::from_fn(|k| PrimePlan64::build::<P>(k, n, m, l)),
        }
    }
}

const PLAN32_INIT: OnceLock<Plan32> = OnceLock::new();
static PLANS32: [OnceLock<Plan32>; SMOOTH_TABLE.len()] = [PLAN32_INIT; SMOOTH_TABLE.len()];

const PLAN64_INIT: OnceLock<Plan64> = OnceLock::new();
static PLANS64: [OnceLock<Plan64>; SMOOTH_TABLE.len()] = [PLAN64_INIT; SMOOTH_TABLE.len()];

/// The cached plan for an admissible length `n`, built on first use with the
/// default prime set [`Primes31`].
pub fn plan32(n: usize) -> &'static Plan32 {
    PLANS32[table_index(n)].get_or_init(|| Plan32::build::<Primes31>(n))
}

/// The cached plan for an admissible length `n`, built on first use with the
/// default prime set [`Primes56`].
pub fn plan64(n: usize) -> &'static Plan64 {
    PLANS64[table_index(n)].get_or_init(|| Plan64::build::<Primes56>(n))
}
