//! Decimal radix conversion, both directions.
//!
//! Small magnitudes use the quadratic basecase: repeated `divrem_1` by
//! `10^19` when formatting, 19-digit chunk accumulation when parsing
//! (`10^19` is the largest power of ten below `2^64`).
//!
//! Large magnitudes divide and conquer.  A power tower `10^(19 * 2^i)` is
//! squared up once per call and shared across the whole recursion; when
//! formatting, the value is divided by the largest tower entry not
//! exceeding it and the remainder half is zero-padded to its fixed width;
//! when parsing, the digit string is split so the low half has exactly a
//! tower width and the halves recombine as `hi * 10^w + lo`.

use std::cmp::Ordering;
use std::fmt::Write;

use crate::div::div_qr_vec;
use crate::limbs::{self, normalized_len, Limb};
use crate::mul;

/// Largest `d` with `10^d < 2^64`.
pub const DIGITS_PER_LIMB: usize = 19;

/// `10^19`.
pub const BIG_BASE: Limb = 10_000_000_000_000_000_000;

/// Magnitudes below this many limbs format via the basecase.
pub const TO_STR_DC_THRESHOLD: usize = 30;

/// Digit strings at most this long parse via the basecase (`19 * 32`).
pub const FROM_STR_DC_THRESHOLD: usize = 608;

// ──────────────────────────────────────────────────────────────────────────────
// Formatting
// ──────────────────────────────────────────────────────────────────────────────

/// Formats a magnitude as decimal digits (no sign; `"0"` for zero).
pub fn to_decimal(mag: &[Limb]) -> String {
    let n = normalized_len(mag);
    let mut out = String::with_capacity(n * 20 + 1);
    if n < TO_STR_DC_THRESHOLD {
        basecase_to_string(&mag[..n], 0, &mut out);
    } else {
        let tower = build_tower_above(&mag[..n]);
        to_string_rec(mag[..n].to_vec(), tower.len() - 1, &tower, 0, &mut out);
    }
    out
}

/// Tower entries `10^(19 * 2^i)` for `i = 0, 1, …`, built until the last
/// entry strictly exceeds `mag`.
fn build_tower_above(mag: &[Limb]) -> Vec<Vec<Limb>> {
    let mut tower: Vec<Vec<Limb>> = vec![vec![BIG_BASE]];
    while limbs::cmp(tower.last().unwrap(), mag) != Ordering::Greater {
        let last = tower.last().unwrap();
        let mut sq = vec![0 as Limb; 2 * last.len()];
        mul::sqr(&mut sq, last);
        sq.truncate(normalized_len(&sq));
        tower.push(sq);
    }
    tower
}

/// Emits `v`, left-padded with zeros to at least `pad` digits.
fn to_string_rec(v: Vec<Limb>, level: usize, tower: &[Vec<Limb>], pad: usize, out: &mut String) {
    if v.len() < TO_STR_DC_THRESHOLD {
        basecase_to_string(&v, pad, out);
        return;
    }
    // Largest tower entry not exceeding v; always below the tower top.
    let mut l = level;
    loop {
        if limbs::cmp(&tower[l], &v) != Ordering::Greater {
            break;
        }
        debug_assert!(l > 0, "a multi-limb value sits above the first tower entry");
        l -= 1;
    }
    let width = DIGITS_PER_LIMB << l;
    let (q, r) = div_qr_vec(&v, &tower[l]);
    to_string_rec(q, l, tower, pad.saturating_sub(width), out);
    to_string_rec(r, l, tower, width, out);
}

/// Repeated `divrem_1` by `10^19`, emitting 19-digit groups.
fn basecase_to_string(mag: &[Limb], pad: usize, out: &mut String) {
    let mut v = mag.to_vec();
    let mut n = normalized_len(&v);
    let mut groups: Vec<Limb> = Vec::new();
    while n > 0 {
        groups.push(limbs::divrem_1_assign(&mut v[..n], BIG_BASE));
        n = normalized_len(&v[..n]);
    }

    let digits = match groups.last() {
        None => 1, // the value is zero, printed as a single '0'
        Some(&top) => (groups.len() - 1) * DIGITS_PER_LIMB + decimal_len(top),
    };
    for _ in digits..pad {
        out.push('0');
    }
    match groups.last() {
        None => out.push('0'),
        Some(&top) => {
            write!(out, "{top}").unwrap();
            for &g in groups.iter().rev().skip(1) {
                write!(out, "{g:019}").unwrap();
            }
        }
    }
}

fn decimal_len(mut x: Limb) -> usize {
    let mut len = 1;
    while x >= 10 {
        x /= 10;
        len += 1;
    }
    len
}

// ──────────────────────────────────────────────────────────────────────────────
// Parsing
// ──────────────────────────────────────────────────────────────────────────────

/// Parses ASCII digits (leading zeros allowed) into a normalized magnitude.
/// The caller has already validated the characters and stripped any sign.
pub fn from_decimal(digits: &[u8]) -> Vec<Limb> {
    if digits.len() <= FROM_STR_DC_THRESHOLD {
        return basecase_from_string(digits);
    }
    let mut tower: Vec<Vec<Limb>> = vec![vec![BIG_BASE]];
    while DIGITS_PER_LIMB << tower.len() < digits.len() {
        let last = tower.last().unwrap();
        let mut sq = vec![0 as Limb; 2 * last.len()];
        mul::sqr(&mut sq, last);
        sq.truncate(normalized_len(&sq));
        tower.push(sq);
    }
    from_string_rec(digits, &tower)
}

fn from_string_rec(digits: &[u8], tower: &[Vec<Limb>]) -> Vec<Limb> {
    if digits.len() <= FROM_STR_DC_THRESHOLD {
        return basecase_from_string(digits);
    }
    // Largest width 19 * 2^i strictly below the digit count; the high part
    // then has at most that many digits as well.
    let mut l = 0;
    while DIGITS_PER_LIMB << (l + 1) < digits.len() {
        l += 1;
    }
    let width = DIGITS_PER_LIMB << l;
    let (hi, lo) = digits.split_at(digits.len() - width);

    let hv = from_string_rec(hi, tower);
    let lv = from_string_rec(lo, tower);

    // hi * 10^width + lo
    let t = &tower[l];
    let mut r = vec![0 as Limb; hv.len() + t.len()];
    mul::mul(&mut r, &hv, t);
    let carry = limbs::add_n_assign(&mut r[..lv.len()], &lv);
    let carry = limbs::add_1_assign(&mut r[lv.len()..], carry);
    debug_assert_eq!(carry, 0);
    r.truncate(normalized_len(&r));
    r
}

fn basecase_from_string(digits: &[u8]) -> Vec<Limb> {
    let mut mag: Vec<Limb> = Vec::new();
    let head = digits.len() % DIGITS_PER_LIMB;
    let mut chunks: Vec<&[u8]> = Vec::new();
    if head > 0 {
        chunks.push(&digits[..head]);
    }
    chunks.extend(digits[head..].chunks(DIGITS_PER_LIMB));

    for chunk in chunks {
        let val = chunk
            .iter()
            .fold(0 as Limb, |acc, &c| acc * 10 + (c - b'0') as Limb);
        let scale = (10 as Limb).pow(chunk.len() as u32);
        let carry = limbs::mul_1_assign(&mut mag, scale);
        if carry != 0 {
            mag.push(carry);
        }
        let carry = limbs::add_1_assign(&mut mag, val);
        if carry != 0 {
            mag.push(carry);
        }
    }
    mag.truncate(normalized_len(&mag));
    mag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_small_values() {
        assert_eq!(to_decimal(&[]), "0");
        assert_eq!(to_decimal(&[0]), "0");
        assert_eq!(to_decimal(&[1]), "1");
        assert_eq!(to_decimal(&[123_456_789]), "123456789");
        // 2^64 = 18446744073709551616
        assert_eq!(to_decimal(&[0, 1]), "18446744073709551616");
    }

    #[test]
    fn parse_small_values() {
        assert_eq!(from_decimal(b"0"), Vec::<Limb>::new());
        assert_eq!(from_decimal(b"00000"), Vec::<Limb>::new());
        assert_eq!(from_decimal(b"42"), vec![42]);
        assert_eq!(from_decimal(b"18446744073709551616"), vec![0, 1]);
        // exactly one 19-digit group boundary
        assert_eq!(from_decimal(b"10000000000000000000"), vec![BIG_BASE]);
    }

    #[test]
    fn group_boundary_roundtrip() {
        // 10^19 - 1, 10^19, 10^19 + 1 cross the limb-group boundary.
        for s in [
            "9999999999999999999",
            "10000000000000000000",
            "10000000000000000001",
        ] {
            assert_eq!(to_decimal(&from_decimal(s.as_bytes())), s);
        }
    }

    #[test]
    fn padded_zero_halves_survive() {
        // A value whose low D&C half is all zeros exercises the padding path
        // even at basecase sizes.
        let s = format!("1{}", "0".repeat(100));
        assert_eq!(to_decimal(&from_decimal(s.as_bytes())), s);
    }

    #[test]
    fn decimal_len_boundaries() {
        assert_eq!(decimal_len(0), 1);
        assert_eq!(decimal_len(9), 1);
        assert_eq!(decimal_len(10), 2);
        assert_eq!(decimal_len(BIG_BASE - 1), 19);
        assert_eq!(decimal_len(Limb::MAX), 20);
    }
}
