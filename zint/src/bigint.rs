//! The signed big-integer value type.
//!
//! [`BigInt`] is a sign-magnitude pair: a [`Sign`] and a normalized
//! little-endian limb vector.  Zero is represented uniquely as an empty
//! magnitude with [`Sign::NoSign`]; every public operation maintains that
//! invariant.
//!
//! Division and remainder are truncated: the quotient rounds toward zero
//! and the remainder carries the dividend's sign, so
//! `(a / b) * b + (a % b) == a` always holds.  Shifts act on the magnitude
//! and preserve the sign, so `>>` moves negative values toward zero.
//!
//! The `/` and `%` operators panic on a zero divisor; [`BigInt::div_rem`]
//! and the `checked_*` forms report it as an error instead.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Shl, ShlAssign, Shr,
    ShrAssign, Sub, SubAssign,
};
use std::str::FromStr;

use crate::div::div_qr_vec;
use crate::error::Error;
use crate::limbs::{self, normalized_len, Limb, LIMB_BITS};
use crate::{mul, radix};

/// Sign of a [`BigInt`].  `NoSign` is used exactly for zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sign {
    Minus,
    NoSign,
    Plus,
}

impl Sign {
    fn reverse(self) -> Sign {
        match self {
            Sign::Minus => Sign::Plus,
            Sign::NoSign => Sign::NoSign,
            Sign::Plus => Sign::Minus,
        }
    }
}

/// An arbitrary-precision signed integer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BigInt {
    sign: Sign,
    mag: Vec<Limb>,
}

impl BigInt {
    /// Zero.
    pub fn zero() -> Self {
        Self {
            sign: Sign::NoSign,
            mag: Vec::new(),
        }
    }

    /// Builds a value from a raw little-endian limb magnitude and a sign.
    /// The magnitude is normalized; a zero magnitude yields zero regardless
    /// of `sign`, and a nonzero magnitude requires `Plus` or `Minus`.
    pub fn from_limbs(sign: Sign, mut mag: Vec<Limb>) -> Self {
        mag.truncate(normalized_len(&mag));
        if mag.is_empty() {
            return Self::zero();
        }
        assert!(
            sign != Sign::NoSign,
            "a nonzero magnitude requires an explicit sign"
        );
        Self { sign, mag }
    }

    fn from_mag(sign: Sign, mut mag: Vec<Limb>) -> Self {
        mag.truncate(normalized_len(&mag));
        if mag.is_empty() {
            Self::zero()
        } else {
            Self { sign, mag }
        }
    }

    pub fn is_zero(&self) -> bool {
        self.sign == Sign::NoSign
    }

    pub fn is_positive(&self) -> bool {
        self.sign == Sign::Plus
    }

    pub fn is_negative(&self) -> bool {
        self.sign == Sign::Minus
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// Number of limbs in the magnitude.
    pub fn abs_size(&self) -> usize {
        self.mag.len()
    }

    /// The normalized magnitude limbs, least significant first.
    pub fn limbs(&self) -> &[Limb] {
        &self.mag
    }

    /// Compares magnitudes, ignoring signs.
    pub fn compare_abs(&self, other: &Self) -> Ordering {
        limbs::cmp(&self.mag, &other.mag)
    }

    pub fn abs(&self) -> Self {
        match self.sign {
            Sign::Minus => Self {
                sign: Sign::Plus,
                mag: self.mag.clone(),
            },
            _ => self.clone(),
        }
    }

    /// Flips the sign in place.
    pub fn negate(&mut self) {
        self.sign = self.sign.reverse();
    }

    /// `self *= s` for a single limb.
    pub fn mul_limb(&mut self, s: Limb) {
        if self.is_zero() {
            return;
        }
        if s == 0 {
            *self = Self::zero();
            return;
        }
        let carry = limbs::mul_1_assign(&mut self.mag, s);
        if carry != 0 {
            self.mag.push(carry);
        }
    }

    /// `self * self` through the squaring dispatcher.
    pub fn sqr(&self) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let mut r = vec![0 as Limb; 2 * self.mag.len()];
        mul::sqr(&mut r, &self.mag);
        Self::from_mag(Sign::Plus, r)
    }

    /// Truncated quotient and remainder.  Fails on a zero divisor.
    pub fn div_rem(&self, other: &Self) -> Result<(Self, Self), Error> {
        if other.is_zero() {
            return Err(Error::DivisionByZero);
        }
        if self.is_zero() {
            return Ok((Self::zero(), Self::zero()));
        }
        let (q, r) = div_qr_vec(&self.mag, &other.mag);
        let q_sign = if self.sign == other.sign {
            Sign::Plus
        } else {
            Sign::Minus
        };
        Ok((Self::from_mag(q_sign, q), Self::from_mag(self.sign, r)))
    }

    /// Quotient, or `None` on a zero divisor.
    pub fn checked_div(&self, other: &Self) -> Option<Self> {
        self.div_rem(other).ok().map(|(q, _)| q)
    }

    /// Remainder, or `None` on a zero divisor.
    pub fn checked_rem(&self, other: &Self) -> Option<Self> {
        self.div_rem(other).ok().map(|(_, r)| r)
    }

    fn shl_bits(&self, k: u32) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let limb_off = (k / LIMB_BITS) as usize;
        let bit = k % LIMB_BITS;
        let n = self.mag.len();
        let mut r = vec![0 as Limb; n + limb_off + 1];
        let out = limbs::lshift(&mut r[limb_off..limb_off + n], &self.mag, bit);
        r[limb_off + n] = out;
        Self::from_mag(self.sign, r)
    }

    fn shr_bits(&self, k: u32) -> Self {
        let limb_off = (k / LIMB_BITS) as usize;
        let bit = k % LIMB_BITS;
        if limb_off >= self.mag.len() {
            return Self::zero();
        }
        let src = &self.mag[limb_off..];
        let mut r = vec![0 as Limb; src.len()];
        limbs::rshift(&mut r, src, bit);
        Self::from_mag(self.sign, r)
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Magnitude arithmetic
// ──────────────────────────────────────────────────────────────────────────────

fn add_mag(a: &[Limb], b: &[Limb]) -> Vec<Limb> {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut r = long.to_vec();
    let carry = limbs::add_n_assign(&mut r[..short.len()], short);
    let carry = limbs::add_1_assign(&mut r[short.len()..], carry);
    if carry != 0 {
        r.push(carry);
    }
    r
}

/// `a - b` for `a >= b`.
fn sub_mag(a: &[Limb], b: &[Limb]) -> Vec<Limb> {
    let mut r = a.to_vec();
    let borrow = limbs::sub_n_assign(&mut r[..b.len()], b);
    let borrow = limbs::sub_1_assign(&mut r[b.len()..], borrow);
    debug_assert_eq!(borrow, 0);
    r
}

/// `lhs + (rhs_sign, rhs_mag)`: shared by both addition and subtraction.
fn add_signed(lhs: &BigInt, rhs_sign: Sign, rhs_mag: &[Limb]) -> BigInt {
    if rhs_sign == Sign::NoSign {
        return lhs.clone();
    }
    if lhs.sign == Sign::NoSign {
        return BigInt::from_mag(rhs_sign, rhs_mag.to_vec());
    }
    if lhs.sign == rhs_sign {
        return BigInt::from_mag(lhs.sign, add_mag(&lhs.mag, rhs_mag));
    }
    match limbs::cmp(&lhs.mag, rhs_mag) {
        Ordering::Equal => BigInt::zero(),
        Ordering::Greater => BigInt::from_mag(lhs.sign, sub_mag(&lhs.mag, rhs_mag)),
        Ordering::Less => BigInt::from_mag(rhs_sign, sub_mag(rhs_mag, &lhs.mag)),
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Operators
// ──────────────────────────────────────────────────────────────────────────────

impl Add<&BigInt> for &BigInt {
    type Output = BigInt;
    fn add(self, rhs: &BigInt) -> BigInt {
        add_signed(self, rhs.sign, &rhs.mag)
    }
}

impl Sub<&BigInt> for &BigInt {
    type Output = BigInt;
    fn sub(self, rhs: &BigInt) -> BigInt {
        add_signed(self, rhs.sign.reverse(), &rhs.mag)
    }
}

impl Mul<&BigInt> for &BigInt {
    type Output = BigInt;
    fn mul(self, rhs: &BigInt) -> BigInt {
        if self.is_zero() || rhs.is_zero() {
            return BigInt::zero();
        }
        let mut r = vec![0 as Limb; self.mag.len() + rhs.mag.len()];
        mul::mul(&mut r, &self.mag, &rhs.mag);
        let sign = if self.sign == rhs.sign {
            Sign::Plus
        } else {
            Sign::Minus
        };
        BigInt::from_mag(sign, r)
    }
}

impl Div<&BigInt> for &BigInt {
    type Output = BigInt;
    fn div(self, rhs: &BigInt) -> BigInt {
        match self.div_rem(rhs) {
            Ok((q, _)) => q,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Rem<&BigInt> for &BigInt {
    type Output = BigInt;
    fn rem(self, rhs: &BigInt) -> BigInt {
        match self.div_rem(rhs) {
            Ok((_, r)) => r,
            Err(e) => panic!("{e}"),
        }
    }
}

macro_rules! forward_binop_variants {
    ($imp:ident, $method:ident) => {
        impl $imp<BigInt> for BigInt {
            type Output = BigInt;
            #[inline]
            fn $method(self, rhs: BigInt) -> BigInt {
                (&self).$method(&rhs)
            }
        }
        impl $imp<&BigInt> for BigInt {
            type Output = BigInt;
            #[inline]
            fn $method(self, rhs: &BigInt) -> BigInt {
                (&self).$method(rhs)
            }
        }
        impl $imp<BigInt> for &BigInt {
            type Output = BigInt;
            #[inline]
            fn $method(self, rhs: BigInt) -> BigInt {
                self.$method(&rhs)
            }
        }
    };
}

forward_binop_variants!(Add, add);
forward_binop_variants!(Sub, sub);
forward_binop_variants!(Mul, mul);
forward_binop_variants!(Div, div);
forward_binop_variants!(Rem, rem);

macro_rules! forward_assign {
    ($imp:ident, $method:ident, $op:ident) => {
        impl $imp<BigInt> for BigInt {
            #[inline]
            fn $method(&mut self, rhs: BigInt) {
                *self = (&*self).$op(&rhs);
            }
        }
        impl $imp<&BigInt> for BigInt {
            #[inline]
            fn $method(&mut self, rhs: &BigInt) {
                *self = (&*self).$op(rhs);
            }
        }
    };
}

forward_assign!(AddAssign, add_assign, add);
forward_assign!(SubAssign, sub_assign, sub);
forward_assign!(MulAssign, mul_assign, mul);
forward_assign!(DivAssign, div_assign, div);
forward_assign!(RemAssign, rem_assign, rem);

impl Neg for BigInt {
    type Output = BigInt;
    fn neg(mut self) -> BigInt {
        self.negate();
        self
    }
}

impl Neg for &BigInt {
    type Output = BigInt;
    fn neg(self) -> BigInt {
        let mut r = self.clone();
        r.negate();
        r
    }
}

impl Shl<u32> for &BigInt {
    type Output = BigInt;
    fn shl(self, k: u32) -> BigInt {
        self.shl_bits(k)
    }
}

impl Shl<u32> for BigInt {
    type Output = BigInt;
    fn shl(self, k: u32) -> BigInt {
        self.shl_bits(k)
    }
}

impl Shr<u32> for &BigInt {
    type Output = BigInt;
    fn shr(self, k: u32) -> BigInt {
        self.shr_bits(k)
    }
}

impl Shr<u32> for BigInt {
    type Output = BigInt;
    fn shr(self, k: u32) -> BigInt {
        self.shr_bits(k)
    }
}

impl ShlAssign<u32> for BigInt {
    fn shl_assign(&mut self, k: u32) {
        *self = self.shl_bits(k);
    }
}

impl ShrAssign<u32> for BigInt {
    fn shr_assign(&mut self, k: u32) {
        *self = self.shr_bits(k);
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.sign.cmp(&other.sign) {
            Ordering::Equal => match self.sign {
                Sign::NoSign => Ordering::Equal,
                Sign::Plus => limbs::cmp(&self.mag, &other.mag),
                Sign::Minus => limbs::cmp(&other.mag, &self.mag),
            },
            ord => ord,
        }
    }
}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Default for BigInt {
    fn default() -> Self {
        Self::zero()
    }
}

impl Sum for BigInt {
    fn sum<I: Iterator<Item = BigInt>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + x)
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Conversions and string I/O
// ──────────────────────────────────────────────────────────────────────────────

macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for BigInt {
            fn from(v: $t) -> Self {
                let mut mag = Vec::new();
                let mut v = v as u128;
                while v != 0 {
                    mag.push(v as Limb);
                    v >>= 64;
                }
                Self::from_mag(Sign::Plus, mag)
            }
        }
    )*};
}

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for BigInt {
            fn from(v: $t) -> Self {
                let sign = match v.cmp(&0) {
                    Ordering::Less => Sign::Minus,
                    Ordering::Equal => return Self::zero(),
                    Ordering::Greater => Sign::Plus,
                };
                let mut mag = Vec::new();
                let mut u = v.unsigned_abs() as u128;
                while u != 0 {
                    mag.push(u as Limb);
                    u >>= 64;
                }
                Self { sign, mag }
            }
        }
    )*};
}

from_unsigned!(u8, u16, u32, u64, u128, usize);
from_signed!(i8, i16, i32, i64, i128, isize);

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sign == Sign::Minus {
            f.write_str("-")?;
        }
        f.write_str(&radix::to_decimal(&self.mag))
    }
}

impl FromStr for BigInt {
    type Err = Error;

    /// Accepts `[+-]?[0-9]+`; anything else is a parse error.
    fn from_str(s: &str) -> Result<Self, Error> {
        let bytes = s.as_bytes();
        let (sign, digits) = match bytes.first() {
            Some(b'+') => (Sign::Plus, &bytes[1..]),
            Some(b'-') => (Sign::Minus, &bytes[1..]),
            _ => (Sign::Plus, bytes),
        };
        if digits.is_empty() || !digits.iter().all(|c| c.is_ascii_digit()) {
            return Err(Error::Parse);
        }
        Ok(Self::from_mag(sign, radix::from_decimal(digits)))
    }
}
