//! Arbitrary-precision signed integers.
//!
//! The crate is layered the way multi-precision libraries usually are:
//!
//! - [`limbs`]: carry-propagating primitives on little-endian `u64` limb
//!   slices (add, subtract, shift, compare, scalar multiply/divide);
//! - [`mul`]: basecase and Karatsuba products plus the dispatcher that
//!   hands large operands to the NTT convolution engine (`zint-ntt`);
//! - [`div`]: schoolbook long division with normalization and 2-by-1
//!   quotient estimation;
//! - [`radix`]: decimal formatting and parsing, divide-and-conquer above a
//!   size threshold;
//! - [`BigInt`]: the sign-magnitude value type tying it together, with
//!   operators, total ordering, and decimal string I/O.
//!
//! ```
//! use zint::BigInt;
//!
//! let a: BigInt = "12345678901234567890".parse().unwrap();
//! let b: BigInt = "98765432109876543210".parse().unwrap();
//! assert_eq!(
//!     (&a * &b).to_string(),
//!     "1219326311370217952237463801111263526900"
//! );
//! ```

pub mod div;
pub mod limbs;
pub mod mul;
pub mod radix;

mod bigint;
mod error;

pub use bigint::{BigInt, Sign};
pub use error::Error;
