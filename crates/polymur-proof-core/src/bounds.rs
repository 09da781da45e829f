//! Checked arithmetic over worst-case magnitudes.
//!
//! A [`Bound`] is an upper bound on some lane of the hash, never an exact
//! value. Every operation here moves bounds upward only, and every result is
//! checked against the ceiling of the machine word it has to live in. Sums and
//! products are evaluated with arbitrary precision so an overflow can be
//! reported exactly, even past 128 bits.

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};
use serde::Serialize;
use tracing::warn;

use crate::params::P611;
use crate::{ProofError, Result};

const FOLD_SHIFT: u32 = 61;
const FOLD_MODULUS: u128 = 1 << FOLD_SHIFT;
const P611_WIDE: u128 = P611 as u128;

/// Exclusive upper limit a [`Bound`] must stay under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ceiling {
    /// `2^64`
    U64,
    /// `2^128`
    U128,
    /// A strict limit tighter than `2^64`.
    Below(u64),
}

impl Ceiling {
    pub fn limit(self) -> BigUint {
        match self {
            Ceiling::U64 => BigUint::one() << 64u32,
            Ceiling::U128 => BigUint::one() << 128u32,
            Ceiling::Below(limit) => BigUint::from(limit),
        }
    }

    pub fn log2(self) -> f64 {
        log2(&self.limit())
    }
}

/// A worst-case value together with the ceiling it was checked against.
///
/// Invariant: `value < ceiling`. The only way to build one is through a check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Bound {
    value: u128,
    ceiling: Ceiling,
}

impl Bound {
    pub fn new(value: impl Into<u128>, ceiling: Ceiling) -> Result<Self> {
        check(BigUint::from(value.into()), ceiling)
    }

    /// A literal 64-bit constant. Always fits.
    pub const fn word(value: u64) -> Self {
        Self {
            value: value as u128,
            ceiling: Ceiling::U64,
        }
    }

    pub fn value(self) -> u128 {
        self.value
    }

    pub fn ceiling(self) -> Ceiling {
        self.ceiling
    }

    pub fn log2(self) -> f64 {
        log2(&BigUint::from(self.value))
    }

    /// Re-check this bound against a different (usually tighter) ceiling.
    pub fn within(self, ceiling: Ceiling) -> Result<Self> {
        Self::new(self.value, ceiling)
    }

    pub fn add64(self, rhs: Bound) -> Result<Self> {
        checked_add64(&[self, rhs])
    }

    pub fn mul128(self, rhs: Bound) -> Result<Self> {
        checked_mul128(self, rhs)
    }

    pub fn fold64(self) -> Result<Self> {
        checked_fold64(self)
    }
}

impl From<Bound> for u128 {
    fn from(bound: Bound) -> Self {
        bound.value
    }
}

/// Sum of `terms`; fails unless the sum is below `2^64`.
pub fn checked_add64(terms: &[Bound]) -> Result<Bound> {
    check(sum(terms), Ceiling::U64)
}

/// Sum of `terms`; fails unless the sum is below `2^128`.
pub fn checked_add128(terms: &[Bound]) -> Result<Bound> {
    check(sum(terms), Ceiling::U128)
}

/// Product of `a` and `b`; fails unless the product is below `2^128`.
pub fn checked_mul128(a: Bound, b: Bound) -> Result<Bound> {
    check(BigUint::from(a.value) * BigUint::from(b.value), Ceiling::U128)
}

/// `n div 2^61 + n mod 2^61`.
pub fn fold(n: u128) -> u128 {
    (n >> FOLD_SHIFT) + (n & (FOLD_MODULUS - 1))
}

/// Upper bound on `fold(x)` over every `x <= n`.
///
/// Callers only ever hold an upper bound on a lane, so the bound has to hold
/// for all smaller inputs as well, not just `n`. Below `2^61` the fold is the
/// identity. Otherwise the largest low part reachable is `P611`: at `n` itself
/// when `n mod 2^61 == P611`, else one multiple of `2^61` lower, which costs
/// one in the high part. The comparisons must stay exactly as written.
pub fn max_fold_bound(n: u128) -> u128 {
    if n < FOLD_MODULUS {
        return n;
    }
    if n % FOLD_MODULUS == P611_WIDE {
        return (n >> FOLD_SHIFT) + P611_WIDE;
    }
    ((n >> FOLD_SHIFT) - 1) + P611_WIDE
}

/// Worst-case fold of `x`, which must itself fit in 64 bits.
pub fn checked_fold64(x: Bound) -> Result<Bound> {
    check(BigUint::from(max_fold_bound(x.value)), Ceiling::U64)
}

fn sum(terms: &[Bound]) -> BigUint {
    terms.iter().map(|t| BigUint::from(t.value)).sum()
}

fn check(value: BigUint, ceiling: Ceiling) -> Result<Bound> {
    match value.to_u128() {
        Some(v) if value < ceiling.limit() => Ok(Bound { value: v, ceiling }),
        _ => {
            let value_log2 = log2(&value);
            let ceiling_log2 = ceiling.log2();
            warn!(%value, value_log2, ceiling_log2, "bound exceeds its ceiling");
            Err(ProofError::MagnitudeExceeded {
                value,
                value_log2,
                ceiling_log2,
            })
        }
    }
}

fn log2(value: &BigUint) -> f64 {
    value.to_f64().map_or(f64::INFINITY, f64::log2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TWO_61: u128 = 1 << 61;

    fn u128_bound(value: u128) -> Bound {
        Bound::new(value, Ceiling::U128).unwrap()
    }

    /// Largest fold over `[0, n]`: either `n` itself or the last value before
    /// `n`'s multiple of `2^61`, whose low part is all ones.
    fn brute_max_fold(n: u128) -> u128 {
        let below = (n >> 61) << 61;
        if below == 0 {
            fold(n)
        } else {
            fold(n).max(fold(below - 1))
        }
    }

    #[test]
    fn fold_splits_at_bit_61() {
        assert_eq!(fold(0), 0);
        assert_eq!(fold(P611_WIDE), P611_WIDE);
        assert_eq!(fold(TWO_61), 1);
        assert_eq!(fold((5 << 61) + 3), 8);
    }

    #[test]
    fn max_fold_bound_case_split() {
        // n < 2^61
        assert_eq!(max_fold_bound(0), 0);
        assert_eq!(max_fold_bound(P611_WIDE), P611_WIDE);
        // low part exactly P611
        assert_eq!(max_fold_bound(2 * TWO_61 - 1), 1 + P611_WIDE);
        // anything else steps down one multiple
        assert_eq!(max_fold_bound(TWO_61), P611_WIDE);
        assert_eq!(max_fold_bound(3 * TWO_61 + 5), 2 + P611_WIDE);
    }

    #[test]
    fn max_fold_bound_is_sound_and_tight_over_small_inputs() {
        for n in 0..4096u128 {
            let bound = max_fold_bound(n);
            assert!((0..=n).all(|x| fold(x) <= bound));
            assert_eq!(bound, brute_max_fold(n));
        }
    }

    #[test]
    fn max_fold_bound_around_each_multiple() {
        for hi in 1..64u128 {
            for delta in 0..64u128 {
                for n in [hi * TWO_61 + delta, hi * TWO_61 - 1 - delta] {
                    assert_eq!(max_fold_bound(n), brute_max_fold(n), "n = {n}");
                }
            }
        }
    }

    #[test]
    fn add128_overflow_at_exactly_two_to_128() {
        let half = u128_bound(1 << 127);
        let err = checked_add128(&[half, half]).unwrap_err();
        match err {
            ProofError::MagnitudeExceeded {
                value,
                value_log2,
                ceiling_log2,
            } => {
                assert_eq!(value, BigUint::one() << 128u32);
                assert!((value_log2 - 128.0).abs() < 1e-9);
                assert!((ceiling_log2 - 128.0).abs() < 1e-9);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn add64_boundary() {
        let max = Bound::word(u64::MAX);
        assert_eq!(checked_add64(&[max]).unwrap().value(), u64::MAX as u128);
        assert!(checked_add64(&[max, Bound::word(1)]).is_err());
        assert_eq!(checked_add64(&[]).unwrap().value(), 0);
    }

    #[test]
    fn mul128_boundary() {
        let max = Bound::word(u64::MAX);
        let square = checked_mul128(max, max).unwrap();
        assert_eq!(square.value(), (u64::MAX as u128) * (u64::MAX as u128));
        assert!(checked_mul128(u128_bound(1 << 64), u128_bound(1 << 64)).is_err());
    }

    #[test]
    fn within_tightens() {
        let b = Bound::word(100);
        assert!(b.within(Ceiling::Below(101)).is_ok());
        assert!(b.within(Ceiling::Below(100)).is_err());
    }

    #[test]
    fn fold64_of_u64_max_chain() {
        let k = Bound::word(u64::MAX).fold64().unwrap().fold64().unwrap();
        assert_eq!(k.value(), P611_WIDE);
        assert!(k.value() < TWO_61 + 8);
    }

    proptest! {
        #[test]
        fn max_fold_bound_is_sound(n in any::<u128>(), d in any::<u128>()) {
            let n = n >> 3;
            let x = n - (d % (n + 1));
            prop_assert!(fold(x) <= max_fold_bound(n));
        }

        #[test]
        fn max_fold_bound_is_tight(n in any::<u128>()) {
            let n = n >> 3;
            prop_assert_eq!(max_fold_bound(n), brute_max_fold(n));
        }

        #[test]
        fn max_fold_bound_is_monotone(a in any::<u64>(), b in any::<u64>()) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(max_fold_bound(lo as u128) <= max_fold_bound(hi as u128));
        }
    }
}
