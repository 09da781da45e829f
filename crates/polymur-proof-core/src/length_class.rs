//! Worst-case models of each length-class branch.
//!
//! Every evaluator mirrors the arithmetic of one code path of the hash with
//! all inputs replaced by their maxima. Lane additions are 64-bit in the hash
//! and are checked as such; products and their sums are 128-bit.

use std::fmt;

use serde::Serialize;
use tracing::instrument;

use crate::bounds::{checked_add128, Bound, Ceiling};
use crate::maxima::{SymbolicMaxima, Trace};
use crate::params::{
    LARGE_MIN_LEN, LONG_MAX_LEN, MAX_H_INVARIANT, MEDIUM_MAX_LEN, SHORT_MAX_LEN,
};
use crate::Result;

/// Input-length partition; each class takes its own path through the hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthClass {
    /// 1 to 7 bytes, a single load.
    Short,
    /// 8 to 21 bytes, three windows.
    Medium,
    /// 22 to 49 bytes, seven windows.
    Long,
    /// 50 bytes and up, chunked accumulation then a short tail.
    Large,
}

impl LengthClass {
    pub const ALL: [LengthClass; 4] = [
        LengthClass::Short,
        LengthClass::Medium,
        LengthClass::Long,
        LengthClass::Large,
    ];

    /// Classes a large input's tail can fall into.
    pub const TAILS: [LengthClass; 3] = [LengthClass::Short, LengthClass::Medium, LengthClass::Long];

    /// Class of an input of `len` bytes. Empty input never reaches the
    /// polynomial.
    pub fn of(len: usize) -> Option<Self> {
        match len {
            0 => None,
            1..=SHORT_MAX_LEN => Some(LengthClass::Short),
            8..=MEDIUM_MAX_LEN => Some(LengthClass::Medium),
            22..=LONG_MAX_LEN => Some(LengthClass::Long),
            _ => Some(LengthClass::Large),
        }
    }

    pub fn min_len(self) -> usize {
        match self {
            LengthClass::Short => 1,
            LengthClass::Medium => SHORT_MAX_LEN + 1,
            LengthClass::Long => MEDIUM_MAX_LEN + 1,
            LengthClass::Large => LARGE_MIN_LEN,
        }
    }

    /// `None` for the unbounded large class.
    pub fn max_len(self) -> Option<usize> {
        match self {
            LengthClass::Short => Some(SHORT_MAX_LEN),
            LengthClass::Medium => Some(MEDIUM_MAX_LEN),
            LengthClass::Long => Some(LONG_MAX_LEN),
            LengthClass::Large => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LengthClass::Short => "1-7",
            LengthClass::Medium => "8-21",
            LengthClass::Long => "22-49",
            LengthClass::Large => "50+",
        }
    }

    /// Worst-case output of this class's branch, recording intermediate
    /// maxima in `trace`.
    pub fn evaluate(self, maxima: &SymbolicMaxima, trace: &mut Trace) -> Result<Bound> {
        match self {
            LengthClass::Short => short_branch(maxima, trace),
            LengthClass::Medium => medium_branch(maxima, trace),
            LengthClass::Long => long_branch(maxima, trace),
            LengthClass::Large => large_branch(maxima, trace),
        }
    }
}

impl fmt::Display for LengthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[instrument(skip_all, name = "branch_1_7")]
fn short_branch(mx: &SymbolicMaxima, trace: &mut Trace) -> Result<Bound> {
    let s = mx.k.add64(mx.m)?.mul128(mx.k2.add64(mx.l)?)?;
    let s = trace.record("s", s);
    Ok(trace.record("result", s.fold64()?))
}

#[instrument(skip_all, name = "branch_8_21")]
fn medium_branch(mx: &SymbolicMaxima, trace: &mut Trace) -> Result<Bound> {
    let k3 = trace.record("k3", mx.k.mul128(mx.k2)?.fold64()?);

    let t0 = trace.record("t0", mx.k2.add64(mx.m)?.mul128(mx.k7.add64(mx.m)?)?);
    let t1 = trace.record("t1", mx.k.add64(mx.m)?.mul128(k3.add64(mx.l)?)?);
    let s = trace.record("s", checked_add128(&[t0, t1])?);
    Ok(trace.record("result", s.fold64()?))
}

#[instrument(skip_all, name = "branch_22_49")]
fn long_branch(mx: &SymbolicMaxima, trace: &mut Trace) -> Result<Bound> {
    let k3 = trace.record("k3", mx.k.mul128(mx.k2)?.fold64()?);
    let k4 = trace.record("k4", mx.k2.mul128(mx.k2)?.fold64()?);

    // First-pair product folded early so it can feed the last product.
    let t0 = mx.k2.add64(mx.m)?.mul128(mx.k7.add64(mx.m)?)?;
    let t0r = trace.record("t0r", t0.fold64()?);

    let t1 = trace.record("t1", mx.k.add64(mx.m)?.mul128(k3.add64(mx.l)?)?);
    let t2 = trace.record("t2", mx.k2.add64(mx.m)?.mul128(mx.k7.add64(mx.m)?)?);
    let t3 = trace.record("t3", t0r.add64(mx.m)?.mul128(k4.add64(mx.m)?)?);
    let s = trace.record("s", checked_add128(&[t1, t2, t3])?);
    Ok(trace.record("result", s.fold64()?))
}

/// The chunk loop keeps `h <= max_h_invariant`, so `h + m` never overflows no
/// matter how many chunks follow. `k3..k6` are folded twice here; the shorter
/// classes fold once. Keep the depths as they are.
#[instrument(skip_all, name = "branch_large")]
fn large_branch(mx: &SymbolicMaxima, trace: &mut Trace) -> Result<Bound> {
    let k3 = trace.record("k3", mx.k.mul128(mx.k2)?.fold64()?.fold64()?);
    let k4 = trace.record("k4", mx.k2.mul128(mx.k2)?.fold64()?.fold64()?);
    let k5 = trace.record("k5", mx.k.mul128(k4)?.fold64()?.fold64()?);
    let k6 = trace.record("k6", mx.k2.mul128(k4)?.fold64()?.fold64()?);

    let t0 = trace.record("t0", mx.k.add64(mx.m)?.mul128(k6.add64(mx.m)?)?);
    let t1 = trace.record("t1", mx.k2.add64(mx.m)?.mul128(k5.add64(mx.m)?)?);
    let t2 = trace.record("t2", k3.add64(mx.m)?.mul128(k4.add64(mx.m)?)?);
    let t3 = trace.record("t3", mx.max_h_invariant.add64(mx.m)?.mul128(mx.k7)?);
    let s = trace.record("s", checked_add128(&[t0, t1, t2, t3])?);

    let h = s.fold64()?.within(Ceiling::Below(MAX_H_INVARIANT + 1))?;
    let h = trace.record("h", h);

    let k14 = trace.record("k14", mx.k7.mul128(mx.k7)?.fold64()?);
    let hk14 = trace.record("hk14", h.fold64()?.mul128(k14)?.fold64()?);
    Ok(trace.record("result", hk14.fold64()?))
}
