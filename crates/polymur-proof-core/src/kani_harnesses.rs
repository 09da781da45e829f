//! Kani harnesses for the fold bound.
//!
//! Run with: cargo kani -p polymur-proof-core

use crate::bounds::{fold, max_fold_bound};

#[kani::proof]
fn max_fold_bound_is_sound_for_u64() {
    let n: u64 = kani::any();
    let x: u64 = kani::any();
    kani::assume(x <= n);
    assert!(fold(x as u128) <= max_fold_bound(n as u128));
}

#[kani::proof]
fn max_fold_bound_is_attained_for_u64() {
    let n: u64 = kani::any();
    let bound = max_fold_bound(n as u128);
    let below = ((n as u128) >> 61) << 61;
    let attained = fold(n as u128) == bound || (below > 0 && fold(below - 1) == bound);
    assert!(attained);
}

#[kani::proof]
fn fold_of_u128_stays_in_u68() {
    let n: u128 = kani::any();
    assert!(fold(n) < 1u128 << 68);
}
