//! Literal parameters shared with the hash implementation.
//!
//! The proofs are only as good as these constants. If the hash changes any of
//! them (lane mask, chunk size, key acceptance limit) the proofs silently stop
//! describing it, so [`check_contract`] at least pins down how the constants
//! relate to each other.

use crate::{ProofError, Result};

/// The Mersenne prime `2^61 - 1`.
pub const P611: u64 = (1 << 61) - 1;

/// Bytes read by one masked or shifted window.
pub const WINDOW_LEN: usize = 7;

/// Masked windows read per chunk of the large-input loop.
pub const WINDOWS_PER_CHUNK: usize = 7;

/// Mask applied to every 8-byte load, keeping `WINDOW_LEN` bytes (`m`).
pub const LANE_MASK: u64 = 0x00ff_ffff_ffff_ffff;

/// Bytes consumed per iteration of the large-input loop (`l`).
///
/// Also the largest length a short branch ever sees, which is why the
/// length term of the short branches is bounded by it.
pub const CHUNK_LEN: u64 = 49;

/// Key generation retries until `k^7 < K7_ACCEPT_LIMIT`.
pub const K7_ACCEPT_LIMIT: u64 = (1 << 60) - (1 << 56);

/// Largest `k^7` a key can have (`2^60 - 2^56 - 1`).
pub const K7_MAX: u64 = K7_ACCEPT_LIMIT - 1;

/// Ceiling minus one for the large-input accumulator: `2^64 - m - 1`.
///
/// Each chunk adds at most `m` to `h` before the multiply, so keeping
/// `h <= MAX_H_INVARIANT` keeps `h + m` inside 64 bits for any number of chunks.
pub const MAX_H_INVARIANT: u64 = u64::MAX - LANE_MASK;

/// Largest length handled by the single-load branch.
pub const SHORT_MAX_LEN: usize = 7;

/// Largest length handled by the three-window branch.
pub const MEDIUM_MAX_LEN: usize = 21;

/// Largest length handled by the seven-window branch.
pub const LONG_MAX_LEN: usize = 49;

/// Smallest length that enters the chunk loop.
pub const LARGE_MIN_LEN: usize = 50;

/// Check that the literal constants agree with each other.
pub fn check_contract() -> Result<()> {
    let checks: [(&str, bool); 7] = [
        ("P611 == 2^61 - 1", u128::from(P611) == (1u128 << 61) - 1),
        (
            "LANE_MASK keeps exactly WINDOW_LEN bytes",
            u128::from(LANE_MASK) == (1u128 << (8 * WINDOW_LEN)) - 1,
        ),
        (
            "CHUNK_LEN == WINDOW_LEN * WINDOWS_PER_CHUNK",
            CHUNK_LEN == (WINDOW_LEN * WINDOWS_PER_CHUNK) as u64,
        ),
        ("LONG_MAX_LEN == CHUNK_LEN", LONG_MAX_LEN as u64 == CHUNK_LEN),
        ("LARGE_MIN_LEN == LONG_MAX_LEN + 1", LARGE_MIN_LEN == LONG_MAX_LEN + 1),
        (
            "K7_MAX is the largest accepted k^7 and a field element",
            K7_MAX.checked_add(1) == Some(K7_ACCEPT_LIMIT) && K7_MAX < P611,
        ),
        (
            "MAX_H_INVARIANT + LANE_MASK == 2^64 - 1",
            MAX_H_INVARIANT.checked_add(LANE_MASK) == Some(u64::MAX),
        ),
    ];

    for (name, holds) in checks {
        if !holds {
            return Err(ProofError::ContractViolation(name.into()));
        }
    }
    Ok(())
}
