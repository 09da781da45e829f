//! Named worst-case scalars.
//!
//! Each maximum bounds what one lane of the hash can hold after a known
//! sequence of operations. They are derived bottom-up from the key limits, so
//! the definitions read in dependency order and cannot refer to something not
//! yet bounded.

use serde::Serialize;
use tracing::debug;

use crate::bounds::{Bound, Ceiling};
use crate::params::{CHUNK_LEN, K7_MAX, LANE_MASK, MAX_H_INVARIANT};
use crate::Result;

/// A bound recorded under the name it has in the hash.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NamedBound {
    pub name: String,
    pub value: u128,
    pub log2: f64,
    pub ceiling: Ceiling,
}

/// Ordered record of the named bounds derived during one proof step.
#[derive(Clone, Debug, Default)]
pub struct Trace {
    entries: Vec<NamedBound>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `bound` under `name` and hand it back.
    pub fn record(&mut self, name: &str, bound: Bound) -> Bound {
        debug!(
            maximum = name,
            value = %bound.value(),
            log2 = bound.log2(),
            "derived maximum"
        );
        self.entries.push(NamedBound {
            name: name.to_string(),
            value: bound.value(),
            log2: bound.log2(),
            ceiling: bound.ceiling(),
        });
        bound
    }

    pub fn get(&self, name: &str) -> Option<&NamedBound> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn entries(&self) -> &[NamedBound] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<NamedBound> {
        self.entries
    }
}

/// Maxima shared by every length class.
///
/// `k` and `k2` start from the widest key a seed can produce. The per-class
/// maxima (`k3` and up) are derived by each class from these, since the
/// classes fold them to different depths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolicMaxima {
    pub k: Bound,
    pub k2: Bound,
    pub k7: Bound,
    /// Largest masked 7-byte load.
    pub m: Bound,
    /// Largest length a short branch sees.
    pub l: Bound,
    pub max_h_invariant: Bound,
}

impl SymbolicMaxima {
    pub fn derive(trace: &mut Trace) -> Result<Self> {
        let k = Bound::word(u64::MAX).fold64()?.fold64()?;
        let k = trace.record("k", k);
        let k2 = k.mul128(k)?.fold64()?.fold64()?;
        let k2 = trace.record("k2", k2);
        let k7 = trace.record("k7", Bound::word(K7_MAX));
        let m = trace.record("m", Bound::word(LANE_MASK));
        let l = trace.record("l", Bound::word(CHUNK_LEN));
        let max_h_invariant = trace.record("max_h_invariant", Bound::word(MAX_H_INVARIANT));

        Ok(Self {
            k,
            k2,
            k7,
            m,
            l,
            max_h_invariant,
        })
    }
}
