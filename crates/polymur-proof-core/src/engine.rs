//! Bound propagation across all length classes.

use serde::Serialize;
use tracing::{info, instrument};

use crate::bounds::{checked_add64, Bound};
use crate::length_class::LengthClass;
use crate::maxima::{NamedBound, SymbolicMaxima, Trace};
use crate::Result;

/// Worst-case output of one branch plus the maxima derived on the way.
#[derive(Clone, Debug, Serialize)]
pub struct BranchBound {
    pub class: LengthClass,
    pub label: &'static str,
    pub bound: NamedBound,
    pub terms: Vec<NamedBound>,
}

/// Everything the bound proof derived.
#[derive(Clone, Debug, Serialize)]
pub struct BoundsProof {
    pub maxima: Vec<NamedBound>,
    pub branches: Vec<BranchBound>,
    /// `large + short` for each tail class.
    pub finalization: Vec<NamedBound>,
}

impl BoundsProof {
    pub fn branch(&self, class: LengthClass) -> Option<&BranchBound> {
        self.branches.iter().find(|b| b.class == class)
    }
}

/// Prove that no branch overflows and that the large accumulator can be
/// combined with any tail branch.
#[instrument]
pub fn prove_bounds() -> Result<BoundsProof> {
    let mut base = Trace::new();
    let maxima = SymbolicMaxima::derive(&mut base)?;

    let mut branches = Vec::with_capacity(LengthClass::ALL.len());
    let mut results: Vec<(LengthClass, Bound)> = Vec::with_capacity(LengthClass::ALL.len());
    for class in LengthClass::ALL {
        let mut trace = Trace::new();
        let bound = class.evaluate(&maxima, &mut trace)?;
        let mut terms = trace.into_entries();
        // The evaluator records its output last, under "result".
        let mut summary = terms.pop().unwrap_or_else(|| named(class.label(), bound));
        summary.name = class.label().to_string();
        results.push((class, bound));
        branches.push(BranchBound {
            class,
            label: class.label(),
            bound: summary,
            terms,
        });
    }

    let large = results
        .iter()
        .find(|(class, _)| *class == LengthClass::Large)
        .map(|(_, bound)| *bound)
        .ok_or_else(|| crate::ProofError::ContractViolation("large class not evaluated".into()))?;

    let mut finalization = Vec::with_capacity(LengthClass::TAILS.len());
    for (class, bound) in results.iter().filter(|(c, _)| LengthClass::TAILS.contains(c)) {
        let total = checked_add64(&[large, *bound])?;
        finalization.push(named(&format!("50+ then {class}"), total));
    }

    info!(
        branches = branches.len(),
        finalization = finalization.len(),
        "bound proof complete"
    );

    Ok(BoundsProof {
        maxima: base.into_entries(),
        branches,
        finalization,
    })
}

fn named(name: &str, bound: Bound) -> NamedBound {
    NamedBound {
        name: name.to_string(),
        value: bound.value(),
        log2: bound.log2(),
        ceiling: bound.ceiling(),
    }
}
