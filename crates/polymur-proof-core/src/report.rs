//! Running the proofs and summarizing what they established.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::config::ProofConfig;
use crate::coverage::{prove_coverage, RangeCoverage};
use crate::engine::{prove_bounds, BoundsProof};
use crate::params::check_contract;
use crate::Result;

/// Outcome of a successful run. Skipped proofs are `None`.
#[derive(Clone, Debug, Serialize)]
pub struct ProofReport {
    pub bounds: Option<BoundsProof>,
    pub coverage: Option<Vec<RangeCoverage>>,
}

/// Run every proof enabled in `config`, stopping at the first failure.
pub fn run_all(config: &ProofConfig) -> Result<ProofReport> {
    config.validate()?;

    let bounds = if config.bounds {
        check_contract()?;
        Some(prove_bounds()?)
    } else {
        None
    };

    let coverage = if config.coverage {
        Some(prove_coverage(config.large_max_length)?)
    } else {
        None
    };

    info!(
        bounds = bounds.is_some(),
        coverage = coverage.is_some(),
        "all enabled proofs passed"
    );
    Ok(ProofReport { bounds, coverage })
}

impl fmt::Display for ProofReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref bounds) = self.bounds {
            writeln!(f, "Symbolic maxima")?;
            for m in &bounds.maxima {
                writeln!(f, "  {:<16} {:>40}  log2 {:>8.4}", m.name, m.value, m.log2)?;
            }
            writeln!(f, "Branch bounds")?;
            for b in &bounds.branches {
                writeln!(
                    f,
                    "  {:<16} {:>40}  log2 {:>8.4}",
                    b.label, b.bound.value, b.bound.log2
                )?;
                for t in &b.terms {
                    writeln!(f, "    {:<14} {:>40}  log2 {:>8.4}", t.name, t.value, t.log2)?;
                }
            }
            writeln!(f, "Finalization")?;
            for s in &bounds.finalization {
                writeln!(f, "  {:<16} {:>40}  log2 {:>8.4}", s.name, s.value, s.log2)?;
            }
        }
        if let Some(ref ranges) = self.coverage {
            writeln!(f, "Coverage")?;
            for r in ranges {
                writeln!(
                    f,
                    "  {:<6} lengths {}..={}: {} proven, up to {} windows",
                    r.name, r.first, r.last, r.lengths_proven, r.max_windows
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_run_passes() {
        let report = run_all(&ProofConfig::default()).unwrap();
        assert!(report.bounds.is_some());
        assert_eq!(report.coverage.map(|c| c.len()), Some(4));
    }

    #[test]
    fn skipped_proofs_are_absent() {
        let config = ProofConfig::builder().bounds(false).build().unwrap();
        let report = run_all(&config).unwrap();
        assert!(report.bounds.is_none());
        assert!(report.coverage.is_some());
    }

    #[test]
    fn invalid_config_fails_before_running() {
        let config = ProofConfig {
            large_max_length: 3,
            ..ProofConfig::default()
        };
        assert!(matches!(run_all(&config), Err(crate::ProofError::ConfigError(_))));
    }

    #[test]
    fn human_report_lists_every_section() {
        let text = run_all(&ProofConfig::default()).unwrap().to_string();
        for heading in ["Symbolic maxima", "Branch bounds", "Finalization", "Coverage"] {
            assert!(text.contains(heading), "missing {heading}");
        }
        assert!(text.contains("max_h_invariant"));
        assert!(text.contains("50+ then 22-49"));
    }

    #[test]
    fn json_report_serializes() {
        let report = run_all(&ProofConfig::default()).unwrap();
        // Products exceed u64, so go through text rather than `to_value`.
        let text = serde_json::to_string(&report).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["coverage"][0]["name"], "1-7");
        assert_eq!(json["bounds"]["branches"][3]["class"], "large");
    }
}
