//! `polymur-proof bounds` - constant contract and bound propagation only.

use anyhow::Result;
use polymur_proof_core::ProofConfig;

use super::{run_and_print, OutputFormat};

pub fn run(config: ProofConfig, format: OutputFormat) -> Result<()> {
    let config = ProofConfig {
        bounds: true,
        coverage: false,
        ..config
    };
    run_and_print(&config, format)
}
