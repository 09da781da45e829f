//! `polymur-proof coverage` - byte-coverage proof only.

use anyhow::Result;
use polymur_proof_core::ProofConfig;

use super::{run_and_print, OutputFormat};

pub fn run(
    config: ProofConfig,
    format: OutputFormat,
    large_max_length: Option<usize>,
) -> Result<()> {
    let config = ProofConfig {
        bounds: false,
        coverage: true,
        large_max_length: large_max_length.unwrap_or(config.large_max_length),
        ..config
    };
    run_and_print(&config, format)
}
