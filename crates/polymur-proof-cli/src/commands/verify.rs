//! `polymur-proof verify` - run every enabled proof.

use anyhow::Result;
use polymur_proof_core::ProofConfig;

use super::{run_and_print, OutputFormat};

pub fn run(config: ProofConfig, format: OutputFormat) -> Result<()> {
    run_and_print(&config, format)
}
