//! Subcommand implementations.

pub mod bounds;
pub mod coverage;
pub mod verify;

use anyhow::{Context, Result};
use clap::ValueEnum;
use polymur_proof_core::{ProofConfig, ProofReport};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Load the config file if one was given, else defaults; the environment
/// applies on top either way.
pub fn load_config(path: Option<PathBuf>) -> Result<ProofConfig> {
    match path {
        Some(path) => ProofConfig::from_file(&path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => ProofConfig::from_env().context("loading config from environment"),
    }
}

/// Run `config` and print the report.
pub fn run_and_print(config: &ProofConfig, format: OutputFormat) -> Result<()> {
    let report = polymur_proof_core::run_all(config).context("design proof failed")?;
    print_report(&report, format)
}

fn print_report(report: &ProofReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            print!("{report}");
            println!("All enabled proofs passed.");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_only_run_succeeds() {
        let config = ProofConfig {
            coverage: false,
            ..ProofConfig::default()
        };
        assert!(run_and_print(&config, OutputFormat::Json).is_ok());
    }

    #[test]
    fn missing_config_file_reports_path() {
        let err = load_config(Some(PathBuf::from("/nonexistent/polymur.json"))).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/polymur.json"));
    }
}
