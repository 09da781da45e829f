//! polymur-proof - design proofs for the PolyMur hash
//!
//! Runs the overflow and byte-coverage proofs once and exits non-zero on the
//! first violated invariant.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::OutputFormat;

/// PolyMur design proofs
///
/// Proves that no length class of the hash overflows its 64/128-bit machine words
/// and that every input byte is read, for every modeled length.
#[derive(Parser)]
#[command(name = "polymur-proof")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (JSON)
    #[arg(short, long, global = true, env = "POLYMUR_PROOF_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every enabled proof (default)
    Verify {
        /// Output format (human, json)
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },

    /// Run the bound-propagation proof and print every named maximum
    Bounds {
        /// Output format (human, json)
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },

    /// Run the coverage proof and print the per-range summary
    Coverage {
        /// Output format (human, json)
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,

        /// Upper end of the large-length range (overrides config)
        #[arg(long)]
        large_max_length: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = commands::load_config(cli.config)?;

    // Initialize logging
    let filter = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_level.clone().unwrap_or_else(|| "info".into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Verify {
        format: OutputFormat::Human,
    }) {
        Commands::Verify { format } => commands::verify::run(config, format),
        Commands::Bounds { format } => commands::bounds::run(config, format),
        Commands::Coverage {
            format,
            large_max_length,
        } => commands::coverage::run(config, format, large_max_length),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_defaults_to_verify() {
        let cli = Cli::try_parse_from(["polymur-proof"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn coverage_accepts_range_override() {
        let cli = Cli::try_parse_from([
            "polymur-proof",
            "coverage",
            "--format",
            "json",
            "--large-max-length",
            "500",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Coverage {
                format,
                large_max_length,
            }) => {
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(large_max_length, Some(500));
            }
            _ => panic!("expected coverage subcommand"),
        }
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["polymur-proof", "verify", "--format", "xml"]).is_err());
    }
}
