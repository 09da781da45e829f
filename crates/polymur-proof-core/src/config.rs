//! Configuration for a proof run.
//!
//! # Configuration Sources
//!
//! Applied in order, later sources overriding earlier ones:
//! - Programmatic defaults
//! - A JSON file ([`ProofConfig::from_file`])
//! - Environment variables prefixed with `POLYMUR_PROOF_` ([`ProofConfig::apply_env`])
//!
//! # Example
//!
//! ```rust,ignore
//! use polymur_proof_core::config::ProofConfig;
//!
//! let config = ProofConfig::builder()
//!     .coverage(false)
//!     .build()?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::params::LARGE_MIN_LEN;
use crate::{ProofError, Result};

/// Hard cap on the large-length coverage range. Proof time grows
/// quadratically with it.
pub const MAX_LARGE_COVERAGE_LEN: usize = 10_000;

/// Default upper end of the large-length coverage range: enough to see four
/// full chunks followed by every tail length.
pub const DEFAULT_LARGE_MAX_LENGTH: usize = 246;

/// Which proofs to run and how far to take the large-length coverage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofConfig {
    /// Run the constant contract and the bound-propagation proof.
    pub bounds: bool,

    /// Run the coverage proof.
    pub coverage: bool,

    /// Upper end of the large-length coverage range (inclusive).
    pub large_max_length: usize,

    /// Logging level (trace, debug, info, warn, error).
    pub log_level: Option<String>,
}

impl Default for ProofConfig {
    fn default() -> Self {
        Self {
            bounds: true,
            coverage: true,
            large_max_length: DEFAULT_LARGE_MAX_LENGTH,
            log_level: None,
        }
    }
}

impl ProofConfig {
    pub fn builder() -> ProofConfigBuilder {
        ProofConfigBuilder::default()
    }

    /// Defaults overridden by the environment.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file, then apply the environment on top.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProofError::ConfigError(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let mut config: Self = serde_json::from_str(&content).map_err(|e| {
            ProofError::ConfigError(format!("Invalid config {}: {}", path.display(), e))
        })?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from variables prefixed with `POLYMUR_PROOF_`:
    /// - `POLYMUR_PROOF_LARGE_MAX_LENGTH`
    /// - `POLYMUR_PROOF_LOG_LEVEL`
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(len) = std::env::var("POLYMUR_PROOF_LARGE_MAX_LENGTH") {
            self.large_max_length = len.parse().map_err(|e| {
                ProofError::ConfigError(format!("Invalid POLYMUR_PROOF_LARGE_MAX_LENGTH: {}", e))
            })?;
        }

        if let Ok(level) = std::env::var("POLYMUR_PROOF_LOG_LEVEL") {
            self.log_level = Some(level);
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(LARGE_MIN_LEN..=MAX_LARGE_COVERAGE_LEN).contains(&self.large_max_length) {
            return Err(ProofError::ConfigError(format!(
                "large_max_length must be between {} and {}, got {}",
                LARGE_MIN_LEN, MAX_LARGE_COVERAGE_LEN, self.large_max_length
            )));
        }

        if let Some(ref level) = self.log_level {
            if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
                return Err(ProofError::ConfigError(format!(
                    "log_level must be one of trace, debug, info, warn, error; got {:?}",
                    level
                )));
            }
        }

        Ok(())
    }
}

/// Builder for [`ProofConfig`].
#[derive(Default)]
pub struct ProofConfigBuilder {
    config: ProofConfig,
}

impl ProofConfigBuilder {
    pub fn bounds(mut self, enabled: bool) -> Self {
        self.config.bounds = enabled;
        self
    }

    pub fn coverage(mut self, enabled: bool) -> Self {
        self.config.coverage = enabled;
        self
    }

    pub fn large_max_length(mut self, len: usize) -> Self {
        self.config.large_max_length = len;
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.log_level = Some(level.into());
        self
    }

    pub fn build(self) -> Result<ProofConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
