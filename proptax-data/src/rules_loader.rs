//! Loader for rule configuration files.
//!
//! Rules can be written as TOML or JSON; the format is chosen from the file
//! extension. Every loaded configuration is validated before it is returned,
//! so callers never see a structurally invalid rule set.

use std::path::{Path, PathBuf};

use proptax_core::{RuleConfigError, RuleConfiguration};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading a rule configuration.
#[derive(Debug, Error)]
pub enum RuleLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported rules file extension '{0}' (expected .toml or .json)")]
    UnsupportedFormat(String),

    #[error("invalid rule configuration: {0}")]
    Invalid(#[from] RuleConfigError),
}

/// Serialization format of a rules file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFormat {
    Toml,
    Json,
}

impl RuleFormat {
    /// Picks the format from the file extension, ignoring case.
    pub fn from_path(path: &Path) -> Result<Self, RuleLoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match ext.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(RuleLoadError::UnsupportedFormat(ext)),
        }
    }
}

/// Loader for [`RuleConfiguration`] files.
pub struct RuleLoader;

impl RuleLoader {
    /// Parses and validates a TOML rule configuration.
    pub fn parse_toml(input: &str) -> Result<RuleConfiguration, RuleLoadError> {
        let rules: RuleConfiguration = toml::from_str(input)?;
        Self::validated(rules)
    }

    /// Parses and validates a JSON rule configuration.
    pub fn parse_json(input: &str) -> Result<RuleConfiguration, RuleLoadError> {
        let rules: RuleConfiguration = serde_json::from_str(input)?;
        Self::validated(rules)
    }

    pub fn parse(
        input: &str,
        format: RuleFormat,
    ) -> Result<RuleConfiguration, RuleLoadError> {
        match format {
            RuleFormat::Toml => Self::parse_toml(input),
            RuleFormat::Json => Self::parse_json(input),
        }
    }

    /// Reads `path` and parses it in the format its extension names.
    pub fn load_from_file(path: &Path) -> Result<RuleConfiguration, RuleLoadError> {
        let format = RuleFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path).map_err(|source| RuleLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let rules = Self::parse(&contents, format)?;
        info!(
            path = %path.display(),
            tax_rates = rules.tax_rates.len(),
            salt_years = rules.salt_caps.len(),
            "rule configuration loaded"
        );
        Ok(rules)
    }

    fn validated(rules: RuleConfiguration) -> Result<RuleConfiguration, RuleLoadError> {
        rules.validate()?;
        debug!(estimate_year = %rules.estimate_year, "rule configuration validated");
        Ok(rules)
    }
}
