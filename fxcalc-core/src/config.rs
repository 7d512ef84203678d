//! Serializable calculator configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no
//! file at all) yields the stock behaviour:
//!
//! ```toml
//! [sizing]
//! risk_tolerance = 0.99
//! degenerate_units = 100
//! pip_policy = "exact"
//!
//! [defaults]
//! account_currency = "USD"
//! leverage = "2000:1"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{CurrencyCode, Leverage};
use crate::sizers::PipPolicy;

/// Top-level config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FxcalcConfig {
    pub sizing: SizingConfig,
    pub defaults: CalcDefaults,
}

/// Knobs of the sizing engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SizingConfig {
    /// Fraction of the requested risk a truncated position must still deliver.
    ///
    /// Tied to truncation toward zero; changing the rounding mode means
    /// re-deriving this value.
    pub risk_tolerance: f64,

    /// Successful positions below this many units are flagged as degenerate.
    pub degenerate_units: i64,

    /// How quote currencies are matched against the JPY pip rule
    pub pip_policy: PipPolicy,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self { risk_tolerance: 0.99, degenerate_units: 100, pip_policy: PipPolicy::Exact }
    }
}

impl SizingConfig {
    /// Reject values that would make every calculation meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.risk_tolerance > 0.0 && self.risk_tolerance <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "sizing.risk_tolerance must be in (0, 1], got {}",
                self.risk_tolerance
            )));
        }
        if self.degenerate_units < 0 {
            return Err(ConfigError::Invalid(format!(
                "sizing.degenerate_units must be >= 0, got {}",
                self.degenerate_units
            )));
        }
        Ok(())
    }
}

/// Defaults the CLI falls back to when a flag is omitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalcDefaults {
    pub account_currency: CurrencyCode,
    pub leverage: Leverage,
}

impl Default for CalcDefaults {
    fn default() -> Self {
        Self { account_currency: "USD".into(), leverage: Leverage::default() }
    }
}

impl FxcalcConfig {
    /// Load config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml(&content)
    }

    /// Parse config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.sizing.validate()?;
        Ok(config)
    }

    /// Serialize config to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
