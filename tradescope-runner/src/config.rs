//! Serializable scan configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradescope_core::setup::RiskBudget;

/// Errors from loading or validating a [`ScanConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse scan config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read scan config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scan config: {0}")]
    Invalid(String),
}

/// Everything needed to reproduce a universe scan.
///
/// Missing keys take their defaults; unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Strategy profile id.
    pub profile: String,
    pub capital: f64,
    /// Max percent of capital risked per trade.
    pub risk_percent: f64,
    /// Symbols analyzed concurrently per batch.
    pub batch_size: usize,
    /// Pause between batches.
    pub batch_delay_ms: u64,
    /// Directory of `<SYMBOL>.csv` files.
    pub data_dir: Option<PathBuf>,
    pub symbols: Vec<String>,
    /// Fall back to generated bars when no other source has the symbol.
    pub synthetic_fallback: bool,
    /// Length of generated histories.
    pub synthetic_bars: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            profile: "swing".into(),
            capital: 100_000.0,
            risk_percent: 2.0,
            batch_size: 5,
            batch_delay_ms: 0,
            data_dir: None,
            symbols: Vec::new(),
            synthetic_fallback: false,
            synthetic_bars: 250,
        }
    }
}

impl ScanConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.profile.trim().is_empty() {
            return Err(ConfigError::Invalid("profile must not be empty".into()));
        }
        if !self.capital.is_finite() || self.capital <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "capital must be positive, got {}",
                self.capital
            )));
        }
        if !(self.risk_percent > 0.0 && self.risk_percent <= 100.0) {
            return Err(ConfigError::Invalid(format!(
                "risk_percent must be within (0, 100], got {}",
                self.risk_percent
            )));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be at least 1".into()));
        }
        if self.synthetic_fallback && self.synthetic_bars == 0 {
            return Err(ConfigError::Invalid(
                "synthetic_bars must be at least 1 when synthetic_fallback is on".into(),
            ));
        }
        if let Some(blank) = self.symbols.iter().find(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("blank symbol {blank:?}")));
        }
        Ok(())
    }

    pub fn budget(&self) -> RiskBudget {
        RiskBudget {
            capital: self.capital,
            max_risk_percent: self.risk_percent,
        }
    }

    /// Deterministic hash of this configuration (hex BLAKE3 of its JSON).
    pub fn config_hash(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
