//! Scan configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! the production screen:
//!
//! ```toml
//! [analysis]
//! ema_short = 7
//! ema_long = 25
//!
//! [selection]
//! min_market_cap = 100000000.0
//! min_score = 7.5
//! max_results = 10
//!
//! [universe]
//! max_assets = 25
//!
//! [runtime]
//! worker_threads = 0   # 0 = one per core
//!
//! [alerts]
//! high_score_threshold = 8.5
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use swingscan_core::AnalysisParams;
use thiserror::Error;

/// Stablecoins and wrapped dollar tokens never worth screening.
pub const DEFAULT_EXCLUDED_SYMBOLS: &[&str] = &[
    "USDT", "USDC", "DAI", "BUSD", "USDS", "USDE", "PYUSD", "TUSD", "FDUSD", "USDT0", "BSC-USD",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration of a scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub analysis: AnalysisParams,
    pub selection: SelectionConfig,
    pub universe: UniverseConfig,
    pub runtime: RuntimeConfig,
    pub alerts: AlertConfig,
}

/// Floors and ranking applied after scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Assets with a smaller market cap are dropped before scoring.
    pub min_market_cap: f64,
    pub min_score: f64,
    pub max_results: usize,
    /// Quote currency of the emitted pair label (`SYMBOL/QUOTE`).
    pub quote_currency: String,
    /// Asset whose returns every candidate is correlated against.
    pub reference_symbol: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_market_cap: 100_000_000.0,
            min_score: 7.5,
            max_results: 10,
            quote_currency: "USDT".into(),
            reference_symbol: "BTC".into(),
        }
    }
}

/// Which assets of a snapshot enter the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    /// Symbols dropped before analysis, matched case-insensitively.
    pub excluded_symbols: Vec<String>,
    /// Upper bound on assets analyzed per run, taken in snapshot order.
    pub max_assets: usize,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            excluded_symbols: DEFAULT_EXCLUDED_SYMBOLS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_assets: 25,
        }
    }
}

impl UniverseConfig {
    pub fn is_excluded(&self, symbol: &str) -> bool {
        self.excluded_symbols
            .iter()
            .any(|s| s.eq_ignore_ascii_case(symbol))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Analysis worker threads; 0 means one per available core.
    pub worker_threads: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Signals at or above this final score get a dedicated alert.
    pub high_score_threshold: f64,
    /// Opportunities rendered in full in the report.
    pub report_top: usize,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            high_score_threshold: 8.5,
            report_top: 3,
        }
    }
}

impl ScanConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: ScanConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Deterministic BLAKE3 hash of the effective configuration.
    pub fn config_hash(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    /// Reject combinations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.analysis;
        if a.ema_short == 0 || a.ema_short >= a.ema_long {
            return invalid(format!(
                "analysis.ema_short ({}) must be positive and below analysis.ema_long ({})",
                a.ema_short, a.ema_long
            ));
        }
        if a.rsi_period == 0 || a.atr_period == 0 {
            return invalid("analysis periods must be positive".into());
        }
        if a.min_bars < 2 {
            return invalid(format!("analysis.min_bars ({}) must be at least 2", a.min_bars));
        }
        if !(a.volume_surge_threshold.is_finite() && a.volume_surge_threshold >= 0.0) {
            return invalid("analysis.volume_surge_threshold must be a non-negative number".into());
        }
        let band_ok = (0.0..=100.0).contains(&a.rsi_bullish_low)
            && (0.0..=100.0).contains(&a.rsi_bullish_high)
            && a.rsi_bullish_low <= a.rsi_bullish_high;
        if !band_ok {
            return invalid(format!(
                "analysis RSI band [{}, {}] must lie within [0, 100] with low <= high",
                a.rsi_bullish_low, a.rsi_bullish_high
            ));
        }

        let s = &self.selection;
        if !(s.min_market_cap.is_finite() && s.min_market_cap >= 0.0) {
            return invalid("selection.min_market_cap must be a non-negative number".into());
        }
        if !(s.min_score.is_finite() && s.min_score >= 0.0) {
            return invalid("selection.min_score must be a non-negative number".into());
        }
        if s.max_results == 0 {
            return invalid("selection.max_results must be at least 1".into());
        }
        if s.quote_currency.trim().is_empty() {
            return invalid("selection.quote_currency must not be empty".into());
        }

        if self.universe.max_assets == 0 {
            return invalid("universe.max_assets must be at least 1".into());
        }
        if !(self.alerts.high_score_threshold.is_finite() && self.alerts.high_score_threshold >= 0.0)
        {
            return invalid("alerts.high_score_threshold must be a non-negative number".into());
        }
        Ok(())
    }
}

fn invalid(msg: String) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid(msg))
}
