//! Run result: everything one scan produces, ready for export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use swingscan_core::{AnalysisError, MarketContext, TradingSignal};

/// Current schema version for persisted run results.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// An asset that entered the run but produced no analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedAsset {
    pub symbol: String,
    pub reason: String,
}

impl From<&AnalysisError> for SkippedAsset {
    fn from(err: &AnalysisError) -> Self {
        Self {
            symbol: err.symbol().to_string(),
            reason: err.to_string(),
        }
    }
}

/// Outcome of one scan.
///
/// `top_opportunities` holds at most `max_results` signals in non-increasing
/// `final_score` order; `total_qualified` counts every signal that cleared
/// both floors, before truncation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub timestamp: DateTime<Utc>,
    /// BLAKE3 over every input asset's bars, skipped assets included.
    #[serde(default)]
    pub dataset_hash: String,
    #[serde(default)]
    pub config_hash: String,
    #[serde(default)]
    pub market_context: MarketContext,
    pub total_analyzed: usize,
    pub total_qualified: usize,
    pub top_opportunities: Vec<TradingSignal>,
    #[serde(default)]
    pub skipped: Vec<SkippedAsset>,
}

impl RunResult {
    pub fn has_opportunities(&self) -> bool {
        !self.top_opportunities.is_empty()
    }

    /// Top opportunities scoring at or above `threshold`, in rank order.
    pub fn high_score_signals(&self, threshold: f64) -> impl Iterator<Item = &TradingSignal> {
        self.top_opportunities
            .iter()
            .filter(move |s| s.final_score() >= threshold)
    }
}
