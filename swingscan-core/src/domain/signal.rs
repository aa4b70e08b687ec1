//! TradingSignal: a qualified asset with its scores and trade plan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{AssetAnalysis, IndicatorSet, SignalFlags};
use crate::levels::PriceLevels;
use crate::scoring::ScoreBreakdown;

/// One shortlisted asset. Scores and levels serialize flat, next to the
/// asset fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingSignal {
    pub symbol: String,
    pub name: String,
    pub pair: String,
    pub price: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub price_change_24h: f64,
    pub price_change_7d: f64,
    #[serde(flatten)]
    pub scores: ScoreBreakdown,
    pub signals: SignalFlags,
    pub indicators: IndicatorSet,
    #[serde(flatten)]
    pub levels: PriceLevels,
    /// Return correlation with the reference asset; `None` when it could
    /// not be measured.
    pub btc_correlation: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl TradingSignal {
    pub fn new(
        analysis: AssetAnalysis,
        scores: ScoreBreakdown,
        levels: PriceLevels,
        quote_currency: &str,
        btc_correlation: Option<f64>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            pair: format!("{}/{}", analysis.symbol, quote_currency),
            symbol: analysis.symbol,
            name: analysis.name,
            price: analysis.price,
            market_cap: analysis.market_cap,
            volume_24h: analysis.volume_24h,
            price_change_24h: analysis.price_change_24h,
            price_change_7d: analysis.price_change_7d,
            scores,
            signals: analysis.signals,
            indicators: analysis.indicators,
            levels,
            btc_correlation,
            timestamp,
        }
    }

    pub fn final_score(&self) -> f64 {
        self.scores.final_score
    }
}
