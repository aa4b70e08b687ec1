//! Per-asset technical analysis: one `AssetRecord` in, one immutable
//! `AssetAnalysis` (indicators + signal flags) out.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::bar::{closes, validate_series, BarError};
use crate::domain::{AssetRecord, PriceBar};
use crate::indicators::{
    atr, macd, rsi, trend, Ema, Indicator, MacdReading, TrendLabel, TrendReading,
};

/// Periods and thresholds of the analysis. Defaults reproduce the
/// production screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    pub ema_short: usize,
    pub ema_long: usize,
    pub rsi_period: usize,
    pub atr_period: usize,
    /// Series shorter than this never produce an analysis.
    pub min_bars: usize,
    /// Absolute 24h volume (quote currency) above which volume counts as a surge.
    pub volume_surge_threshold: f64,
    pub rsi_bullish_low: f64,
    pub rsi_bullish_high: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            ema_short: 7,
            ema_long: 25,
            rsi_period: 14,
            atr_period: 14,
            min_bars: 20,
            volume_surge_threshold: 10_000_000.0,
            rsi_bullish_low: 35.0,
            rsi_bullish_high: 70.0,
        }
    }
}

/// Latest indicator readings for one asset. All values are finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub ema_short: f64,
    pub ema_long: f64,
    pub rsi: f64,
    pub macd: MacdReading,
    pub atr: f64,
    pub atr_percent: f64,
    pub trend: TrendReading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacdSignal {
    Buy,
    Sell,
}

impl std::fmt::Display for MacdSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        })
    }
}

/// Boolean/derived flags consumed by the scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalFlags {
    pub ema_cross: bool,
    pub ema_aligned: bool,
    pub rsi_bullish: bool,
    pub rsi_value: f64,
    pub macd_signal: MacdSignal,
    pub macd_histogram: f64,
    pub volume_surge: bool,
    pub trend: TrendLabel,
    pub trend_strength: f64,
}

/// Analysis record for one asset in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetAnalysis {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub price_change_24h: f64,
    pub price_change_7d: f64,
    pub indicators: IndicatorSet,
    pub signals: SignalFlags,
}

/// Why an asset produced no analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("{symbol}: {bars} bars, need at least {required}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        required: usize,
    },
    #[error("{symbol}: malformed price series: {source}")]
    MalformedSeries {
        symbol: String,
        #[source]
        source: BarError,
    },
    #[error("{symbol}: invalid {field} ({value})")]
    InvalidField {
        symbol: String,
        field: &'static str,
        value: f64,
    },
}

impl AnalysisError {
    pub fn symbol(&self) -> &str {
        match self {
            Self::InsufficientData { symbol, .. }
            | Self::MalformedSeries { symbol, .. }
            | Self::InvalidField { symbol, .. } => symbol,
        }
    }

    /// Short-history skips are expected every run; everything else is bad data.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

/// Analyze one asset.
///
/// Fails when the series is shorter than `params.min_bars`, when any bar is
/// malformed or out of order, or when a scalar field is unusable.
pub fn analyze(asset: &AssetRecord, params: &AnalysisParams) -> Result<AssetAnalysis, AnalysisError> {
    let symbol = asset.symbol.clone();
    let bars: &[PriceBar] = &asset.ohlc;

    if bars.len() < params.min_bars {
        return Err(AnalysisError::InsufficientData {
            symbol,
            bars: bars.len(),
            required: params.min_bars,
        });
    }
    validate_series(bars).map_err(|source| AnalysisError::MalformedSeries {
        symbol: symbol.clone(),
        source,
    })?;
    check_scalars(asset)?;

    let price = asset.current_price;
    let close_prices = closes(bars);

    let ema_short = Ema::new(params.ema_short).latest(bars).unwrap_or(price);
    let ema_long = Ema::new(params.ema_long).latest(bars).unwrap_or(price);
    let rsi_value = rsi(&close_prices, params.rsi_period);
    let macd_reading = macd(&close_prices);
    let atr_value = atr(bars, params.atr_period);
    let atr_percent = atr_value / price * 100.0;
    let trend_reading = trend(&close_prices);

    let signals = SignalFlags {
        ema_cross: ema_short > ema_long,
        ema_aligned: price > ema_short && ema_short > ema_long,
        rsi_bullish: (params.rsi_bullish_low..=params.rsi_bullish_high).contains(&rsi_value),
        rsi_value,
        macd_signal: if macd_reading.bullish {
            MacdSignal::Buy
        } else {
            MacdSignal::Sell
        },
        macd_histogram: macd_reading.histogram,
        volume_surge: asset.total_volume > params.volume_surge_threshold,
        trend: trend_reading.label,
        trend_strength: trend_reading.strength,
    };

    Ok(AssetAnalysis {
        symbol,
        name: asset.name.clone(),
        price,
        market_cap: asset.market_cap,
        volume_24h: asset.total_volume,
        price_change_24h: finite_or_zero(asset.price_change_24h),
        price_change_7d: finite_or_zero(asset.price_change_7d),
        indicators: IndicatorSet {
            ema_short,
            ema_long,
            rsi: rsi_value,
            macd: macd_reading,
            atr: atr_value,
            atr_percent,
            trend: trend_reading,
        },
        signals,
    })
}

fn check_scalars(asset: &AssetRecord) -> Result<(), AnalysisError> {
    let invalid = |field, value| AnalysisError::InvalidField {
        symbol: asset.symbol.clone(),
        field,
        value,
    };
    if !asset.current_price.is_finite() || asset.current_price <= 0.0 {
        return Err(invalid("current_price", asset.current_price));
    }
    if !asset.market_cap.is_finite() {
        return Err(invalid("market_cap", asset.market_cap));
    }
    if !asset.total_volume.is_finite() {
        return Err(invalid("total_volume", asset.total_volume));
    }
    Ok(())
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
