//! Short-horizon trend label from the percent change across the trailing
//! 10-point window.

use serde::{Deserialize, Serialize};

/// Number of trailing points the change is measured across.
pub const TREND_WINDOW: usize = 10;
/// Percent move needed for a directional label.
pub const TREND_THRESHOLD_PCT: f64 = 3.0;
const STRENGTH_DIVISOR: f64 = 5.0;
const MAX_STRENGTH: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendLabel {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl std::fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendReading {
    pub label: TrendLabel,
    /// 0 for neutral, otherwise min(|change%| / 5, 5).
    pub strength: f64,
}

/// Trend over the last `TREND_WINDOW` closes (first to last point).
///
/// Fewer points, or a non-positive window start, reads as neutral.
pub fn trend(closes: &[f64]) -> TrendReading {
    if closes.len() < TREND_WINDOW {
        return TrendReading::default();
    }

    let window = &closes[closes.len() - TREND_WINDOW..];
    let first = window[0];
    let last = window[TREND_WINDOW - 1];
    let change_pct = (last - first) / first * 100.0;
    if first <= 0.0 || !change_pct.is_finite() {
        return TrendReading::default();
    }

    let label = if change_pct > TREND_THRESHOLD_PCT {
        TrendLabel::Bullish
    } else if change_pct < -TREND_THRESHOLD_PCT {
        TrendLabel::Bearish
    } else {
        return TrendReading::default();
    };

    TrendReading {
        label,
        strength: (change_pct.abs() / STRENGTH_DIVISOR).min(MAX_STRENGTH),
    }
}
