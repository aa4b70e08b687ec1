//! PriceBar: the fundamental market data unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLC bar for a single asset at a single timestamp.
///
/// Volume is not part of the bar: the upstream OHLC feed carries none, and
/// the only volume figure the scoring uses is the asset's 24h total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Why a bar (or the series it belongs to) was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("bar {index}: non-finite or non-positive {field} ({value})")]
    InvalidValue {
        index: usize,
        field: &'static str,
        value: f64,
    },
    #[error("bar {index}: high {high} is below low {low}")]
    HighBelowLow { index: usize, high: f64, low: f64 },
    #[error("bar {index}: timestamp {timestamp} does not follow {previous}")]
    NotAscending {
        index: usize,
        timestamp: NaiveDateTime,
        previous: NaiveDateTime,
    },
}

impl PriceBar {
    /// Every OHLC field finite and strictly positive, high/low not inverted.
    fn check(&self, index: usize) -> Result<(), BarError> {
        for (field, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(BarError::InvalidValue {
                    index,
                    field,
                    value,
                });
            }
        }
        if self.high < self.low {
            return Err(BarError::HighBelowLow {
                index,
                high: self.high,
                low: self.low,
            });
        }
        Ok(())
    }
}

/// Validate a price series: every bar sane, timestamps strictly ascending.
pub fn validate_series(bars: &[PriceBar]) -> Result<(), BarError> {
    for (i, bar) in bars.iter().enumerate() {
        bar.check(i)?;
        if i > 0 && bar.timestamp <= bars[i - 1].timestamp {
            return Err(BarError::NotAscending {
                index: i,
                timestamp: bar.timestamp,
                previous: bars[i - 1].timestamp,
            });
        }
    }
    Ok(())
}

/// Close prices of a series, in order.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
