//! Relative Strength Index (RSI), rolling-mean variant.
//!
//! avg_gain / avg_loss are plain means over the trailing `period` close-to-close
//! changes (no Wilder smoothing). RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! Lookback: period.
//! Undefined windows (avg_loss == 0) are NaN in the series and read as 50.

use super::{mean, Indicator};
use crate::domain::PriceBar;

/// Reading returned when RSI cannot be determined.
pub const NEUTRAL_RSI: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        rolling_rsi(&closes, self.period)
    }
}

/// RSI series over a close series. Index t uses changes ending at t.
pub fn rolling_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period + 1 {
        return result;
    }

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    // changes[k] is the change into closes[k + 1]
    for t in period..n {
        result[t] = window_rsi(&changes[t - period..t]);
    }

    result
}

/// Latest RSI, or `NEUTRAL_RSI` when there are fewer than `period + 1`
/// points or the latest window is undefined.
pub fn rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return NEUTRAL_RSI;
    }
    let tail = &closes[closes.len() - period - 1..];
    let changes: Vec<f64> = tail.windows(2).map(|w| w[1] - w[0]).collect();
    let value = window_rsi(&changes);
    if value.is_finite() {
        value
    } else {
        NEUTRAL_RSI
    }
}

fn window_rsi(changes: &[f64]) -> f64 {
    let gains: Vec<f64> = changes.iter().map(|&c| c.max(0.0)).collect();
    let losses: Vec<f64> = changes.iter().map(|&c| (-c).max(0.0)).collect();
    let avg_gain = mean(&gains);
    let avg_loss = mean(&losses);

    if avg_loss == 0.0 {
        return f64::NAN;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
