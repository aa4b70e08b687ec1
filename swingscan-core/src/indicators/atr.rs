//! Average True Range (ATR), rolling-mean variant.
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|).
//! ATR[t] = mean of TR over the trailing `period` bars ending at t.
//! Lookback: period (the first TR has no previous close).

use super::{mean, Indicator};
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

/// True Range series.
/// TR[0] = high[0] - low[0] (no previous close).
pub fn true_range(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let range = bar.high - bar.low;
            if i == 0 {
                return range;
            }
            let pc = bars[i - 1].close;
            range.max((bar.high - pc).abs()).max((bar.low - pc).abs())
        })
        .collect()
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n < self.period + 1 {
            return result;
        }

        let tr = true_range(bars);
        for t in self.period..n {
            result[t] = mean(&tr[t + 1 - self.period..=t]);
        }
        result
    }
}

/// Latest ATR, or 0.0 with fewer than `period + 1` bars or an undefined value.
pub fn atr(bars: &[PriceBar], period: usize) -> f64 {
    if period == 0 || bars.len() < period + 1 {
        return 0.0;
    }
    let tail = &bars[bars.len() - period - 1..];
    let tr = true_range(tail);
    let value = mean(&tr[1..]);
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
