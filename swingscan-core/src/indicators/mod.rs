//! Indicator implementations.
//!
//! EMA, RSI and ATR are full-series indicators behind the `Indicator`
//! trait: bar history in, numeric series of the same length out, with
//! `f64::NAN` wherever the value is undefined. The point readings used by
//! the analysis (`rsi`, `atr`, `macd`, `trend`) take the latest value and
//! fall back to a documented neutral default instead of failing.

pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod trend;

pub use atr::{atr, true_range, Atr};
pub use ema::{ema_of_series, Ema};
pub use macd::{macd, MacdReading};
pub use rsi::{rsi, Rsi, NEUTRAL_RSI};
pub use trend::{trend, TrendLabel, TrendReading};

use crate::domain::PriceBar;

/// Trait for full-series indicators.
///
/// No value at index t may depend on bars after t.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_7", "atr_14").
    fn name(&self) -> &str;

    /// Number of leading values that are always `f64::NAN` (warm-up).
    fn lookback(&self) -> usize;

    /// Compute the indicator over the entire series.
    fn compute(&self, bars: &[PriceBar]) -> Vec<f64>;

    /// Latest finite value of the series, if any.
    fn latest(&self, bars: &[PriceBar]) -> Option<f64> {
        self.compute(bars).last().copied().filter(|v| v.is_finite())
    }
}

/// Mean of a window; NaN for an empty window.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Create synthetic bars from close prices for testing.
///
/// open = prev_close (or close for the first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, 4-hour stamps.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                timestamp: base + chrono::Duration::hours(4 * i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
