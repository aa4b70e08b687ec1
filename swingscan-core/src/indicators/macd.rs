//! MACD (Moving Average Convergence Divergence).
//!
//! line = EMA(12) - EMA(26), signal = EMA(9) of line, histogram = line - signal.

use serde::{Deserialize, Serialize};

use super::ema::ema_of_series;

pub const FAST_PERIOD: usize = 12;
pub const SLOW_PERIOD: usize = 26;
pub const SIGNAL_PERIOD: usize = 9;

/// Latest MACD values. `bullish` is true exactly when `histogram > 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdReading {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
    pub bullish: bool,
}

impl MacdReading {
    fn from_values(line: f64, signal: f64) -> Self {
        if !line.is_finite() || !signal.is_finite() {
            return Self::default();
        }
        let histogram = line - signal;
        Self {
            line,
            signal,
            histogram,
            bullish: histogram > 0.0,
        }
    }
}

/// MACD of the latest close. Fewer than 26 points yields all zeros, not bullish.
pub fn macd(closes: &[f64]) -> MacdReading {
    if closes.len() < SLOW_PERIOD {
        return MacdReading::default();
    }

    let fast = ema_of_series(closes, FAST_PERIOD);
    let slow = ema_of_series(closes, SLOW_PERIOD);
    let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = ema_of_series(&line, SIGNAL_PERIOD);

    match (line.last(), signal.last()) {
        (Some(&l), Some(&s)) => MacdReading::from_values(l, s),
        _ => MacdReading::default(),
    }
}
