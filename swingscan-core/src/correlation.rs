//! Return correlation against a reference asset.
//!
//! Close-to-close returns are paired on the timestamp of the later bar, so
//! series with gaps or different lengths are compared only where both have
//! consecutive data.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::domain::PriceBar;

/// Fewest paired returns a correlation is reported for.
pub const MIN_PAIRED_RETURNS: usize = 10;

/// Close-to-close returns keyed by the timestamp of the later bar.
pub fn returns_by_timestamp(bars: &[PriceBar]) -> HashMap<NaiveDateTime, f64> {
    bars.windows(2)
        .filter(|w| w[0].close > 0.0)
        .map(|w| (w[1].timestamp, w[1].close / w[0].close - 1.0))
        .collect()
}

/// Pearson correlation of `bars` returns against precomputed reference returns.
///
/// `None` with fewer than `MIN_PAIRED_RETURNS` pairs or zero variance on
/// either side. Result is clamped to [-1, 1] and rounded to 2 decimals.
pub fn correlation_with(
    bars: &[PriceBar],
    reference: &HashMap<NaiveDateTime, f64>,
) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = bars
        .windows(2)
        .filter(|w| w[0].close > 0.0)
        .filter_map(|w| {
            reference
                .get(&w[1].timestamp)
                .map(|&r| (w[1].close / w[0].close - 1.0, r))
        })
        .collect();

    pearson(&pairs)
}

fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < MIN_PAIRED_RETURNS {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= f64::EPSILON * f64::EPSILON || var_y <= f64::EPSILON * f64::EPSILON {
        return None;
    }
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if !r.is_finite() {
        return None;
    }
    Some(((r.clamp(-1.0, 1.0)) * 100.0).round() / 100.0)
}
