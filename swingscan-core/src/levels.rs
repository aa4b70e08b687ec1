//! Trade plan levels derived from the current price with fixed offsets.

use serde::{Deserialize, Serialize};

use crate::scoring::round2;

const STOP_LOSS_FACTOR: f64 = 0.975;
const TARGET_1_FACTOR: f64 = 1.10;
const TARGET_2_FACTOR: f64 = 1.20;
const ENTRY_LOW_FACTOR: f64 = 0.985;
const ENTRY_HIGH_FACTOR: f64 = 1.015;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevels {
    /// [low, high]
    pub entry_zone: [f64; 2],
    pub stop_loss: f64,
    pub target_1: f64,
    pub target_2: f64,
    pub risk_reward_t1: f64,
}

/// Levels for `price`. Prices are rounded to 6 decimals, the reward/risk
/// ratio to 2; the ratio is 0 when the stop is not below the price.
pub fn levels(price: f64) -> PriceLevels {
    let stop_loss = price * STOP_LOSS_FACTOR;
    let target_1 = price * TARGET_1_FACTOR;
    let target_2 = price * TARGET_2_FACTOR;

    let risk = price - stop_loss;
    let risk_reward_t1 = if risk > 0.0 {
        round2((target_1 - price) / risk)
    } else {
        0.0
    };

    PriceLevels {
        entry_zone: [
            round6(price * ENTRY_LOW_FACTOR),
            round6(price * ENTRY_HIGH_FACTOR),
        ],
        stop_loss: round6(stop_loss),
        target_1: round6(target_1),
        target_2: round6(target_2),
        risk_reward_t1,
    }
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_at_100() {
        let l = levels(100.0);
        assert_eq!(l.stop_loss, 97.5);
        assert_eq!(l.target_1, 110.0);
        assert_eq!(l.target_2, 120.0);
        assert_eq!(l.entry_zone, [98.5, 101.5]);
        assert_eq!(l.risk_reward_t1, 4.0);
    }

    #[test]
    fn ratio_is_price_independent() {
        for price in [0.0004, 1.0, 3.7, 65_000.0] {
            assert_eq!(levels(price).risk_reward_t1, 4.0, "price {price}");
        }
    }

    #[test]
    fn small_prices_keep_six_decimals() {
        let l = levels(0.123456);
        assert_eq!(l.stop_loss, 0.120370);
        assert_eq!(l.target_1, 0.135802);
    }

    #[test]
    fn zero_price_has_no_ratio() {
        let l = levels(0.0);
        assert_eq!(l.risk_reward_t1, 0.0);
        assert_eq!(l.stop_loss, 0.0);
    }

    #[test]
    fn ordering_of_levels() {
        let l = levels(42.0);
        assert!(l.stop_loss < l.entry_zone[0]);
        assert!(l.entry_zone[0] < l.entry_zone[1]);
        assert!(l.entry_zone[1] < l.target_1);
        assert!(l.target_1 < l.target_2);
    }
}
