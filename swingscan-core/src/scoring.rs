//! Composite scoring: four 0–10 sub-scores blended into one final score and
//! scaled by a market-cap multiplier.

use serde::{Deserialize, Serialize};

use crate::analysis::{AssetAnalysis, MacdSignal};
use crate::indicators::TrendLabel;

/// Sub-score weights of the composite.
pub struct ScoreWeights;

impl ScoreWeights {
    pub const MOMENTUM: f64 = 0.35;
    pub const VOLUME: f64 = 0.25;
    pub const TECHNICAL: f64 = 0.25;
    pub const RISK: f64 = 0.15;
}

const MAX_SUB_SCORE: f64 = 10.0;
// Sub-score floors before any signal bonus.
const MOMENTUM_BASE: f64 = 2.0;
const VOLUME_BASE: f64 = 4.0;
const TECHNICAL_BASE: f64 = 3.0;
/// 24h volume above which the volume score gets its liquidity bonus.
pub const HIGH_LIQUIDITY_VOLUME: f64 = 50_000_000.0;
const RISK_ATR_PENALTY: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub momentum_score: f64,
    pub volume_score: f64,
    pub technical_score: f64,
    pub risk_score: f64,
    pub final_score: f64,
}

/// Size tier multiplier. Caps at or below 100M disqualify (0.0).
pub fn market_cap_multiplier(market_cap: f64) -> f64 {
    if market_cap > 10_000_000_000.0 {
        1.1
    } else if market_cap > 1_000_000_000.0 {
        1.0
    } else if market_cap > 100_000_000.0 {
        0.95
    } else {
        0.0
    }
}

/// Score one analysis. Every component is rounded to 2 decimals.
pub fn score(analysis: &AssetAnalysis) -> ScoreBreakdown {
    let momentum = momentum_score(analysis);
    let volume = volume_score(analysis);
    let technical = technical_score(analysis);
    let risk = risk_score(analysis.indicators.atr_percent);

    let blended = momentum * ScoreWeights::MOMENTUM
        + volume * ScoreWeights::VOLUME
        + technical * ScoreWeights::TECHNICAL
        + risk * ScoreWeights::RISK;
    let final_score = blended * market_cap_multiplier(analysis.market_cap);

    ScoreBreakdown {
        momentum_score: round2(momentum),
        volume_score: round2(volume),
        technical_score: round2(technical),
        risk_score: round2(risk),
        final_score: round2(final_score),
    }
}

fn momentum_score(a: &AssetAnalysis) -> f64 {
    let s = &a.signals;
    let mut score = MOMENTUM_BASE;
    if s.ema_aligned {
        score += 4.0;
    }
    if s.ema_cross {
        score += 2.0;
    }
    if s.rsi_bullish {
        score += 2.0;
    }
    score.min(MAX_SUB_SCORE)
}

fn volume_score(a: &AssetAnalysis) -> f64 {
    let mut score = VOLUME_BASE;
    if a.signals.volume_surge {
        score += 3.0;
    }
    if a.volume_24h > HIGH_LIQUIDITY_VOLUME {
        score += 3.0;
    }
    score.min(MAX_SUB_SCORE)
}

fn technical_score(a: &AssetAnalysis) -> f64 {
    let s = &a.signals;
    let mut score = TECHNICAL_BASE;
    if s.macd_signal == MacdSignal::Buy {
        score += 3.0;
    }
    if s.trend == TrendLabel::Bullish {
        score += 2.0;
    }
    if (40.0..=60.0).contains(&s.rsi_value) {
        score += 2.0;
    }
    score.min(MAX_SUB_SCORE)
}

/// Lower volatility scores higher: max(0, 10 - atr% * 1.2).
pub fn risk_score(atr_percent: f64) -> f64 {
    (MAX_SUB_SCORE - atr_percent * RISK_ATR_PENALTY).max(0.0)
}

/// Round half away from zero to 2 decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{IndicatorSet, SignalFlags};
    use crate::indicators::{MacdReading, TrendReading};

    fn analysis() -> AssetAnalysis {
        AssetAnalysis {
            symbol: "TST".into(),
            name: "Test".into(),
            price: 100.0,
            market_cap: 5_000_000_000.0,
            volume_24h: 60_000_000.0,
            price_change_24h: 0.0,
            price_change_7d: 0.0,
            indicators: IndicatorSet {
                ema_short: 99.0,
                ema_long: 95.0,
                rsi: 55.0,
                macd: MacdReading {
                    line: 1.0,
                    signal: 0.5,
                    histogram: 0.5,
                    bullish: true,
                },
                atr: 2.0,
                atr_percent: 2.0,
                trend: TrendReading {
                    label: TrendLabel::Bullish,
                    strength: 1.0,
                },
            },
            signals: SignalFlags {
                ema_cross: true,
                ema_aligned: true,
                rsi_bullish: true,
                rsi_value: 55.0,
                macd_signal: MacdSignal::Buy,
                macd_histogram: 0.5,
                volume_surge: true,
                trend: TrendLabel::Bullish,
                trend_strength: 1.0,
            },
        }
    }

    #[test]
    fn weights_sum_to_one() {
        let sum = ScoreWeights::MOMENTUM
            + ScoreWeights::VOLUME
            + ScoreWeights::TECHNICAL
            + ScoreWeights::RISK;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn multiplier_tiers() {
        assert_eq!(market_cap_multiplier(50_000_000.0), 0.0);
        assert_eq!(market_cap_multiplier(100_000_000.0), 0.0);
        assert_eq!(market_cap_multiplier(100_000_001.0), 0.95);
        assert_eq!(market_cap_multiplier(1_000_000_000.0), 0.95);
        assert_eq!(market_cap_multiplier(1_000_000_001.0), 1.0);
        assert_eq!(market_cap_multiplier(10_000_000_000.0), 1.0);
        assert_eq!(market_cap_multiplier(10_000_000_001.0), 1.1);
    }

    #[test]
    fn momentum_caps_at_ten() {
        assert_eq!(score(&analysis()).momentum_score, 10.0);
    }

    #[test]
    fn all_signals_on() {
        // risk = 10 - 2.4 = 7.6
        // final = 10*0.35 + 10*0.25 + 10*0.25 + 7.6*0.15 = 9.64
        let s = score(&analysis());
        assert_eq!(s.volume_score, 10.0);
        assert_eq!(s.technical_score, 10.0);
        assert_eq!(s.risk_score, 7.6);
        assert_eq!(s.final_score, 9.64);
    }

    #[test]
    fn all_signals_off_gives_base_scores() {
        let mut a = analysis();
        a.volume_24h = 1_000_000.0;
        a.signals = SignalFlags {
            ema_cross: false,
            ema_aligned: false,
            rsi_bullish: false,
            rsi_value: 80.0,
            macd_signal: MacdSignal::Sell,
            macd_histogram: -0.5,
            volume_surge: false,
            trend: TrendLabel::Bearish,
            trend_strength: 2.0,
        };
        let s = score(&a);
        assert_eq!(s.momentum_score, MOMENTUM_BASE);
        assert_eq!(s.volume_score, VOLUME_BASE);
        assert_eq!(s.technical_score, TECHNICAL_BASE);
    }

    #[test]
    fn single_bonus_adds_to_base() {
        let mut a = analysis();
        a.volume_24h = 1_000_000.0;
        a.signals.ema_aligned = false;
        a.signals.ema_cross = false;
        a.signals.rsi_bullish = true;
        a.signals.volume_surge = false;
        a.signals.macd_signal = MacdSignal::Sell;
        a.signals.trend = TrendLabel::Bearish;
        a.signals.rsi_value = 55.0;
        let s = score(&a);
        assert_eq!(s.momentum_score, 4.0);
        assert_eq!(s.volume_score, 4.0);
        assert_eq!(s.technical_score, 5.0);
    }

    #[test]
    fn high_volatility_floors_risk_at_zero() {
        assert_eq!(risk_score(12.0), 0.0);
        assert_eq!(risk_score(0.0), 10.0);
    }

    #[test]
    fn large_cap_multiplier_applies() {
        let mut a = analysis();
        a.market_cap = 500_000_000_000.0;
        // 9.64 * 1.1 = 10.604
        assert_eq!(score(&a).final_score, 10.6);
    }

    #[test]
    fn disqualifying_cap_zeroes_final() {
        let mut a = analysis();
        a.market_cap = 100_000_000.0;
        assert_eq!(score(&a).final_score, 0.0);
    }
}
