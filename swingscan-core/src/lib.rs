//! SwingScan Core: price bars, indicators, composite scoring, trade levels.
//!
//! This crate is the pure analytical part of the screen:
//! - Domain types (price bars, asset records, market context, trading signals)
//! - Indicators (EMA, rolling RSI, MACD, ATR, trend label)
//! - Per-asset analysis producing indicator readings and signal flags
//! - Composite scoring with a market-cap multiplier
//! - Fixed-offset entry/stop/target levels
//! - Return correlation against a reference asset
//!
//! Nothing here performs I/O, logs, or spawns threads; every operation is a
//! deterministic function of its input.

pub mod analysis;
pub mod correlation;
pub mod domain;
pub mod indicators;
pub mod levels;
pub mod scoring;

pub use analysis::{
    analyze, AnalysisError, AnalysisParams, AssetAnalysis, IndicatorSet, MacdSignal, SignalFlags,
};
pub use domain::{AssetRecord, MarketContext, PriceBar, TradingSignal};
pub use levels::{levels, PriceLevels};
pub use scoring::{market_cap_multiplier, score, ScoreBreakdown};
