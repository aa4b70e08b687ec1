//! Per-asset input records and the global market context.

use serde::{Deserialize, Serialize};

use super::bar::PriceBar;

/// One asset as delivered by the data collector.
///
/// `price_change_24h` and `price_change_7d` are optional upstream and
/// default to 0 when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    #[serde(default)]
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub total_volume: f64,
    #[serde(default)]
    pub price_change_24h: f64,
    #[serde(default)]
    pub price_change_7d: f64,
    #[serde(default)]
    pub ohlc: Vec<PriceBar>,
}

/// Market-wide figures attached to every run. Missing fields are zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketContext {
    pub btc_dominance: f64,
    pub total_market_cap: f64,
    pub total_volume_24h: f64,
    pub active_cryptocurrencies: u64,
}
