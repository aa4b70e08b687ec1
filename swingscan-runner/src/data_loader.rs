//! Snapshot loading and universe selection.
//!
//! A snapshot is the collector's JSON cache:
//! `{"timestamp": ..., "market_context": {...}, "coins": [...]}`.
//! Each coin is decoded on its own; a coin with a missing or non-numeric
//! required field is reported as skipped and the rest still load. Only a
//! snapshot with no coins at all is fatal.
//!
//! Synthetic snapshots are a developer-only mode for running the pipeline
//! offline. They are deterministic: each symbol's walk is seeded from a
//! BLAKE3 hash of the symbol.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use swingscan_core::{AssetRecord, MarketContext, PriceBar};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::UniverseConfig;
use crate::result::SkippedAsset;

/// Bar spacing of the collector's OHLC feed and of synthetic walks.
pub const BAR_INTERVAL_HOURS: i64 = 4;
/// Bars per synthetic asset: 30 days of 4h candles.
pub const SYNTHETIC_BARS: usize = 180;

const SYNTHETIC_SYMBOLS: &[(&str, &str)] = &[
    ("BTC", "Bitcoin"),
    ("ETH", "Ethereum"),
    ("SOL", "Solana"),
    ("BNB", "BNB"),
    ("XRP", "XRP"),
    ("ADA", "Cardano"),
    ("AVAX", "Avalanche"),
    ("DOGE", "Dogecoin"),
    ("DOT", "Polkadot"),
    ("LINK", "Chainlink"),
    ("LTC", "Litecoin"),
    ("ATOM", "Cosmos"),
    ("NEAR", "NEAR Protocol"),
    ("UNI", "Uniswap"),
    ("APT", "Aptos"),
    ("ARB", "Arbitrum"),
];

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot contains no coin data")]
    NoData,
}

/// Where a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    File,
    Synthetic,
}

/// Raw snapshot contents, before universe selection.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub timestamp: Option<NaiveDateTime>,
    pub market_context: MarketContext,
    pub assets: Vec<AssetRecord>,
}

/// Snapshot after decoding and universe selection, ready for the pipeline.
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    /// Collection time stamped by the collector, when it parses.
    pub timestamp: Option<NaiveDateTime>,
    pub market_context: MarketContext,
    /// Assets to analyze, symbols upper-cased, in snapshot order.
    pub assets: Vec<AssetRecord>,
    /// Coins that could not be decoded.
    pub rejected: Vec<SkippedAsset>,
    /// Symbols dropped by the exclusion list.
    pub excluded: Vec<String>,
    /// Coins beyond `max_assets`.
    pub truncated: usize,
    pub source: DataSource,
}

/// Read and decode a snapshot file.
pub fn load_snapshot(path: &Path, universe: &UniverseConfig) -> Result<LoadedSnapshot, LoadError> {
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshot(&json, universe)
}

/// Decode a snapshot document.
pub fn parse_snapshot(json: &str, universe: &UniverseConfig) -> Result<LoadedSnapshot, LoadError> {
    let root: Value = serde_json::from_str(json)?;

    let coins = match root.get("coins").and_then(Value::as_array) {
        Some(coins) if !coins.is_empty() => coins,
        _ => return Err(LoadError::NoData),
    };

    let timestamp = root
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<NaiveDateTime>().ok());

    let market_context = match root.get("market_context") {
        None | Some(Value::Null) => MarketContext::default(),
        Some(v) => serde_json::from_value(v.clone()).unwrap_or_else(|e| {
            warn!(error = %e, "unreadable market context, using zeros");
            MarketContext::default()
        }),
    };

    let mut assets = Vec::with_capacity(coins.len());
    let mut rejected = Vec::new();
    for (index, coin) in coins.iter().enumerate() {
        match decode_coin(index, coin) {
            Ok(asset) => assets.push(asset),
            Err(skipped) => {
                warn!(symbol = %skipped.symbol, reason = %skipped.reason, "dropping malformed coin");
                rejected.push(skipped);
            }
        }
    }

    let snapshot = MarketSnapshot {
        timestamp,
        market_context,
        assets,
    };
    Ok(select_universe(snapshot, rejected, universe, DataSource::File))
}

fn decode_coin(index: usize, coin: &Value) -> Result<AssetRecord, SkippedAsset> {
    let symbol = coin
        .get("symbol")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_uppercase())
        .unwrap_or_else(|| format!("#{index}"));

    serde_json::from_value::<AssetRecord>(coin.clone()).map_err(|e| SkippedAsset {
        symbol,
        reason: format!("malformed record: {e}"),
    })
}

/// Upper-case symbols, drop excluded ones, keep at most `max_assets`.
pub fn select_universe(
    snapshot: MarketSnapshot,
    rejected: Vec<SkippedAsset>,
    universe: &UniverseConfig,
    source: DataSource,
) -> LoadedSnapshot {
    let mut assets = Vec::new();
    let mut excluded = Vec::new();
    let mut truncated = 0;

    for mut asset in snapshot.assets {
        asset.symbol = asset.symbol.trim().to_uppercase();
        if universe.is_excluded(&asset.symbol) {
            debug!(symbol = %asset.symbol, "excluded from universe");
            excluded.push(asset.symbol);
        } else if assets.len() >= universe.max_assets {
            truncated += 1;
        } else {
            assets.push(asset);
        }
    }

    LoadedSnapshot {
        timestamp: snapshot.timestamp,
        market_context: snapshot.market_context,
        assets,
        rejected,
        excluded,
        truncated,
        source,
    }
}

/// Compute a deterministic BLAKE3 hash over the assets' bars.
///
/// Covers symbols and every OHLC value in the given order.
pub fn compute_dataset_hash(assets: &[AssetRecord]) -> String {
    let mut hasher = blake3::Hasher::new();
    for asset in assets {
        hasher.update(asset.symbol.as_bytes());
        hasher.update(&(asset.ohlc.len() as u64).to_le_bytes());
        for bar in &asset.ohlc {
            hasher.update(bar.timestamp.to_string().as_bytes());
            hasher.update(&bar.open.to_le_bytes());
            hasher.update(&bar.high.to_le_bytes());
            hasher.update(&bar.low.to_le_bytes());
            hasher.update(&bar.close.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}

/// Generate a deterministic synthetic snapshot of `count` assets whose last
/// bar closes at `end`.
///
/// The first sixteen assets use well-known symbols; the rest are named
/// `SYN<n>`. Market caps fall off geometrically with rank so the size tiers
/// are all represented.
pub fn generate_synthetic_snapshot(count: usize, end: NaiveDateTime) -> MarketSnapshot {
    let assets = (0..count)
        .map(|rank| {
            let (symbol, name) = match SYNTHETIC_SYMBOLS.get(rank) {
                Some(&(s, n)) => (s.to_string(), n.to_string()),
                None => (format!("SYN{rank}"), format!("Synthetic {rank}")),
            };
            synthetic_asset(symbol, name, rank, end)
        })
        .collect::<Vec<_>>();

    let total_market_cap = assets.iter().map(|a| a.market_cap).sum::<f64>();
    let total_volume_24h = assets.iter().map(|a| a.total_volume).sum::<f64>();
    let btc_dominance = assets
        .first()
        .filter(|_| total_market_cap > 0.0)
        .map(|a| a.market_cap / total_market_cap * 100.0)
        .unwrap_or(0.0);

    MarketSnapshot {
        timestamp: Some(end),
        market_context: MarketContext {
            btc_dominance,
            total_market_cap,
            total_volume_24h,
            active_cryptocurrencies: count as u64,
        },
        assets,
    }
}

fn synthetic_asset(symbol: String, name: String, rank: usize, end: NaiveDateTime) -> AssetRecord {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // Deterministic seed from symbol name
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let drift: f64 = rng.gen_range(-0.004..0.006);
    let mut price: f64 = rng.gen_range(0.5..500.0);
    let start = end - Duration::hours(BAR_INTERVAL_HOURS * (SYNTHETIC_BARS as i64 - 1));

    let mut ohlc = Vec::with_capacity(SYNTHETIC_BARS);
    for i in 0..SYNTHETIC_BARS {
        let ret: f64 = drift + rng.gen_range(-0.02..0.02);
        let open = price;
        let close = price * (1.0 + ret);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        ohlc.push(PriceBar {
            timestamp: start + Duration::hours(BAR_INTERVAL_HOURS * i as i64),
            open,
            high,
            low,
            close,
        });
        price = close;
    }

    let market_cap = 800_000_000_000.0 * 0.55_f64.powi(rank as i32);
    let total_volume = market_cap * rng.gen_range(0.01..0.08);
    let close_at = |bars_back: usize| ohlc[SYNTHETIC_BARS - 1 - bars_back].close;
    let change = |from: f64| (price / from - 1.0) * 100.0;

    AssetRecord {
        id: symbol.to_lowercase(),
        price_change_24h: change(close_at(6)),
        price_change_7d: change(close_at(42)),
        symbol,
        name,
        current_price: price,
        market_cap,
        total_volume,
        ohlc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn end() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn coin(symbol: &str) -> String {
        format!(
            r#"{{"id":"{id}","symbol":"{symbol}","name":"{symbol}","current_price":1.0,
               "market_cap":2000000000.0,"total_volume":30000000.0,
               "ohlc":[{{"timestamp":"2024-01-01T00:00:00","open":1.0,"high":1.1,"low":0.9,"close":1.0}}]}}"#,
            id = symbol.to_lowercase()
        )
    }

    #[test]
    fn parses_collector_cache_format() {
        let json = format!(
            r#"{{"timestamp":"2024-06-01T09:30:00.123456",
                "market_context":{{"btc_dominance":52.3,"total_market_cap":2.4e12}},
                "coins":[{},{}]}}"#,
            coin("btc"),
            coin("eth")
        );
        let loaded = parse_snapshot(&json, &UniverseConfig::default()).unwrap();
        assert_eq!(loaded.assets.len(), 2);
        assert_eq!(loaded.assets[0].symbol, "BTC");
        assert_eq!(loaded.market_context.btc_dominance, 52.3);
        assert_eq!(loaded.market_context.total_volume_24h, 0.0);
        let collected = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_micro_opt(9, 30, 0, 123_456)
            .unwrap();
        assert_eq!(loaded.timestamp, Some(collected));
        assert_eq!(loaded.source, DataSource::File);
    }

    #[test]
    fn unreadable_collection_time_is_dropped() {
        let json = format!(r#"{{"timestamp":"yesterday","coins":[{}]}}"#, coin("eth"));
        let loaded = parse_snapshot(&json, &UniverseConfig::default()).unwrap();
        assert_eq!(loaded.timestamp, None);
        assert_eq!(loaded.assets.len(), 1);
    }

    #[test]
    fn empty_coin_list_is_no_data() {
        let err = parse_snapshot(r#"{"coins":[]}"#, &UniverseConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::NoData));
        let err = parse_snapshot(r#"{"market_context":{}}"#, &UniverseConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::NoData));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            parse_snapshot("{not json", &UniverseConfig::default()),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn malformed_coin_is_rejected_not_fatal() {
        let bad = r#"{"symbol":"bad","name":"Bad","current_price":"n/a","market_cap":1.0,"total_volume":1.0}"#;
        let json = format!(r#"{{"coins":[{},{},{}]}}"#, coin("ETH"), bad, coin("SOL"));
        let loaded = parse_snapshot(&json, &UniverseConfig::default()).unwrap();
        assert_eq!(loaded.assets.len(), 2);
        assert_eq!(loaded.rejected.len(), 1);
        assert_eq!(loaded.rejected[0].symbol, "BAD");
    }

    #[test]
    fn stablecoins_are_excluded_and_universe_capped() {
        let universe = UniverseConfig {
            max_assets: 2,
            ..UniverseConfig::default()
        };
        let json = format!(
            r#"{{"coins":[{},{},{},{},{}]}}"#,
            coin("BTC"),
            coin("usdt"),
            coin("ETH"),
            coin("USDC"),
            coin("SOL")
        );
        let loaded = parse_snapshot(&json, &universe).unwrap();
        let symbols: Vec<&str> = loaded.assets.iter().map(|a| a.symbol.as_str()).collect();
        assert_eq!(symbols, ["BTC", "ETH"]);
        assert_eq!(loaded.excluded, ["USDT", "USDC"]);
        assert_eq!(loaded.truncated, 1);
    }

    #[test]
    fn synthetic_snapshot_is_deterministic() {
        let a = generate_synthetic_snapshot(5, end());
        let b = generate_synthetic_snapshot(5, end());
        assert_eq!(a, b);
        assert_eq!(compute_dataset_hash(&a.assets), compute_dataset_hash(&b.assets));
    }

    #[test]
    fn synthetic_bars_are_valid_series() {
        let snapshot = generate_synthetic_snapshot(20, end());
        assert_eq!(snapshot.assets.len(), 20);
        assert_eq!(snapshot.assets[16].symbol, "SYN16");
        for asset in &snapshot.assets {
            assert_eq!(asset.ohlc.len(), SYNTHETIC_BARS);
            assert!(swingscan_core::domain::validate_series(&asset.ohlc).is_ok());
            assert_eq!(asset.ohlc.last().unwrap().timestamp, end());
            assert_eq!(asset.current_price, asset.ohlc.last().unwrap().close);
        }
        assert!(snapshot.market_context.btc_dominance > 40.0);
    }

    #[test]
    fn dataset_hash_changes_with_data() {
        let snapshot = generate_synthetic_snapshot(3, end());
        let mut altered = snapshot.assets.clone();
        altered[1].ohlc[10].close *= 1.0001;
        assert_ne!(
            compute_dataset_hash(&snapshot.assets),
            compute_dataset_hash(&altered)
        );
    }
}
