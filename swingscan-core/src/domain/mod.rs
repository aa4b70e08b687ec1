//! Domain types for SwingScan

pub mod asset;
pub mod bar;
pub mod signal;

pub use asset::{AssetRecord, MarketContext};
pub use bar::{closes, validate_series, BarError, PriceBar};
pub use signal::TradingSignal;
