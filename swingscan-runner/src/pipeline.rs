//! Selection pipeline: analyze every asset in parallel, then filter, score,
//! rank and truncate on the calling thread.
//!
//! Per-asset analysis is independent and runs on a bounded rayon pool.
//! Results are collected in input order, so ranking ties resolve to the
//! snapshot order and two runs over the same input are identical except
//! for the timestamp the caller passes in.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use rayon::prelude::*;
use swingscan_core::correlation::{correlation_with, returns_by_timestamp};
use swingscan_core::{
    analyze, levels, score, AnalysisError, AnalysisParams, AssetAnalysis, AssetRecord,
    MarketContext, TradingSignal,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, ScanConfig, SelectionConfig};
use crate::data_loader::{compute_dataset_hash, LoadedSnapshot};
use crate::result::{RunResult, SkippedAsset, SCHEMA_VERSION};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build analysis thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A configured pipeline owning its worker pool.
pub struct SelectionPipeline {
    analysis: AnalysisParams,
    selection: SelectionConfig,
    config_hash: String,
    pool: rayon::ThreadPool,
}

impl SelectionPipeline {
    /// Validates `config` before building the pool, so configs assembled in
    /// code get the same checks as a loaded TOML file.
    pub fn new(config: &ScanConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.runtime.worker_threads)
            .thread_name(|i| format!("swingscan-worker-{i}"))
            .build()?;
        Ok(Self {
            analysis: config.analysis.clone(),
            selection: config.selection.clone(),
            config_hash: config.config_hash(),
            pool,
        })
    }

    pub fn worker_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run over a loaded snapshot. Coins the loader could not decode are
    /// reported in `skipped` ahead of analysis failures.
    pub fn run_snapshot(&self, snapshot: &LoadedSnapshot, timestamp: DateTime<Utc>) -> RunResult {
        let mut result = self.run(snapshot.market_context.clone(), &snapshot.assets, timestamp);
        if !snapshot.rejected.is_empty() {
            let mut skipped = snapshot.rejected.clone();
            skipped.append(&mut result.skipped);
            result.skipped = skipped;
        }
        result
    }

    /// Analyze, score and select over `assets`.
    ///
    /// Never fails: assets that cannot be analyzed are listed in `skipped`
    /// and excluded from `total_analyzed`.
    pub fn run(
        &self,
        market_context: MarketContext,
        assets: &[AssetRecord],
        timestamp: DateTime<Utc>,
    ) -> RunResult {
        info!(
            assets = assets.len(),
            threads = self.worker_threads(),
            "starting analysis"
        );

        let outcomes: Vec<Result<AssetAnalysis, AnalysisError>> = self.pool.install(|| {
            assets
                .par_iter()
                .map(|asset| analyze(asset, &self.analysis))
                .collect()
        });

        let reference = self.reference_returns(assets, &outcomes);

        let mut total_analyzed = 0;
        let mut skipped = Vec::new();
        let mut qualified = Vec::new();

        for (asset, outcome) in assets.iter().zip(outcomes) {
            let analysis = match outcome {
                Ok(analysis) => analysis,
                Err(e) => {
                    if e.is_insufficient_data() {
                        debug!(symbol = %e.symbol(), "skipped: {e}");
                    } else {
                        warn!(symbol = %e.symbol(), "skipped: {e}");
                    }
                    skipped.push(SkippedAsset::from(&e));
                    continue;
                }
            };
            total_analyzed += 1;

            if analysis.market_cap < self.selection.min_market_cap {
                debug!(
                    symbol = %analysis.symbol,
                    market_cap = analysis.market_cap,
                    "below market cap floor"
                );
                continue;
            }

            let scores = score(&analysis);
            if scores.final_score < self.selection.min_score {
                debug!(
                    symbol = %analysis.symbol,
                    final_score = scores.final_score,
                    "below score floor"
                );
                continue;
            }

            let correlation = if self.is_reference(&analysis.symbol) {
                Some(1.0)
            } else {
                reference
                    .as_ref()
                    .and_then(|r| correlation_with(&asset.ohlc, r))
            };
            let price_levels = levels(analysis.price);
            qualified.push(TradingSignal::new(
                analysis,
                scores,
                price_levels,
                &self.selection.quote_currency,
                correlation,
                timestamp,
            ));
        }

        let total_qualified = qualified.len();
        rank(&mut qualified, self.selection.max_results);

        info!(
            analyzed = total_analyzed,
            qualified = total_qualified,
            selected = qualified.len(),
            skipped = skipped.len(),
            "selection complete"
        );

        RunResult {
            schema_version: SCHEMA_VERSION,
            timestamp,
            dataset_hash: compute_dataset_hash(assets),
            config_hash: self.config_hash.clone(),
            market_context,
            total_analyzed,
            total_qualified,
            top_opportunities: qualified,
            skipped,
        }
    }

    fn is_reference(&self, symbol: &str) -> bool {
        symbol.eq_ignore_ascii_case(&self.selection.reference_symbol)
    }

    /// Returns of the reference asset, if it is in the batch and analyzable.
    fn reference_returns(
        &self,
        assets: &[AssetRecord],
        outcomes: &[Result<AssetAnalysis, AnalysisError>],
    ) -> Option<HashMap<NaiveDateTime, f64>> {
        let (asset, _) = assets
            .iter()
            .zip(outcomes)
            .find(|(asset, outcome)| outcome.is_ok() && self.is_reference(&asset.symbol))?;
        Some(returns_by_timestamp(&asset.ohlc))
    }
}

/// Stable sort descending by final score (ties keep input order), then
/// truncate to `max_results`.
pub fn rank(signals: &mut Vec<TradingSignal>, max_results: usize) {
    signals.sort_by(|a, b| b.final_score().total_cmp(&a.final_score()));
    signals.truncate(max_results);
}
