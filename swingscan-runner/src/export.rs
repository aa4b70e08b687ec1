//! Artifact export: JSON run results and the opportunities CSV.
//!
//! Every persisted result carries a `schema_version`; results written by a
//! newer version are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use swingscan_core::TradingSignal;

use crate::result::{RunResult, SCHEMA_VERSION};

/// File name of the most recent result inside an output directory.
pub const LATEST_FILE: &str = "latest.json";
pub const OPPORTUNITIES_CSV: &str = "opportunities.csv";

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `RunResult` to pretty JSON.
pub fn export_json(result: &RunResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize RunResult to JSON")
}

/// Deserialize a `RunResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<RunResult> {
    let result: RunResult =
        serde_json::from_str(json).context("failed to deserialize RunResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// One row per opportunity, in rank order.
///
/// Columns: rank, symbol, pair, price, market_cap, volume_24h, final_score,
/// momentum_score, volume_score, technical_score, risk_score, entry_low,
/// entry_high, stop_loss, target_1, target_2, risk_reward_t1,
/// btc_correlation, rsi, macd_signal, trend
pub fn export_opportunities_csv(signals: &[TradingSignal]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "rank",
        "symbol",
        "pair",
        "price",
        "market_cap",
        "volume_24h",
        "final_score",
        "momentum_score",
        "volume_score",
        "technical_score",
        "risk_score",
        "entry_low",
        "entry_high",
        "stop_loss",
        "target_1",
        "target_2",
        "risk_reward_t1",
        "btc_correlation",
        "rsi",
        "macd_signal",
        "trend",
    ])?;

    for (i, s) in signals.iter().enumerate() {
        wtr.write_record([
            (i + 1).to_string(),
            s.symbol.clone(),
            s.pair.clone(),
            format!("{:.6}", s.price),
            format!("{:.0}", s.market_cap),
            format!("{:.0}", s.volume_24h),
            format!("{:.2}", s.scores.final_score),
            format!("{:.2}", s.scores.momentum_score),
            format!("{:.2}", s.scores.volume_score),
            format!("{:.2}", s.scores.technical_score),
            format!("{:.2}", s.scores.risk_score),
            format!("{:.6}", s.levels.entry_zone[0]),
            format!("{:.6}", s.levels.entry_zone[1]),
            format!("{:.6}", s.levels.stop_loss),
            format!("{:.6}", s.levels.target_1),
            format!("{:.6}", s.levels.target_2),
            format!("{:.2}", s.levels.risk_reward_t1),
            s.btc_correlation
                .map(|c| format!("{c:.2}"))
                .unwrap_or_default(),
            format!("{:.1}", s.signals.rsi_value),
            s.signals.macd_signal.to_string(),
            s.signals.trend.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Paths written by [`save_artifacts`].
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub run_json: PathBuf,
    pub latest_json: PathBuf,
    pub opportunities_csv: PathBuf,
}

/// Save the artifact set for one run under `output_dir`:
/// - `run_<YYYYmmdd_HHMMSS>.json`: the full `RunResult`
/// - `latest.json`: same content, overwritten every run
/// - `opportunities.csv`: the ranked shortlist
pub fn save_artifacts(result: &RunResult, output_dir: &Path) -> Result<ArtifactPaths> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let json = export_json(result)?;
    let run_json = output_dir.join(format!(
        "run_{}.json",
        result.timestamp.format("%Y%m%d_%H%M%S")
    ));
    std::fs::write(&run_json, &json)
        .with_context(|| format!("failed to write {}", run_json.display()))?;

    let latest_json = output_dir.join(LATEST_FILE);
    std::fs::write(&latest_json, &json)
        .with_context(|| format!("failed to write {}", latest_json.display()))?;

    let csv = export_opportunities_csv(&result.top_opportunities)?;
    let opportunities_csv = output_dir.join(OPPORTUNITIES_CSV);
    std::fs::write(&opportunities_csv, csv)
        .with_context(|| format!("failed to write {}", opportunities_csv.display()))?;

    Ok(ArtifactPaths {
        run_json,
        latest_json,
        opportunities_csv,
    })
}

/// Load a `RunResult` file, rejecting unknown schema versions.
pub fn load_result(path: &Path) -> Result<RunResult> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}
