//! Integration tests for artifacts, reports, and run history.
//!
//! Verifies:
//! 1. `save_artifacts` writes run/latest JSON and the CSV, loadable again
//! 2. The report shows the market header, top picks and the "+N more" footer
//! 3. A run with no opportunities renders the notice instead
//! 4. High-score alerts honour the configured threshold
//! 5. Status history records the latest invocation

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use swingscan_core::{AssetRecord, MarketContext, PriceBar};
use swingscan_runner::export::{export_opportunities_csv, LATEST_FILE};
use swingscan_runner::{
    high_score_alerts, load_result, render_report, save_artifacts, AlertConfig, RunOutcome,
    RunResult, RunStatus, ScanConfig, SelectionPipeline, StatusHistory,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn run_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_717_234_200, 0).unwrap()
}

fn climbing(symbol: &str, market_cap: f64) -> AssetRecord {
    let base = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut price: f64 = 20.0;
    let ohlc: Vec<PriceBar> = (0..48)
        .map(|i| {
            let open = price;
            price *= if i % 4 == 3 { 0.998 } else { 1.004 };
            PriceBar {
                timestamp: base + Duration::hours(4 * i),
                open,
                high: open.max(price) * 1.004,
                low: open.min(price) * 0.996,
                close: price,
            }
        })
        .collect();
    AssetRecord {
        id: symbol.to_lowercase(),
        symbol: symbol.into(),
        name: format!("{symbol} Token"),
        current_price: price,
        market_cap,
        total_volume: 120_000_000.0,
        price_change_24h: 0.8,
        price_change_7d: 3.1,
        ohlc,
    }
}

/// Five qualifying large caps.
fn populated_result() -> RunResult {
    let assets: Vec<AssetRecord> = ["ETH", "SOL", "BNB", "XRP", "ADA"]
        .iter()
        .map(|s| climbing(s, 6e10))
        .collect();
    let context = MarketContext {
        btc_dominance: 53.27,
        total_market_cap: 2_430_000_000_000.0,
        total_volume_24h: 9.1e10,
        active_cryptocurrencies: 100,
    };
    let pipeline = SelectionPipeline::new(&ScanConfig::default()).unwrap();
    let result = pipeline.run(context, &assets, run_time());
    assert_eq!(result.top_opportunities.len(), 5, "fixture should qualify");
    result
}

// ── 1. Artifacts ─────────────────────────────────────────────────────

#[test]
fn artifacts_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let result = populated_result();

    let paths = save_artifacts(&result, dir.path()).unwrap();

    assert_eq!(paths.latest_json, dir.path().join(LATEST_FILE));
    let from_run = load_result(&paths.run_json).unwrap();
    let from_latest = load_result(&paths.latest_json).unwrap();
    assert_eq!(from_run.total_qualified, 5);
    assert_eq!(from_latest.dataset_hash, result.dataset_hash);
    let symbols: Vec<&str> = from_latest
        .top_opportunities
        .iter()
        .map(|s| s.symbol.as_str())
        .collect();
    assert_eq!(symbols, ["ETH", "SOL", "BNB", "XRP", "ADA"]);

    let csv = std::fs::read_to_string(&paths.opportunities_csv).unwrap();
    assert_eq!(csv.lines().count(), 6);
    assert!(csv.lines().nth(1).unwrap().starts_with("1,ETH,ETH/USDT,"));
}

#[test]
fn csv_leaves_missing_correlation_blank() {
    let result = populated_result();
    let csv = export_opportunities_csv(&result.top_opportunities).unwrap();
    let header: Vec<&str> = csv.lines().next().unwrap().split(',').collect();
    let col = header.iter().position(|h| *h == "btc_correlation").unwrap();
    let row: Vec<&str> = csv.lines().nth(1).unwrap().split(',').collect();
    assert_eq!(row[col], "");
}

#[test]
fn loading_a_missing_file_reports_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_result(&dir.path().join("nope.json")).unwrap_err();
    assert!(err.to_string().contains("nope.json"));
}

// ── 2–3. Report ──────────────────────────────────────────────────────

#[test]
fn report_shows_header_top_three_and_footer() {
    let report = render_report(&populated_result(), &AlertConfig::default());

    assert!(report.contains("BTC Dominance: 53.3%"));
    assert!(report.contains("Total Market Cap: $2430.0B"));
    assert!(report.contains("5 of 5 analyzed assets qualified"));
    assert!(report.contains("🥇 *ETH* (ETH Token)"));
    assert!(report.contains("🥉 *BNB*"));
    assert!(!report.contains("*XRP*"));
    assert!(report.contains("+2 more opportunities available"));
    assert!(report.contains("(-2.5%)"));
    assert!(report.contains("(+10.0%)"));
    assert!(report.contains("(+20.0%)"));
    assert!(report.contains("Vol✓"));
}

#[test]
fn report_without_opportunities_shows_notice() {
    let mut result = populated_result();
    result.top_opportunities.clear();
    result.total_qualified = 0;

    let report = render_report(&result, &AlertConfig::default());

    assert!(report.contains("No opportunities found"));
    assert!(!report.contains("TOP OPPORTUNITIES"));
}

// ── 4. Alerts ────────────────────────────────────────────────────────

#[test]
fn alerts_follow_threshold() {
    let result = populated_result();
    let everything = AlertConfig {
        high_score_threshold: 0.0,
        ..AlertConfig::default()
    };
    let nothing = AlertConfig {
        high_score_threshold: 11.5,
        ..AlertConfig::default()
    };

    let alerts = high_score_alerts(&result, &everything);
    assert_eq!(alerts.len(), 5);
    assert!(alerts[0].contains("HIGH SCORE ALERT"));
    assert!(alerts[0].contains("*ETH*"));
    assert!(high_score_alerts(&result, &nothing).is_empty());
}

// ── 5. History ───────────────────────────────────────────────────────

#[test]
fn status_history_keeps_latest_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let history = StatusHistory::new(dir.path().join("status.jsonl"));

    history
        .append(&RunStatus::new(
            run_time(),
            RunOutcome::Failed {
                reason: "snapshot unreadable".into(),
            },
            0,
            StdDuration::from_millis(40),
        ))
        .unwrap();
    history
        .append(&RunStatus::new(
            run_time() + Duration::days(1),
            RunOutcome::Success,
            5,
            StdDuration::from_millis(1_250),
        ))
        .unwrap();

    let last = history.last().unwrap().unwrap();
    assert!(last.is_success());
    assert_eq!(last.signals, 5);
    assert_eq!(last.duration_seconds, 1.25);
}
