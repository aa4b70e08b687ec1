//! SwingScan CLI: scan a market snapshot and report swing-trade candidates.
//!
//! Commands:
//! - `scan`: analyze a snapshot (or a synthetic one), write artifacts, print the report
//! - `report`: re-render the report of a saved run
//! - `status`: show the outcome of the most recent scan
//! - `init-config`: write a TOML config with every default spelled out

mod logging;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use swingscan_runner::{
    generate_synthetic_snapshot, high_score_alerts, load_result, load_snapshot, render_report,
    save_artifacts, select_universe, DataSource, LoadError, LoadedSnapshot, RunOutcome, RunResult,
    RunStatus, ScanConfig, SelectionPipeline, StatusHistory,
};
use tracing::{info, warn};

use crate::logging::{init_logging, LogFormat};

#[derive(Parser)]
#[command(
    name = "swingscan",
    version,
    about = "SwingScan CLI: ranks crypto assets for swing trades"
)]
struct Cli {
    /// Log output format.
    #[arg(
        long,
        global = true,
        value_enum,
        env = "SWINGSCAN_LOG_FORMAT",
        default_value_t = LogFormat::Pretty
    )]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a snapshot, save artifacts and print the report.
    Scan {
        /// Collector snapshot JSON ({"market_context": ..., "coins": [...]}).
        #[arg(long, required_unless_present = "synthetic", conflicts_with = "synthetic")]
        input: Option<PathBuf>,

        /// Scan a deterministic synthetic snapshot of N assets instead.
        #[arg(long, value_name = "N")]
        synthetic: Option<usize>,

        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory for run artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Analysis worker threads (0 = one per core). Overrides the config.
        #[arg(long)]
        threads: Option<usize>,

        /// Run status history file (JSONL).
        #[arg(long, default_value = "results/status.jsonl")]
        history: PathBuf,
    },
    /// Print the report of a saved run.
    Report {
        /// Run result JSON.
        #[arg(long, default_value = "results/latest.json")]
        result: PathBuf,

        /// Config providing the alert threshold and report length.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show the most recent run status.
    Status {
        /// Run status history file (JSONL).
        #[arg(long, default_value = "results/status.jsonl")]
        history: PathBuf,
    },
    /// Write a config file with all defaults.
    InitConfig {
        #[arg(long, default_value = "swingscan.toml")]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    match cli.command {
        Commands::Scan {
            input,
            synthetic,
            config,
            output_dir,
            threads,
            history,
        } => run_scan(
            input.as_deref(),
            synthetic,
            config.as_deref(),
            &output_dir,
            threads,
            &history,
        ),
        Commands::Report { result, config } => run_report(&result, config.as_deref()),
        Commands::Status { history } => run_status(&history),
        Commands::InitConfig { path, force } => run_init_config(&path, force),
    }
}

fn load_config(path: Option<&Path>) -> Result<ScanConfig> {
    match path {
        Some(p) => ScanConfig::load(p).with_context(|| format!("loading config {}", p.display())),
        None => Ok(ScanConfig::default()),
    }
}

fn run_scan(
    input: Option<&Path>,
    synthetic: Option<usize>,
    config_path: Option<&Path>,
    output_dir: &Path,
    threads: Option<usize>,
    history_path: &Path,
) -> Result<()> {
    let started = Utc::now();
    let clock = Instant::now();

    let outcome = scan(input, synthetic, config_path, output_dir, threads, started);

    let status = match &outcome {
        Ok(result) if result.total_analyzed == 0 => RunStatus::new(
            started,
            RunOutcome::Failed {
                reason: "no asset could be analyzed".into(),
            },
            0,
            clock.elapsed(),
        ),
        Ok(result) => RunStatus::new(
            started,
            RunOutcome::Success,
            result.top_opportunities.len(),
            clock.elapsed(),
        ),
        Err(e) if matches!(e.downcast_ref::<LoadError>(), Some(LoadError::NoData)) => {
            RunStatus::new(started, RunOutcome::NoData, 0, clock.elapsed())
        }
        Err(e) => RunStatus::new(
            started,
            RunOutcome::Failed {
                reason: format!("{e:#}"),
            },
            0,
            clock.elapsed(),
        ),
    };

    let history = StatusHistory::new(history_path.to_path_buf());
    if let Err(e) = history.append(&status) {
        warn!(path = %history.path().display(), error = %e, "failed to record run status");
    }

    outcome.map(|_| ())
}

fn scan(
    input: Option<&Path>,
    synthetic: Option<usize>,
    config_path: Option<&Path>,
    output_dir: &Path,
    threads: Option<usize>,
    started: DateTime<Utc>,
) -> Result<RunResult> {
    let mut config = load_config(config_path)?;
    if let Some(n) = threads {
        config.runtime.worker_threads = n;
    }

    let loaded = load_input(input, synthetic, &config, started)?;
    let collected_at = loaded
        .timestamp
        .map_or_else(|| "unknown".to_string(), |t| t.to_string());
    info!(
        source = ?loaded.source,
        %collected_at,
        assets = loaded.assets.len(),
        rejected = loaded.rejected.len(),
        excluded = loaded.excluded.len(),
        truncated = loaded.truncated,
        "snapshot loaded"
    );
    if loaded.source == DataSource::Synthetic {
        warn!("scanning SYNTHETIC data; results are not market signals");
    }

    let pipeline = SelectionPipeline::new(&config)?;
    let result = pipeline.run_snapshot(&loaded, started);

    let paths = save_artifacts(&result, output_dir)?;
    info!(
        run = %paths.run_json.display(),
        csv = %paths.opportunities_csv.display(),
        "artifacts saved"
    );

    print_report(&result, &config);
    Ok(result)
}

fn load_input(
    input: Option<&Path>,
    synthetic: Option<usize>,
    config: &ScanConfig,
    started: DateTime<Utc>,
) -> Result<LoadedSnapshot> {
    match (input, synthetic) {
        (Some(path), _) => load_snapshot(path, &config.universe)
            .with_context(|| format!("loading snapshot {}", path.display())),
        (None, Some(count)) => {
            if count == 0 {
                return Err(LoadError::NoData.into());
            }
            // Anchor synthetic bars to midnight so a day's scans share data.
            let end = started
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .context("invalid synthetic anchor time")?;
            let snapshot = generate_synthetic_snapshot(count, end);
            Ok(select_universe(
                snapshot,
                Vec::new(),
                &config.universe,
                DataSource::Synthetic,
            ))
        }
        (None, None) => bail!("either --input or --synthetic is required"),
    }
}

fn print_report(result: &RunResult, config: &ScanConfig) {
    println!("{}", render_report(result, &config.alerts));
    for alert in high_score_alerts(result, &config.alerts) {
        println!("{alert}");
    }
    if !result.skipped.is_empty() {
        println!("Skipped {} asset(s):", result.skipped.len());
        for s in &result.skipped {
            println!("  {:<10} {}", s.symbol, s.reason);
        }
    }
}

fn run_report(result_path: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let result = load_result(result_path)?;
    print_report(&result, &config);
    Ok(())
}

fn run_status(history_path: &Path) -> Result<()> {
    let history = StatusHistory::new(history_path.to_path_buf());
    let last = history
        .last()
        .with_context(|| format!("reading {}", history_path.display()))?;

    match last {
        None => println!("Never run"),
        Some(status) => {
            println!("Last run:  {}", status.time.format("%Y-%m-%d %H:%M:%S UTC"));
            println!("Status:    {}", status.outcome);
            println!("Signals:   {}", status.signals);
            println!("Duration:  {:.2}s", status.duration_seconds);
        }
    }
    Ok(())
}

fn run_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    let toml = ScanConfig::default().to_toml_string()?;
    std::fs::write(path, toml).with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
