//! SwingScan Runner: snapshot loading, parallel selection, artifacts.
//!
//! This crate builds on `swingscan-core` to provide:
//! - TOML scan configuration with validation
//! - Snapshot loading with per-coin error isolation and universe filtering
//! - Deterministic synthetic snapshots for offline runs
//! - The selection pipeline (rayon-parallel analysis, filter, rank, truncate)
//! - JSON/CSV artifact export with schema versioning
//! - Markdown report and high-score alert formatting
//! - JSONL run status history

pub mod config;
pub mod data_loader;
pub mod export;
pub mod history;
pub mod pipeline;
pub mod report;
pub mod result;

pub use config::{
    AlertConfig, ConfigError, RuntimeConfig, ScanConfig, SelectionConfig, UniverseConfig,
};
pub use data_loader::{
    compute_dataset_hash, generate_synthetic_snapshot, load_snapshot, parse_snapshot,
    select_universe, DataSource, LoadError, LoadedSnapshot, MarketSnapshot,
};
pub use export::{export_json, import_json, load_result, save_artifacts, ArtifactPaths};
pub use history::{RunOutcome, RunStatus, StatusHistory};
pub use pipeline::{PipelineError, SelectionPipeline};
pub use report::{high_score_alerts, render_report};
pub use result::{RunResult, SkippedAsset, SCHEMA_VERSION};
