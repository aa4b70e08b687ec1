//! Run status history: JSONL append-only log, one line per invocation.
//!
//! Each line is an independent JSON object, so a partial write damages at
//! most the last entry and the file is easy to tail.

use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How an invocation ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Success,
    /// The snapshot held no coin data.
    NoData,
    Failed { reason: String },
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::NoData => f.write_str("failed: no data"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatus {
    /// When the run started.
    pub time: DateTime<Utc>,
    pub outcome: RunOutcome,
    /// Opportunities selected.
    pub signals: usize,
    pub duration_seconds: f64,
}

impl RunStatus {
    pub fn new(
        time: DateTime<Utc>,
        outcome: RunOutcome,
        signals: usize,
        duration: std::time::Duration,
    ) -> Self {
        Self {
            time,
            outcome,
            signals,
            duration_seconds: (duration.as_secs_f64() * 100.0).round() / 100.0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == RunOutcome::Success
    }
}

/// JSONL history file manager.
pub struct StatusHistory {
    path: PathBuf,
}

impl StatusHistory {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one status line, creating the file and its parent directory.
    pub fn append(&self, status: &RunStatus) -> io::Result<()> {
        let json = serde_json::to_string(status)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        writeln!(file, "{json}")?;
        file.flush()
    }

    /// Read every entry, oldest first. Malformed lines are logged and skipped.
    pub fn read_all(&self) -> io::Result<Vec<RunStatus>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = io::BufReader::new(fs::File::open(&self.path)?);
        let mut entries = Vec::new();

        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<RunStatus>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(
                    path = %self.path.display(),
                    line = lineno + 1,
                    error = %e,
                    "skipping malformed history line"
                ),
            }
        }

        Ok(entries)
    }

    /// Most recent entry, if any run was recorded.
    pub fn last(&self) -> io::Result<Option<RunStatus>> {
        Ok(self.read_all()?.pop())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
