//! Parallel comparison of every pair under a root folder

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rayon::prelude::*;
use sheetcmp_engine::{ComparisonSession, PairSummary};
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::discovery::{discover, DiscoveryIssue, PairJob, Target};
use crate::error::{Error, Result};
use crate::report::write_pair_reports;
use crate::source::FileTableSource;

/// One line of the console progress table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRow {
    pub target: String,
    pub shape_v1: String,
    pub shape_v2: String,
    pub status: String,
    pub details: String,
}

impl ProgressRow {
    fn new(
        target: impl Into<String>,
        shape_v1: impl Into<String>,
        shape_v2: impl Into<String>,
        status: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            shape_v1: shape_v1.into(),
            shape_v2: shape_v2.into(),
            status: status.into(),
            details: details.into(),
        }
    }

    /// A target skipped during discovery
    pub fn issue(target: &str, issue: &DiscoveryIssue) -> Self {
        Self::new(target, "N/A", "N/A", issue.label(), issue.to_string())
    }

    /// A pair that could not be compared
    pub fn error(target: &str, error: &Error) -> Self {
        Self::new(target, "ERROR", "ERROR", error.label(), error.to_string())
    }

    /// Rows for a compared pair: one per sheet, or one for a pair-level verdict
    pub fn from_summary(summary: &PairSummary) -> Vec<Self> {
        let outcome = &summary.outcome;
        if outcome.sheets.is_empty() {
            return vec![Self::new(
                summary.file_name.as_str(),
                "N/A",
                "N/A",
                outcome.status.label(),
                outcome.detail.to_string(),
            )];
        }
        outcome
            .sheets
            .iter()
            .map(|sheet| {
                Self::new(
                    format!("{} [{}]", summary.file_name, sheet.name),
                    sheet.shape_v1.to_string(),
                    sheet.shape_v2.to_string(),
                    sheet.status.label(),
                    sheet.detail.to_string(),
                )
            })
            .collect()
    }
}

/// Receives progress rows as pairs complete, from any worker thread
pub trait ProgressSink: Send + Sync {
    fn record(&self, row: ProgressRow);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressRow) + Send + Sync,
{
    fn record(&self, row: ProgressRow) {
        self(row)
    }
}

/// Sink that keeps every row in arrival order
#[derive(Debug, Default)]
pub struct CollectingSink {
    rows: Mutex<Vec<ProgressRow>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The rows received so far
    pub fn into_rows(self) -> Vec<ProgressRow> {
        self.rows.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProgressSink for CollectingSink {
    fn record(&self, row: ProgressRow) {
        let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        rows.push(row);
    }
}

/// What happened to one target
#[derive(Debug)]
pub enum TargetOutcome {
    /// The pair was compared and its reports written
    Compared {
        summary: PairSummary,
        files: Vec<PathBuf>,
    },
    /// The pair could not be compared or its reports could not be written
    Failed(Error),
    /// The target was not a valid pair
    Skipped(DiscoveryIssue),
}

/// Result for one target
#[derive(Debug)]
pub struct TargetReport {
    pub target: String,
    pub outcome: TargetOutcome,
}

impl TargetReport {
    /// The pair summary, when the pair was compared
    pub fn summary(&self) -> Option<&PairSummary> {
        match &self.outcome {
            TargetOutcome::Compared { summary, .. } => Some(summary),
            _ => None,
        }
    }
}

/// Runs the comparison of every pair under a root folder
#[derive(Debug)]
pub struct BatchRunner {
    config: RunConfig,
    session: ComparisonSession,
}

impl BatchRunner {
    /// Create a runner, rejecting invalid settings
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;
        let session = ComparisonSession::new(config.compare)?;
        Ok(Self { config, session })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Discover and compare every target under `root`
    ///
    /// Results are in target name order whatever order the pairs finish in.
    pub fn run<P: AsRef<Path>>(&self, root: P, sink: &dyn ProgressSink) -> Result<Vec<TargetReport>> {
        let targets = discover(root, &self.config.extensions)?;
        self.run_targets(targets, sink)
    }

    /// Compare already discovered targets on the worker pool
    pub fn run_targets(
        &self,
        targets: Vec<Target>,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<TargetReport>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.worker_count())
            .build()?;

        info!(
            targets = targets.len(),
            jobs = pool.current_num_threads(),
            hash_mode = self.config.compare.hash_mode,
            "starting batch"
        );

        let reports: Vec<TargetReport> = pool.install(|| {
            targets
                .into_par_iter()
                .map(|target| self.run_target(target, sink))
                .collect()
        });
        Ok(reports)
    }

    fn run_target(&self, target: Target, sink: &dyn ProgressSink) -> TargetReport {
        match target {
            Target::Issue { target, issue } => {
                sink.record(ProgressRow::issue(&target, &issue));
                TargetReport {
                    target,
                    outcome: TargetOutcome::Skipped(issue),
                }
            }
            Target::Pair(job) => {
                let outcome = match self.compare_pair(&job) {
                    Ok((summary, files)) => {
                        for row in ProgressRow::from_summary(&summary) {
                            sink.record(row);
                        }
                        TargetOutcome::Compared { summary, files }
                    }
                    Err(error) => {
                        warn!(target_dir = %job.dir.display(), error = %error, "pair failed");
                        sink.record(ProgressRow::error(&file_label(&job.v1), &error));
                        TargetOutcome::Failed(error)
                    }
                };
                TargetReport {
                    target: job.target,
                    outcome,
                }
            }
        }
    }

    /// Compare one pair and write its reports into the target folder
    pub fn compare_pair(&self, job: &PairJob) -> Result<(PairSummary, Vec<PathBuf>)> {
        let mut v1 = FileTableSource::open(&job.v1)?;
        let mut v2 = FileTableSource::open(&job.v2)?;
        let summary = self.session.run(&mut v1, &mut v2)?;
        let files = write_pair_reports(&job.dir, &summary, self.config.report_format)?;
        Ok((summary, files))
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
