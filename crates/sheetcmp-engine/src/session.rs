//! Comparison of one file pair from start to report segments

use tracing::{debug, info};

use crate::config::CompareConfig;
use crate::error::CompareResult;
use crate::outcome::{ComparisonOutcome, Status};
use crate::report::{DiffRecord, DiffReportBuilder, ReportSegment};
use crate::source::TableSource;
use crate::stage::{SheetComparison, StageComparator};

/// Everything known about a compared pair
#[derive(Debug, Clone, PartialEq)]
pub struct PairSummary {
    /// Identifier of the V1 file
    pub file_name: String,
    pub outcome: ComparisonOutcome,
    /// Share of matching cells, `None` when no sheet got as far as its data
    pub match_rate: Option<f64>,
    /// Difference report segments, empty when nothing was recorded
    pub segments: Vec<ReportSegment>,
}

impl PairSummary {
    /// Pair-level status
    pub fn status(&self) -> Status {
        self.outcome.status
    }

    /// Total number of recorded cell differences
    pub fn diff_count(&self) -> usize {
        self.segments.iter().map(ReportSegment::len).sum()
    }

    /// Whether a difference report should be written
    pub fn has_report(&self) -> bool {
        !self.segments.is_empty()
    }
}

/// Runs the staged comparison over pairs of table sources
#[derive(Debug)]
pub struct ComparisonSession {
    config: CompareConfig,
    comparator: StageComparator,
}

impl ComparisonSession {
    /// Create a session, rejecting out-of-range settings
    pub fn new(config: CompareConfig) -> CompareResult<Self> {
        let comparator = StageComparator::from_config(&config)?;
        Ok(Self { config, comparator })
    }

    /// The session settings
    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Compare two files
    ///
    /// Sheets are read only after the name and sheet set stages pass, one pair of
    /// tables at a time, in V1 sheet order.
    pub fn run(
        &self,
        v1: &mut dyn TableSource,
        v2: &mut dyn TableSource,
    ) -> CompareResult<PairSummary> {
        let file_name = v1.file_name().to_string();
        debug!(file = %file_name, mode = %self.comparator.differ().mode(), "comparing pair");

        if let Some(outcome) = self.comparator.check_names(&file_name, v2.file_name()) {
            return Ok(self.summarize(file_name, outcome, Vec::new()));
        }

        let sheets_v1 = v1.sheet_names()?;
        let sheets_v2 = v2.sheet_names()?;
        if let Some(outcome) = self.comparator.check_sheets(&sheets_v1, &sheets_v2) {
            return Ok(self.summarize(file_name, outcome, Vec::new()));
        }

        let mut outcomes = Vec::with_capacity(sheets_v1.len());
        let mut records = Vec::new();
        for sheet in &sheets_v1 {
            let t1 = v1.read_sheet(sheet)?;
            let t2 = v2.read_sheet(sheet)?;
            let SheetComparison { outcome, diffs } =
                self.comparator.compare_sheet(sheet, &t1, &t2);
            records.extend(diffs.into_iter().map(|diff| DiffRecord::new(sheet.as_str(), diff)));
            outcomes.push(outcome);
        }

        Ok(self.summarize(file_name, ComparisonOutcome::from_sheets(outcomes), records))
    }

    fn summarize(
        &self,
        file_name: String,
        outcome: ComparisonOutcome,
        records: Vec<DiffRecord>,
    ) -> PairSummary {
        let match_rate = outcome.match_rate();
        let segments = DiffReportBuilder::build(records, self.config.segment_capacity());

        info!(
            file = %file_name,
            status = %outcome.status,
            stage = %outcome.stage,
            segments = segments.len(),
            "pair compared"
        );

        PairSummary {
            file_name,
            outcome,
            match_rate,
            segments,
        }
    }
}
