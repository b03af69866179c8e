//! Batch runs over folder trees on disk

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use sheetcmp::prelude::*;
use sheetcmp::{DiscoveryIssue, DIFFERENCES_XLSX, REPORT_TXT};

/// Ten rows of `Id, Amount`, with `Amount` overridden at the given row indices
fn ledger(changes: &[(usize, i64)]) -> Workbook {
    let mut builder = sheetcmp::TableBuilder::with_header(["Id", "Amount"]);
    for i in 0..10 {
        let amount = changes
            .iter()
            .find(|(row, _)| *row == i)
            .map_or(i as i64 * 10, |(_, v)| *v);
        builder.push_row(vec![CellValue::from(i as i64), CellValue::from(amount)]);
    }
    let mut wb = Workbook::new();
    wb.add_sheet("Sheet1", builder.finish().unwrap()).unwrap();
    wb
}

fn place(root: &Path, relative: &str, workbook: &Workbook) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    workbook.save(&path).unwrap();
}

fn runner(config: RunConfig) -> BatchRunner {
    BatchRunner::new(RunConfig {
        jobs: Some(2),
        ..config
    })
    .unwrap()
}

fn sorted_rows(sink: CollectingSink) -> Vec<ProgressRow> {
    let mut rows = sink.into_rows();
    rows.sort_by(|a, b| a.target.cmp(&b.target));
    rows
}

#[test]
fn mixed_tree_reports_every_target_in_name_order() {
    let root = tempfile::tempdir().unwrap();
    let r = root.path();

    place(r, "a_same/v1/same.xlsx", &ledger(&[]));
    place(r, "a_same/v2/same.xlsx", &ledger(&[]));
    place(r, "b_changed/v1/changed.xlsx", &ledger(&[]));
    place(r, "b_changed/v2/changed.xlsx", &ledger(&[(3, 41)]));
    place(r, "c_renamed/v1/old.xlsx", &ledger(&[]));
    place(r, "c_renamed/v2/new.xlsx", &ledger(&[]));
    place(r, "d_broken/v1/broken.xlsx", &ledger(&[]));
    fs::create_dir_all(r.join("d_broken/v2")).unwrap();
    fs::write(r.join("d_broken/v2/broken.xlsx"), "not a workbook").unwrap();
    place(r, "e_lonely/only/lonely.xlsx", &ledger(&[]));
    place(r, "f_missing/v1/missing.xlsx", &ledger(&[]));
    place(r, "f_missing/v2/missing.csv", &ledger(&[]));

    let sink = CollectingSink::new();
    let reports = runner(RunConfig::default()).run(r, &sink).unwrap();

    let names: Vec<&str> = reports.iter().map(|t| t.target.as_str()).collect();
    assert_eq!(
        names,
        vec!["a_same", "b_changed", "c_renamed", "d_broken", "e_lonely", "f_missing"]
    );

    let statuses: Vec<Option<Status>> = reports
        .iter()
        .map(|t| t.summary().map(PairSummary::status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            Some(Status::PerfectMatch),
            Some(Status::DataMismatch),
            Some(Status::NameMismatch),
            None,
            None,
            None,
        ]
    );
    assert!(matches!(
        &reports[3].outcome,
        TargetOutcome::Failed(Error::Compare(_))
    ));
    assert!(matches!(
        &reports[4].outcome,
        TargetOutcome::Skipped(DiscoveryIssue::FolderError { found: 1 })
    ));
    assert!(matches!(
        &reports[5].outcome,
        TargetOutcome::Skipped(DiscoveryIssue::MissingFile { .. })
    ));

    // report files
    assert!(r.join("a_same").join(REPORT_TXT).is_file());
    assert!(!r.join("a_same").join(DIFFERENCES_XLSX).exists());
    assert!(r.join("b_changed").join(DIFFERENCES_XLSX).is_file());
    assert!(!r.join("c_renamed").join(DIFFERENCES_XLSX).exists());
    assert!(!r.join("d_broken").join(REPORT_TXT).exists());
    assert!(!r.join("e_lonely").join(REPORT_TXT).exists());

    let report = fs::read_to_string(r.join("b_changed").join(REPORT_TXT)).unwrap();
    assert!(report.starts_with("--- Comparison Report for: changed.xlsx ---\n"));
    assert!(report.contains("Match Rate: 95.00%\n"));
    assert!(report.contains("Details: 1 rows differ (1 cells)\n"));

    let diff = Workbook::open(r.join("b_changed").join(DIFFERENCES_XLSX)).unwrap();
    assert_eq!(diff.sheet_names(), vec!["Diff_1"]);
    let segment = diff.sheet("Diff_1").unwrap();
    assert_eq!(segment.row_count(), 1);
    assert_eq!(
        segment.column_names().collect::<Vec<_>>(),
        vec!["Sheet Name", "Row Index", "Column Name", "Column type", "Value V1", "Value V2"]
    );

    let rows = sorted_rows(sink);
    let summary: Vec<(&str, &str, &str)> = rows
        .iter()
        .map(|row| (row.target.as_str(), row.shape_v1.as_str(), row.status.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("broken.xlsx", "ERROR", "Read Error"),
            ("changed.xlsx [Sheet1]", "(10, 2)", "Data Mismatch"),
            ("e_lonely", "N/A", "Folder Error"),
            ("f_missing", "N/A", "Missing File"),
            ("old.xlsx", "N/A", "Name Mismatch"),
            ("same.xlsx [Sheet1]", "(10, 2)", "Perfect Match"),
        ]
    );
    assert_eq!(rows[4].details, "V1: old.xlsx != V2: new.xlsx");
    assert_eq!(rows[3].details, "Missing .xlsx in one or both subfolders.");
}

#[test]
fn csv_report_format_splits_segments() {
    let root = tempfile::tempdir().unwrap();
    let r = root.path();
    place(r, "t/v1/book.xlsx", &ledger(&[]));
    place(r, "t/v2/book.xlsx", &ledger(&[(1, -1), (4, -4), (7, -7)]));

    let config = RunConfig {
        compare: CompareConfig::default()
            .with_mismatch_abort_ratio(1.0)
            .with_max_rows_per_segment(3),
        report_format: ReportFormat::Csv,
        ..RunConfig::default()
    };
    let reports = runner(config).run(r, &CollectingSink::new()).unwrap();

    match &reports[0].outcome {
        TargetOutcome::Compared { files, .. } => assert_eq!(
            files,
            &vec![
                r.join("t").join(REPORT_TXT),
                r.join("t/differences_1.csv"),
                r.join("t/differences_2.csv"),
            ]
        ),
        other => panic!("expected a compared pair, got {:?}", other),
    }

    let second = fs::read_to_string(r.join("t/differences_2.csv")).unwrap();
    assert_eq!(
        second,
        "Sheet Name,Row Index,Column Name,Column type,Value V1,Value V2\n\
         Sheet1,7,Amount,Int64,70,-7\n"
    );
}

#[test]
fn hash_mode_and_csv_inputs() {
    let root = tempfile::tempdir().unwrap();
    let r = root.path();
    for side in ["v1", "v2"] {
        let dir = r.join("t").join(side);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("data.csv"), "Id,Name\n1,one\n2,two\n").unwrap();
    }

    let config = RunConfig {
        compare: CompareConfig::default().with_hash_mode(true),
        extensions: vec!["csv".into()],
        ..RunConfig::default()
    };
    let reports = runner(config).run(r, &CollectingSink::new()).unwrap();
    let summary = reports[0].summary().unwrap();
    assert_eq!(summary.status(), Status::PerfectMatch);
    assert_eq!(summary.outcome.sheets[0].name, "Sheet1");
    assert_eq!(summary.match_rate, Some(1.0));
}

#[test]
fn massive_divergence_stops_early() {
    let root = tempfile::tempdir().unwrap();
    let r = root.path();
    place(r, "t/v1/book.xlsx", &ledger(&[]));
    place(r, "t/v2/book.xlsx", &ledger(&[(0, -1), (1, -2), (2, -3)]));

    let reports = runner(RunConfig::default())
        .run(r, &CollectingSink::new())
        .unwrap();
    let summary = reports[0].summary().unwrap();
    assert_eq!(summary.status(), Status::MassiveDivergence);
    assert!(!r.join("t").join(DIFFERENCES_XLSX).exists());
}

#[test]
fn missing_root_is_an_error() {
    let root = tempfile::tempdir().unwrap();
    let result = runner(RunConfig::default()).run(root.path().join("absent"), &CollectingSink::new());
    assert!(matches!(result, Err(Error::Io { .. })));
}

#[cfg(unix)]
#[test]
fn unreadable_target_does_not_stop_the_batch() {
    use std::os::unix::fs::PermissionsExt;

    let root = tempfile::tempdir().unwrap();
    let r = root.path();
    place(r, "a_ok/v1/ok.xlsx", &ledger(&[]));
    place(r, "a_ok/v2/ok.xlsx", &ledger(&[]));
    let locked = r.join("b_locked");
    fs::create_dir_all(locked.join("v1")).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    // Permission bits do not stop a privileged user
    let enforced = fs::read_dir(&locked).is_err();

    let sink = CollectingSink::new();
    let result = runner(RunConfig::default()).run(r, &sink);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let reports = result.unwrap();

    let names: Vec<&str> = reports.iter().map(|t| t.target.as_str()).collect();
    assert_eq!(names, vec!["a_ok", "b_locked"]);
    assert_eq!(reports[0].summary().map(PairSummary::status), Some(Status::PerfectMatch));
    if enforced {
        assert!(matches!(
            &reports[1].outcome,
            TargetOutcome::Skipped(DiscoveryIssue::Unreadable { .. })
        ));
        let rows = sorted_rows(sink);
        let locked_row = rows.iter().find(|row| row.target == "b_locked").unwrap();
        assert_eq!(locked_row.status, "Read Error");
        assert_eq!(locked_row.shape_v1, "N/A");
    }
}
