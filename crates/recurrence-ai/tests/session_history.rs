use chrono::{NaiveDate, NaiveDateTime};
use recurrence_ai::analytics::{patient_comparison, AnalyticsView, ComparisonHook, SessionComparison};
use recurrence_ai::clinical::RiskLevel;
use recurrence_ai::decision::Decision;
use recurrence_ai::export::{export_csv, ReportRenderer, TextTableReport, REPORT_TITLE};
use recurrence_ai::history::{HistoryLedger, PredictionRecord, SessionStore, COLUMNS};
use recurrence_ai::model::ClassProbabilities;
use std::fs;

fn at(day: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 8, day)
        .expect("valid date")
        .and_hms_opt(16, minute, 0)
        .expect("valid time")
}

fn ledger_with(started: NaiveDateTime, confidences: &[(f64, RiskLevel)]) -> HistoryLedger {
    let mut ledger = HistoryLedger::new(started);
    for (yes, risk) in confidences {
        let probabilities = ClassProbabilities::from_weights(1.0 - yes, *yes).expect("valid pair");
        let decision = Decision::evaluate(probabilities.recurrence, *risk == RiskLevel::High);
        let record = PredictionRecord::new(
            ledger.display_name(None),
            started,
            probabilities,
            &decision,
            *risk,
        );
        ledger.append(record);
    }
    ledger
}

#[test]
fn persisted_file_has_one_row_per_record_in_column_order() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = SessionStore::new(dir.path());
    let mut ledger = ledger_with(
        at(1, 5),
        &[(0.123, RiskLevel::Low), (0.456, RiskLevel::Intermediate), (0.789, RiskLevel::High)],
    );

    let path = store.persist(&mut ledger).expect("persist").expect("file written");
    let text = fs::read_to_string(&path).expect("read session");
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 1 + 3);
    assert_eq!(lines[0], COLUMNS.join(","));

    let snapshot = store.load(&path).expect("reload");
    let reloaded = snapshot.confidence_yes();
    let original: Vec<f64> = ledger.records().iter().map(|r| r.confidence_yes).collect();
    assert_eq!(reloaded, original);
    assert_eq!(reloaded, vec![0.12, 0.46, 0.79]);
}

#[test]
fn comparing_sessions_reports_the_mean_delta() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = SessionStore::new(dir.path());

    let mut earlier = ledger_with(at(1, 0), &[(0.30, RiskLevel::Low), (0.50, RiskLevel::Low)]);
    let earlier_path = store.persist(&mut earlier).expect("persist").expect("file");

    let mut current = ledger_with(at(2, 0), &[(0.50, RiskLevel::Low), (0.60, RiskLevel::High)]);
    let current_path = store.persist(&mut current).expect("persist").expect("file");

    let past = store
        .list_past_sessions(Some(&current_path))
        .expect("list sessions");
    assert_eq!(past, vec![earlier_path.clone()]);

    let previous = store.load(&earlier_path).expect("load previous");
    let comparison = SessionComparison::between(&previous, current.records());
    assert!((comparison.previous_mean - 0.40).abs() < 1e-9);
    assert!((comparison.current_mean - 0.55).abs() < 1e-9);
    assert!((comparison.delta - 0.15).abs() < 1e-9);

    let hook: ComparisonHook = patient_comparison;
    let view = AnalyticsView::build(current.records(), Some(&previous), Some(hook));
    let extended = view.extended.expect("extended comparison");
    assert_eq!(extended.top_patients[0].name, "Patient 2");
    assert_eq!(view.outcome_counts[0].label, "Recurrence Likely");
    assert_eq!(view.outcome_counts[0].count, 2);
}

#[test]
fn legacy_session_files_still_compare() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = SessionStore::new(dir.path());
    fs::write(
        dir.path().join("session_2024-12-31_23-59.csv"),
        "Session ID,Timestamp,Name,Confidence_No,Confidence_Yes,Prediction,Risk,HighRisk\n\
         a1b2c3d4,2024-12-31 23:59:10,Old Patient,0.3,0.7,🔴 Recurrence Likely,High,1\n\
         e5f6a7b8,2024-12-31 23:59:40,Other,,,🟢 No Recurrence Expected,Low,0\n",
    )
    .expect("seed legacy file");

    let snapshot = store
        .load(std::path::Path::new("session_2024-12-31_23-59.csv"))
        .expect("bare file name resolves inside the session directory");
    assert_eq!(snapshot.records.len(), 2);
    assert_eq!(snapshot.confidence_yes(), vec![0.7]);

    let current = ledger_with(at(3, 0), &[(0.2, RiskLevel::Low)]);
    let comparison = SessionComparison::between(&snapshot, current.records());
    assert!((comparison.delta - (0.2 - 0.7)).abs() < 1e-9);

    let mut buffer = Vec::new();
    export_csv(&snapshot.records, &mut buffer).expect("csv export");
    let exported = String::from_utf8(buffer).expect("utf8");
    assert!(exported.contains(",Recurrence Likely,"));
    assert!(exported.contains("Other,,,No Recurrence Expected,Low,0"));
}

#[test]
fn report_lists_every_record_of_the_session() {
    let ledger = ledger_with(
        at(4, 0),
        &[(0.1, RiskLevel::Low), (0.45, RiskLevel::Intermediate)],
    );

    let mut buffer = Vec::new();
    TextTableReport::default()
        .render(ledger.records(), &mut buffer)
        .expect("report renders");
    let report = String::from_utf8(buffer).expect("utf8");

    assert!(report.lines().next().expect("title").contains(REPORT_TITLE));
    assert!(report.contains("| Patient 1 "));
    assert!(report.contains("| Borderline "));
    assert_eq!(report.lines().filter(|line| line.starts_with("| ")).count(), 1 + 2);
}
