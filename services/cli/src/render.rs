use recurrence_ai::analytics::{AnalyticsView, LabelCount, PatientComparison, SessionComparison};
use recurrence_ai::history::SessionSnapshot;
use recurrence_ai::session::PredictionResult;

pub(crate) fn render_prediction(result: &PredictionResult) {
    let record = &result.record;
    println!("Prediction for {}", record.name);
    println!("- Outcome: {}", result.decision.outcome);
    println!(
        "- Confidence: recurrence {:.2} | no recurrence {:.2}",
        record.confidence_yes, record.confidence_no
    );
    if result.decision.high_risk {
        println!(
            "- High risk: stage {} / {}",
            result.profile.stage, result.profile.metastasis
        );
    }
    if let Some(caution) = result.decision.caution {
        println!("- Caution: {caution}");
    }
    match &result.session_file {
        Some(path) => println!("- Session file: {}", path.display()),
        None => println!("- Session file: not written"),
    }
}

fn render_counts(title: &str, counts: &[LabelCount]) {
    println!("{title}");
    if counts.is_empty() {
        println!("  - none");
    }
    for entry in counts {
        println!("  - {}: {}", entry.label, entry.count);
    }
}

pub(crate) fn render_analytics(view: &AnalyticsView) {
    if view.is_empty() {
        println!("No predictions made yet.");
        return;
    }

    println!("Predictions: {}", view.total_predictions);
    println!("Average recurrence confidence: {:.2}", view.mean_confidence_yes);
    if let Some(comparison) = &view.comparison {
        render_comparison(comparison);
    }
    println!("Confidence over time");
    for point in &view.series {
        println!(
            "  #{:<3} yes {} | no {}",
            point.index,
            optional(point.confidence_yes),
            optional(point.confidence_no)
        );
    }
    render_counts("Recurrence prediction breakdown", &view.outcome_counts);
    render_counts("Risk category overview", &view.risk_counts);
    if let Some(extended) = &view.extended {
        render_patient_comparison(extended);
    }
}

pub(crate) fn render_comparison(comparison: &SessionComparison) {
    println!("Comparing with: {}", comparison.previous_file);
    println!(
        "- Avg recurrence confidence (current): {:.2} (delta {:+.2})",
        comparison.current_mean, comparison.delta
    );
    println!("- Avg recurrence confidence (previous): {:.2}", comparison.previous_mean);
    println!(
        "- Samples: {} previous | {} current",
        comparison.previous_distribution.len(),
        comparison.current_distribution.len()
    );
}

pub(crate) fn render_patient_comparison(comparison: &PatientComparison) {
    println!("Patient comparison");
    println!("Top risk patients");
    for patient in &comparison.top_patients {
        println!(
            "  - {}: {} ({})",
            patient.name,
            optional(patient.confidence_yes),
            patient.prediction.as_deref().unwrap_or("unknown")
        );
    }
    println!("Confidence by patient");
    for patient in &comparison.confidence_by_patient {
        let bar_len = patient
            .confidence_yes
            .map(|value| (value.clamp(0.0, 1.0) * 20.0).round() as usize)
            .unwrap_or(0);
        println!(
            "  {:<20} {:<20} {}",
            patient.name,
            "#".repeat(bar_len),
            optional(patient.confidence_yes)
        );
    }
    println!("Risk category breakdown");
    for cell in &comparison.risk_breakdown {
        println!("  - {} / {}: {}", cell.risk, cell.prediction, cell.count);
    }
    println!("Prediction split");
    for share in &comparison.prediction_split {
        println!("  - {}: {:.1}%", share.label, share.percent);
    }
}

pub(crate) fn render_snapshot_summary(snapshot: &SessionSnapshot) {
    println!("Session: {}", snapshot.file_name());
    println!("- Rows: {}", snapshot.records.len());
    if snapshot.skipped_rows > 0 {
        println!("- Unreadable rows skipped: {}", snapshot.skipped_rows);
    }
    if !snapshot.has_column("Confidence_Yes") {
        println!("- No Confidence_Yes column; confidence aggregates are empty");
    }
}

fn optional(value: Option<f64>) -> String {
    value
        .map(|value| format!("{value:.2}"))
        .unwrap_or_else(|| "-".to_string())
}
