//! Aggregates over a session's records, shared by the live ledger and
//! reloaded session files through [`HistoryRow`].

mod comparison;

pub use comparison::{
    patient_comparison, AnalyticsView, ComparisonHook, PatientComparison, PatientConfidence,
    SessionComparison, TOP_PATIENTS,
};

use crate::history::HistoryRow;
use serde::Serialize;
use std::collections::BTreeMap;

/// Frequency of one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Share of one outcome label in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelShare {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

/// One cell of the risk by prediction cross-tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownCell {
    pub risk: String,
    pub prediction: String,
    pub count: usize,
}

/// One point of the confidence-over-time chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidencePoint {
    pub index: usize,
    pub confidence_yes: Option<f64>,
    pub confidence_no: Option<f64>,
}

/// Arithmetic mean, 0.0 for an empty set.
pub fn mean_confidence_yes(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Current minus previous.
pub fn delta(previous: f64, current: f64) -> f64 {
    current - previous
}

/// Recurrence confidences of the rows that carry one.
pub fn confidence_values<R: HistoryRow>(rows: &[R]) -> Vec<f64> {
    rows.iter().filter_map(|row| row.confidence_yes()).collect()
}

fn value_counts<'a, I>(labels: I) -> Vec<LabelCount>
where
    I: Iterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }

    let mut counts: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();
    // Most frequent first, ties alphabetical.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Rows without a prediction are not counted.
pub fn outcome_counts<R: HistoryRow>(rows: &[R]) -> Vec<LabelCount> {
    value_counts(rows.iter().filter_map(|row| row.prediction()))
}

pub fn risk_counts<R: HistoryRow>(rows: &[R]) -> Vec<LabelCount> {
    value_counts(rows.iter().filter_map(|row| row.risk()))
}

/// Counts per (risk, prediction) pair, sorted by risk then prediction.
pub fn risk_outcome_breakdown<R: HistoryRow>(rows: &[R]) -> Vec<BreakdownCell> {
    let mut cells: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for row in rows {
        if let (Some(risk), Some(prediction)) = (row.risk(), row.prediction()) {
            *cells.entry((risk, prediction)).or_default() += 1;
        }
    }

    cells
        .into_iter()
        .map(|((risk, prediction), count)| BreakdownCell {
            risk: risk.to_string(),
            prediction: prediction.to_string(),
            count,
        })
        .collect()
}

pub fn outcome_split<R: HistoryRow>(rows: &[R]) -> Vec<LabelShare> {
    let counts = outcome_counts(rows);
    let total: usize = counts.iter().map(|entry| entry.count).sum();
    counts
        .into_iter()
        .map(|entry| LabelShare {
            percent: if total == 0 {
                0.0
            } else {
                entry.count as f64 * 100.0 / total as f64
            },
            label: entry.label,
            count: entry.count,
        })
        .collect()
}

/// The `n` rows with the highest recurrence confidence. Equal confidences
/// keep ledger order; rows without a confidence sort last.
pub fn top_by_confidence<R: HistoryRow>(rows: &[R], n: usize) -> Vec<&R> {
    let mut ranked: Vec<&R> = rows.iter().collect();
    ranked.sort_by(|a, b| match (a.confidence_yes(), b.confidence_yes()) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    ranked.truncate(n);
    ranked
}

pub fn confidence_series<R: HistoryRow>(rows: &[R]) -> Vec<ConfidencePoint> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| ConfidencePoint {
            index,
            confidence_yes: row.confidence_yes(),
            confidence_no: row.confidence_no(),
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::row;
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn mean_of_empty_set_is_zero() {
        assert_eq!(mean_confidence_yes(&[]), 0.0);
        assert!(approx(mean_confidence_yes(&[0.2, 0.4, 0.9]), 0.5));
    }

    #[test]
    fn delta_is_current_minus_previous() {
        assert!(approx(delta(0.40, 0.55), 0.15));
        assert!(approx(delta(0.55, 0.40), -0.15));
    }

    #[test]
    fn counts_group_by_label() {
        let rows = vec![
            row("A", Some(0.8), "Recurrence Likely", "High"),
            row("B", Some(0.1), "No Recurrence Expected", "Low"),
            row("C", Some(0.6), "Recurrence Likely", "Intermediate"),
            row("D", Some(0.4), "⚠️ Borderline", "High"),
        ];

        let outcomes = outcome_counts(&rows);
        assert_eq!(outcomes[0], LabelCount { label: "Recurrence Likely".into(), count: 2 });
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().any(|entry| entry.label == "Borderline"));

        let risks = risk_counts(&rows);
        assert_eq!(risks[0], LabelCount { label: "High".into(), count: 2 });

        let breakdown = risk_outcome_breakdown(&rows);
        assert_eq!(
            breakdown[0],
            BreakdownCell {
                risk: "High".into(),
                prediction: "Borderline".into(),
                count: 1
            }
        );
        assert_eq!(breakdown.len(), 4);

        let split = outcome_split(&rows);
        assert!(approx(split[0].percent, 50.0));
        assert!(approx(split.iter().map(|share| share.percent).sum::<f64>(), 100.0));
    }

    #[test]
    fn top_by_confidence_is_stable_and_skips_missing_values() {
        let rows = vec![
            row("A", Some(0.3), "Borderline", "Low"),
            row("B", None, "Borderline", "Low"),
            row("C", Some(0.9), "Recurrence Likely", "High"),
            row("D", Some(0.3), "No Recurrence Expected", "Low"),
        ];

        let names: Vec<_> = top_by_confidence(&rows, 3)
            .into_iter()
            .filter_map(|row| row.name.clone())
            .collect();
        assert_eq!(names, vec!["C", "A", "D"]);
        assert_eq!(top_by_confidence(&rows, 10).len(), 4);
    }

    #[test]
    fn series_is_indexed_from_zero() {
        let rows = vec![row("A", Some(0.25), "No Recurrence Expected", "Low")];
        let series = confidence_series(&rows);
        assert_eq!(series[0].index, 0);
        assert_eq!(series[0].confidence_yes, Some(0.25));
        assert_eq!(series[0].confidence_no, Some(0.75));
    }
}
