use super::{
    confidence_series, confidence_values, delta, mean_confidence_yes, outcome_counts,
    outcome_split, risk_counts, risk_outcome_breakdown, top_by_confidence, BreakdownCell,
    ConfidencePoint, LabelCount, LabelShare,
};
use crate::history::{HistoryRow, PredictionRecord, SessionSnapshot};
use serde::Serialize;

pub const TOP_PATIENTS: usize = 5;

/// Mean recurrence confidence of a past session against the current one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionComparison {
    pub previous_file: String,
    pub previous_mean: f64,
    pub current_mean: f64,
    pub delta: f64,
    pub previous_distribution: Vec<f64>,
    pub current_distribution: Vec<f64>,
}

impl SessionComparison {
    /// A past file without a `Confidence_Yes` column compares as an empty
    /// distribution with a mean of zero.
    pub fn between<R: HistoryRow>(previous: &SessionSnapshot, current: &[R]) -> Self {
        let previous_distribution = previous.confidence_yes();
        let current_distribution = confidence_values(current);
        let previous_mean = mean_confidence_yes(&previous_distribution);
        let current_mean = mean_confidence_yes(&current_distribution);

        Self {
            previous_file: previous.file_name(),
            previous_mean,
            current_mean,
            delta: delta(previous_mean, current_mean),
            previous_distribution,
            current_distribution,
        }
    }
}

/// One patient's entry in the extended dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientConfidence {
    pub name: String,
    pub confidence_yes: Option<f64>,
    pub prediction: Option<String>,
    pub risk: Option<String>,
}

impl PatientConfidence {
    fn from_row<R: HistoryRow>(row: &R) -> Self {
        Self {
            name: row.name().unwrap_or_default().to_string(),
            confidence_yes: row.confidence_yes(),
            prediction: row.prediction().map(str::to_string),
            risk: row.risk().map(str::to_string),
        }
    }
}

/// Extended per-patient dashboard for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientComparison {
    pub top_patients: Vec<PatientConfidence>,
    pub confidence_by_patient: Vec<PatientConfidence>,
    pub risk_breakdown: Vec<BreakdownCell>,
    pub prediction_split: Vec<LabelShare>,
}

/// Optional extended comparison supplied by the caller.
pub type ComparisonHook = fn(&[PredictionRecord]) -> PatientComparison;

pub fn patient_comparison<R: HistoryRow>(rows: &[R]) -> PatientComparison {
    PatientComparison {
        top_patients: top_by_confidence(rows, TOP_PATIENTS)
            .into_iter()
            .map(PatientConfidence::from_row)
            .collect(),
        confidence_by_patient: rows.iter().map(PatientConfidence::from_row).collect(),
        risk_breakdown: risk_outcome_breakdown(rows),
        prediction_split: outcome_split(rows),
    }
}

/// Everything the analytics screen shows for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsView {
    pub total_predictions: usize,
    pub mean_confidence_yes: f64,
    pub comparison: Option<SessionComparison>,
    pub series: Vec<ConfidencePoint>,
    pub outcome_counts: Vec<LabelCount>,
    pub risk_counts: Vec<LabelCount>,
    pub extended: Option<PatientComparison>,
}

impl AnalyticsView {
    /// The comparison and the extended dashboard are only produced when
    /// the current session has predictions.
    pub fn build(
        current: &[PredictionRecord],
        previous: Option<&SessionSnapshot>,
        extended: Option<ComparisonHook>,
    ) -> Self {
        let has_history = !current.is_empty();

        Self {
            total_predictions: current.len(),
            mean_confidence_yes: mean_confidence_yes(&confidence_values(current)),
            comparison: previous
                .filter(|_| has_history)
                .map(|snapshot| SessionComparison::between(snapshot, current)),
            series: confidence_series(current),
            outcome_counts: outcome_counts(current),
            risk_counts: risk_counts(current),
            extended: extended
                .filter(|_| has_history)
                .map(|hook| hook(current)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_predictions == 0
    }
}
