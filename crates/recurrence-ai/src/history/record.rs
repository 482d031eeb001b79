use super::{HistoryRow, COLUMN_COUNT};
use crate::clinical::RiskLevel;
use crate::decision::{Decision, Outcome};
use crate::model::ClassProbabilities;
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Short opaque token identifying one prediction row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        let token = Uuid::new_v4().simple().to_string();
        Self(token[..8].to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Two decimal places, as stored in history files. Halves go to the even digit.
pub fn round_confidence(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// One ledger row. Created once per successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    #[serde(rename = "Session ID")]
    pub session_id: SessionId,
    #[serde(rename = "Timestamp", serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Confidence_No")]
    pub confidence_no: f64,
    #[serde(rename = "Confidence_Yes")]
    pub confidence_yes: f64,
    #[serde(rename = "Prediction")]
    pub prediction: Outcome,
    #[serde(rename = "Risk")]
    pub risk: RiskLevel,
    #[serde(rename = "HighRisk", serialize_with = "serialize_flag")]
    pub high_risk: bool,
}

impl PredictionRecord {
    pub fn new(
        name: String,
        timestamp: NaiveDateTime,
        probabilities: ClassProbabilities,
        decision: &Decision,
        risk: RiskLevel,
    ) -> Self {
        // The stored pair must still sum to one after rounding.
        let confidence_yes = round_confidence(probabilities.recurrence);
        Self {
            session_id: SessionId::generate(),
            timestamp,
            name,
            confidence_no: round_confidence(1.0 - confidence_yes),
            confidence_yes,
            prediction: decision.outcome,
            risk,
            high_risk: decision.high_risk,
        }
    }
}

fn serialize_timestamp<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
}

fn serialize_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

impl HistoryRow for PredictionRecord {
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn confidence_no(&self) -> Option<f64> {
        Some(self.confidence_no)
    }

    fn confidence_yes(&self) -> Option<f64> {
        Some(self.confidence_yes)
    }

    fn prediction(&self) -> Option<&str> {
        Some(self.prediction.label())
    }

    fn risk(&self) -> Option<&str> {
        Some(self.risk.label())
    }

    fn cells(&self) -> [String; COLUMN_COUNT] {
        [
            self.session_id.to_string(),
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.name.clone(),
            self.confidence_no.to_string(),
            self.confidence_yes.to_string(),
            self.prediction.label().to_string(),
            self.risk.label().to_string(),
            u8::from(self.high_risk).to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn record_rounds_confidences_and_echoes_inputs() {
        let at = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 26, 53)
            .unwrap();
        let probabilities = ClassProbabilities {
            no_recurrence: 0.5861,
            recurrence: 0.4139,
        };
        let decision = Decision::evaluate(probabilities.recurrence, true);

        let record =
            PredictionRecord::new("Patient 1".to_string(), at, probabilities, &decision, RiskLevel::High);

        assert_eq!(record.session_id.0.len(), 8);
        assert_eq!(record.confidence_no, 0.59);
        assert_eq!(record.confidence_yes, 0.41);
        assert_eq!(record.prediction, Outcome::RecurrenceLikely);
        assert_eq!(
            record.cells()[1..],
            [
                "2025-03-14 09:26:53".to_string(),
                "Patient 1".to_string(),
                "0.59".to_string(),
                "0.41".to_string(),
                "Recurrence Likely".to_string(),
                "High".to_string(),
                "1".to_string(),
            ]
        );
    }

    #[test]
    fn half_cent_confidences_round_to_even_and_sum_to_one() {
        let at = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let probabilities = ClassProbabilities::from_weights(7.0, 1.0).expect("valid weights");
        let decision = Decision::evaluate(probabilities.recurrence, false);

        let record =
            PredictionRecord::new("Patient 2".to_string(), at, probabilities, &decision, RiskLevel::Low);

        assert_eq!(record.confidence_no, 0.88);
        assert_eq!(record.confidence_yes, 0.12);
        assert!((record.confidence_no + record.confidence_yes - 1.0).abs() < 1e-9);
        assert_eq!(round_confidence(0.125), 0.12);
        assert_eq!(round_confidence(0.375), 0.38);
    }

    #[test]
    fn session_ids_are_distinct() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }
}
