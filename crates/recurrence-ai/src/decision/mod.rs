//! Rule layer on top of the classifier's recurrence probability.

mod outcome;

pub use outcome::{Outcome, UnknownOutcome};

use crate::clinical::{MetastasisStage, OverallStage};
use serde::Serialize;

pub const LIKELY_THRESHOLD: f64 = 0.5;
pub const HIGH_RISK_LIKELY_THRESHOLD: f64 = 0.35;
pub const BORDERLINE_FLOOR: f64 = 0.30;

pub const BORDERLINE_CAUTION: &str =
    "Borderline case: Please consider further testing and specialist evaluation.";

/// Stage IVA/IVB or distant metastasis. A fixed lookup, never learned.
pub fn is_high_risk(stage: OverallStage, metastasis: MetastasisStage) -> bool {
    matches!(stage, OverallStage::IVA | OverallStage::IVB) || metastasis == MetastasisStage::M1
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decision {
    pub outcome: Outcome,
    pub high_risk: bool,
    /// Non-blocking warning attached to borderline results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caution: Option<&'static str>,
}

impl Decision {
    /// Rules are checked in order and the first match wins. A high-risk
    /// patient with confidence in [0.35, 0.50) therefore lands on
    /// `RecurrenceLikely` even though that range overlaps the borderline band.
    pub fn evaluate(confidence_yes: f64, high_risk: bool) -> Self {
        let outcome = if confidence_yes >= LIKELY_THRESHOLD
            || (confidence_yes >= HIGH_RISK_LIKELY_THRESHOLD && high_risk)
        {
            Outcome::RecurrenceLikely
        } else if confidence_yes > BORDERLINE_FLOOR && confidence_yes < LIKELY_THRESHOLD {
            Outcome::Borderline
        } else {
            Outcome::NoRecurrenceExpected
        };

        let caution = (outcome == Outcome::Borderline).then_some(BORDERLINE_CAUTION);

        Self {
            outcome,
            high_risk,
            caution,
        }
    }
}
