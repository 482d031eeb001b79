use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three mutually exclusive results shown to the clinician.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Outcome {
    RecurrenceLikely,
    Borderline,
    NoRecurrenceExpected,
}

impl Outcome {
    pub const fn ordered() -> [Self; 3] {
        [
            Self::RecurrenceLikely,
            Self::Borderline,
            Self::NoRecurrenceExpected,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::RecurrenceLikely => "Recurrence Likely",
            Self::Borderline => "Borderline",
            Self::NoRecurrenceExpected => "No Recurrence Expected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a known prediction label")]
pub struct UnknownOutcome(pub String);

impl FromStr for Outcome {
    type Err = UnknownOutcome;

    /// Accepts the plain labels as well as older history files whose labels
    /// carry a leading status symbol (for example "⚠️ Borderline").
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let stripped = value
            .trim()
            .trim_start_matches(|c: char| !c.is_ascii_alphanumeric())
            .trim();

        Self::ordered()
            .into_iter()
            .find(|outcome| outcome.label().eq_ignore_ascii_case(stripped))
            .ok_or_else(|| UnknownOutcome(value.to_string()))
    }
}

impl TryFrom<String> for Outcome {
    type Error = UnknownOutcome;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Outcome> for &'static str {
    fn from(value: Outcome) -> Self {
        value.label()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
