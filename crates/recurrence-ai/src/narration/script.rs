use super::Language;
use crate::decision::Outcome;

/// Text to be spoken for one prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationScript {
    language: Language,
    text: String,
}

impl NarrationScript {
    pub fn compose(
        outcome: Outcome,
        confidence_yes: f64,
        name: Option<&str>,
        language: Language,
    ) -> Self {
        let name = name.map(str::trim).filter(|name| !name.is_empty());
        let percent = confidence_yes * 100.0;

        let text = match language {
            Language::English => {
                let summary = match name {
                    Some(name) => format!(
                        "Prediction for {name}. Confidence of recurrence is {percent:.1} percent."
                    ),
                    None => "Prediction completed.".to_string(),
                };
                format!("{summary} {}", english_result(outcome))
            }
            Language::Hindi => {
                let opening = match name {
                    Some(name) => format!("{name} के लिए अनुमान।"),
                    None => "अनुमान पूरा हुआ।".to_string(),
                };
                format!(
                    "{opening} कैंसर की पुनरावृत्ति की संभावना {percent:.1} प्रतिशत है। परिणाम: {}",
                    hindi_result(outcome)
                )
            }
        };

        Self { language, text }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

fn english_result(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::RecurrenceLikely => "Recurrence is likely.",
        Outcome::Borderline => {
            "Recurrence is borderline. Please consider further testing and specialist evaluation."
        }
        Outcome::NoRecurrenceExpected => "No recurrence expected.",
    }
}

fn hindi_result(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::RecurrenceLikely => "कैंसर की पुनरावृत्ति की संभावना है",
        Outcome::Borderline => {
            "कैंसर की अनिश्चितता का मामला, कृपया आगे के परीक्षण और विशेषज्ञ मूल्यांकन पर विचार करें"
        }
        Outcome::NoRecurrenceExpected => "कैंसर की पुनरावृत्ति की संभावना नहीं है",
    }
}
