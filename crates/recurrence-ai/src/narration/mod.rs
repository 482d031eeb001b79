//! Spoken summaries of a prediction. Narration is a side channel: a
//! failure here is logged and never reaches the prediction or the ledger.

mod command;
mod script;

pub use command::{CommandNarrator, SPEECH_RATE};
pub use script::NarrationScript;

use crate::decision::Outcome;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Hindi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Voice {
    Male,
    Female,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOption(pub String);

impl fmt::Display for UnknownOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported narration option '{}'", self.0)
    }
}

impl std::error::Error for UnknownOption {}

impl FromStr for Language {
    type Err = UnknownOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Self::English),
            "hindi" | "hi" => Ok(Self::Hindi),
            _ => Err(UnknownOption(value.to_string())),
        }
    }
}

impl FromStr for Voice {
    type Err = UnknownOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            _ => Err(UnknownOption(value.to_string())),
        }
    }
}

/// User preferences for narration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationSettings {
    pub enabled: bool,
    pub language: Language,
    pub voice: Voice,
}

impl NarrationSettings {
    /// Hindi has a single female voice, so the requested voice is ignored.
    pub fn new(enabled: bool, language: Language, voice: Voice) -> Self {
        let voice = match language {
            Language::Hindi => Voice::Female,
            Language::English => voice,
        };
        Self {
            enabled,
            language,
            voice,
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, Language::English, Voice::Female)
    }
}

impl Default for NarrationSettings {
    fn default() -> Self {
        Self::disabled()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NarrationError {
    #[error("failed to start speech engine '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("speech engine '{command}' exited with {status}")]
    Exited { command: String, status: String },
}

/// Anything that can speak a composed script.
pub trait Narrator: Send + Sync {
    fn speak(&self, script: &NarrationScript, voice: Voice) -> Result<(), NarrationError>;
}

/// Speaks the result when narration is enabled. Returns whether the
/// narrator reported success; errors are only logged.
pub fn narrate(
    narrator: &dyn Narrator,
    settings: &NarrationSettings,
    outcome: Outcome,
    confidence_yes: f64,
    name: Option<&str>,
) -> bool {
    if !settings.enabled {
        return false;
    }

    let script = NarrationScript::compose(outcome, confidence_yes, name, settings.language);
    match narrator.speak(&script, settings.voice) {
        Ok(()) => {
            debug!(language = ?settings.language, "narration delivered");
            true
        }
        Err(err) => {
            warn!(error = %err, "narration failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNarrator {
        spoken: Mutex<Vec<(String, Voice)>>,
        fail: bool,
    }

    impl Narrator for RecordingNarrator {
        fn speak(&self, script: &NarrationScript, voice: Voice) -> Result<(), NarrationError> {
            if self.fail {
                return Err(NarrationError::Exited {
                    command: "tts".to_string(),
                    status: "exit status: 1".to_string(),
                });
            }
            self.spoken
                .lock()
                .expect("narrator mutex poisoned")
                .push((script.text().to_string(), voice));
            Ok(())
        }
    }

    #[test]
    fn parses_language_and_voice_case_insensitively() {
        assert_eq!("hindi".parse::<Language>(), Ok(Language::Hindi));
        assert_eq!(" English ".parse::<Language>(), Ok(Language::English));
        assert_eq!("FEMALE".parse::<Voice>(), Ok(Voice::Female));
        assert!("Tamil".parse::<Language>().is_err());
    }

    #[test]
    fn hindi_always_uses_the_female_voice() {
        let settings = NarrationSettings::new(true, Language::Hindi, Voice::Male);
        assert_eq!(settings.voice, Voice::Female);

        let english = NarrationSettings::new(true, Language::English, Voice::Male);
        assert_eq!(english.voice, Voice::Male);
    }

    #[test]
    fn disabled_settings_never_reach_the_narrator() {
        let narrator = RecordingNarrator::default();
        let spoken = narrate(
            &narrator,
            &NarrationSettings::disabled(),
            Outcome::RecurrenceLikely,
            0.8,
            Some("Asha"),
        );

        assert!(!spoken);
        assert!(narrator.spoken.lock().expect("lock").is_empty());
    }

    #[test]
    fn failures_are_swallowed() {
        let narrator = RecordingNarrator {
            fail: true,
            ..RecordingNarrator::default()
        };
        let settings = NarrationSettings::new(true, Language::English, Voice::Male);

        assert!(!narrate(&narrator, &settings, Outcome::Borderline, 0.42, None));
    }

    #[test]
    fn enabled_narration_speaks_with_the_selected_voice() {
        let narrator = RecordingNarrator::default();
        let settings = NarrationSettings::new(true, Language::English, Voice::Male);

        assert!(narrate(&narrator, &settings, Outcome::NoRecurrenceExpected, 0.12, Some("Asha")));
        let spoken = narrator.spoken.lock().expect("lock");
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].1, Voice::Male);
        assert!(spoken[0].0.starts_with("Prediction for Asha."));
    }
}
