use super::{Language, NarrationError, NarrationScript, Narrator, Voice};
use std::process::{Command, Stdio};
use tracing::debug;

/// Words per minute passed to the speech engine.
pub const SPEECH_RATE: u32 = 160;

/// Speaks through a local espeak-compatible command line engine.
#[derive(Debug, Clone)]
pub struct CommandNarrator {
    command: String,
}

impl CommandNarrator {
    pub fn new<S: Into<String>>(command: S) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn voice_id(language: Language, voice: Voice) -> &'static str {
        match (language, voice) {
            (Language::Hindi, _) => "hi",
            (Language::English, Voice::Male) => "en+m3",
            (Language::English, Voice::Female) => "en+f3",
        }
    }
}

impl Narrator for CommandNarrator {
    fn speak(&self, script: &NarrationScript, voice: Voice) -> Result<(), NarrationError> {
        let text = script.text().replace(['\n', '\r'], " ");
        if text.trim().is_empty() {
            return Ok(());
        }

        let voice_id = Self::voice_id(script.language(), voice);
        debug!(command = %self.command, voice = voice_id, "invoking speech engine");

        let status = Command::new(&self.command)
            .arg("-v")
            .arg(voice_id)
            .arg("-s")
            .arg(SPEECH_RATE.to_string())
            .arg(&text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| NarrationError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(NarrationError::Exited {
                command: self.command.clone(),
                status: status.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Outcome;

    fn script() -> NarrationScript {
        NarrationScript::compose(Outcome::RecurrenceLikely, 0.7, Some("Asha"), Language::English)
    }

    #[test]
    fn voices_map_to_engine_identifiers() {
        assert_eq!(CommandNarrator::voice_id(Language::English, Voice::Male), "en+m3");
        assert_eq!(CommandNarrator::voice_id(Language::English, Voice::Female), "en+f3");
        assert_eq!(CommandNarrator::voice_id(Language::Hindi, Voice::Male), "hi");
    }

    #[test]
    fn missing_engine_is_a_spawn_error() {
        let narrator = CommandNarrator::new("definitely-not-a-speech-engine");
        match narrator.speak(&script(), Voice::Female) {
            Err(NarrationError::Spawn { command, .. }) => {
                assert_eq!(command, "definitely-not-a-speech-engine")
            }
            other => panic!("expected spawn error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_reported() {
        let narrator = CommandNarrator::new("false");
        match narrator.speak(&script(), Voice::Male) {
            Err(NarrationError::Exited { command, .. }) => assert_eq!(command, "false"),
            other => panic!("expected exit error, got {other:?}"),
        }
    }
}
