use crate::cli::RuntimeArgs;
use chrono::{Local, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use recurrence_ai::config::AppConfig;
use recurrence_ai::error::AppError;
use recurrence_ai::history::SessionStore;
use recurrence_ai::model::cached_model;
use recurrence_ai::narration::{CommandNarrator, Language, NarrationSettings, Voice};
use recurrence_ai::session::PredictionSession;
use recurrence_ai::telemetry;
use serde::Serialize;
use tracing::info;

pub(crate) fn parse_language(raw: &str) -> Result<Language, String> {
    raw.parse::<Language>()
        .map_err(|_| format!("'{raw}' is not a narration language (English or Hindi)"))
}

pub(crate) fn parse_voice(raw: &str) -> Result<Voice, String> {
    raw.parse::<Voice>()
        .map_err(|_| format!("'{raw}' is not a narration voice (Male or Female)"))
}

/// Loads configuration, applies command line overrides and starts logging.
pub(crate) fn load_config(runtime: &RuntimeArgs) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    apply_overrides(&mut config, runtime);
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

pub(crate) fn apply_overrides(config: &mut AppConfig, runtime: &RuntimeArgs) {
    if let Some(model) = &runtime.model {
        config.model.path = model.clone();
    }
    if let Some(dir) = &runtime.session_dir {
        config.history.session_dir = dir.clone();
    }

    let current = &config.narration.settings;
    let enabled = current.enabled || runtime.narrate;
    let language = runtime.language.unwrap_or(current.language);
    let voice = runtime.voice.unwrap_or(current.voice);
    config.narration.settings = NarrationSettings::new(enabled, language, voice);
}

pub(crate) fn session_store(config: &AppConfig) -> SessionStore {
    SessionStore::new(config.history.session_dir.clone())
}

/// Wires the cached classifier, session store and narrator into a new session.
pub(crate) fn open_session(config: &AppConfig) -> Result<PredictionSession, AppError> {
    let model = cached_model(&config.model.path)?;
    info!(?config.environment, model = %model.describe(), "prediction session started");

    Ok(PredictionSession::new(
        model,
        session_store(config),
        config.narration.settings.clone(),
        Box::new(CommandNarrator::new(config.narration.command.clone())),
        now(),
    ))
}

pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Seeded when reproducible demo patients are wanted.
pub(crate) fn demo_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use recurrence_ai::config::{
        AppEnvironment, HistoryConfig, ModelConfig, NarrationConfig, TelemetryConfig,
    };
    use std::path::PathBuf;

    fn config() -> AppConfig {
        AppConfig {
            environment: AppEnvironment::Test,
            model: ModelConfig {
                path: PathBuf::from("model.json"),
            },
            history: HistoryConfig {
                session_dir: PathBuf::from("sessions"),
            },
            narration: NarrationConfig {
                settings: NarrationSettings::disabled(),
                command: "espeak-ng".to_string(),
            },
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
            demo_data: false,
        }
    }

    #[test]
    fn overrides_replace_configured_values() {
        let mut config = config();
        let runtime = RuntimeArgs {
            model: Some(PathBuf::from("other.json")),
            session_dir: Some(PathBuf::from("elsewhere")),
            narrate: true,
            language: Some(Language::Hindi),
            voice: Some(Voice::Male),
        };

        apply_overrides(&mut config, &runtime);

        assert_eq!(config.model.path, PathBuf::from("other.json"));
        assert_eq!(config.history.session_dir, PathBuf::from("elsewhere"));
        assert!(config.narration.settings.enabled);
        assert_eq!(config.narration.settings.language, Language::Hindi);
        assert_eq!(config.narration.settings.voice, Voice::Female);
    }

    #[test]
    fn no_overrides_keep_the_environment() {
        let mut config = config();
        apply_overrides(&mut config, &RuntimeArgs::default());

        assert_eq!(config.model.path, PathBuf::from("model.json"));
        assert!(!config.narration.settings.enabled);
    }
}
