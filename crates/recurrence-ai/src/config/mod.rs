use crate::narration::{Language, NarrationSettings, Voice};
use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "trained_model/thyroid_recurrence_rf.json";
pub const DEFAULT_SESSION_DIR: &str = "output/sessions";
pub const DEFAULT_NARRATION_COMMAND: &str = "espeak-ng";

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub model: ModelConfig,
    pub history: HistoryConfig,
    pub narration: NarrationConfig,
    pub telemetry: TelemetryConfig,
    pub demo_data: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let model_path = env::var("RECURRENCE_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH));
        let session_dir = env::var("RECURRENCE_SESSION_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_DIR));

        let enabled = read_flag("NARRATION_ENABLED", false)?;
        let language = match env::var("NARRATION_LANGUAGE") {
            Ok(raw) => raw.parse::<Language>().map_err(|_| ConfigError::InvalidValue {
                variable: "NARRATION_LANGUAGE",
                value: raw,
            })?,
            Err(_) => Language::English,
        };
        let voice = match env::var("NARRATION_VOICE") {
            Ok(raw) => raw.parse::<Voice>().map_err(|_| ConfigError::InvalidValue {
                variable: "NARRATION_VOICE",
                value: raw,
            })?,
            Err(_) => Voice::Female,
        };
        let command = env::var("NARRATION_COMMAND")
            .unwrap_or_else(|_| DEFAULT_NARRATION_COMMAND.to_string());

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let demo_data = read_flag("DEMO_DATA", false)?;

        Ok(Self {
            environment,
            model: ModelConfig { path: model_path },
            history: HistoryConfig { session_dir },
            narration: NarrationConfig {
                settings: NarrationSettings::new(enabled, language, voice),
                command,
            },
            telemetry: TelemetryConfig { log_level },
            demo_data,
        })
    }
}

fn read_flag(variable: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(variable) else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "enabled" => Ok(true),
        "0" | "false" | "no" | "off" | "disabled" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            variable,
            value: raw,
        }),
    }
}

/// Location of the serialized classifier artifact.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub path: PathBuf,
}

/// Directory holding one persisted CSV per session.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub session_dir: PathBuf,
}

/// Text-to-speech preferences plus the local engine to invoke.
#[derive(Debug, Clone)]
pub struct NarrationConfig {
    pub settings: NarrationSettings,
    pub command: String,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue {
        variable: &'static str,
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { variable, value } => {
                write!(f, "{variable} has an unsupported value '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
