use crate::batch::{run_batch, BatchArgs};
use crate::export::{run_export, ExportArgs};
use crate::predict::{run_predict, PredictArgs};
use crate::sessions::{run_sessions, SessionsCommand};
use clap::{Args, Parser, Subcommand};
use recurrence_ai::error::AppError;
use recurrence_ai::narration::{Language, Voice};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Thyroid Recurrence Assistant",
    about = "Estimate thyroid cancer recurrence risk and review prediction sessions",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Predict recurrence for one patient
    Predict(PredictArgs),
    /// Run every patient row of a CSV file through one session
    Batch(BatchArgs),
    /// Inspect and compare persisted sessions
    Sessions {
        #[command(subcommand)]
        command: SessionsCommand,
    },
    /// Export a persisted session as CSV or a text report
    Export(ExportArgs),
}

/// Overrides for values otherwise read from the environment.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct RuntimeArgs {
    /// Model artifact to load instead of RECURRENCE_MODEL_PATH
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Session directory to use instead of RECURRENCE_SESSION_DIR
    #[arg(long)]
    pub(crate) session_dir: Option<PathBuf>,
    /// Speak each result aloud
    #[arg(long)]
    pub(crate) narrate: bool,
    /// Narration language (English or Hindi)
    #[arg(long, value_parser = crate::infra::parse_language)]
    pub(crate) language: Option<Language>,
    /// Narration voice (Male or Female, English only)
    #[arg(long, value_parser = crate::infra::parse_voice)]
    pub(crate) voice: Option<Voice>,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Predict(args) => run_predict(args),
        Command::Batch(args) => run_batch(args),
        Command::Sessions { command } => run_sessions(command),
        Command::Export(args) => run_export(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_predict_with_patient_fields() {
        let cli = Cli::try_parse_from([
            "recurrence-ai-cli",
            "predict",
            "--name",
            "Meera",
            "--age",
            "61",
            "--stage",
            "IVA",
            "--metastasis",
            "M1",
            "--narrate",
            "--language",
            "hindi",
        ])
        .expect("valid arguments");

        match cli.command {
            Command::Predict(args) => {
                assert_eq!(args.patient.name.as_deref(), Some("Meera"));
                assert_eq!(args.patient.age, 61);
                assert_eq!(args.patient.stage, "IVA");
                assert_eq!(args.patient.metastasis, "M1");
                assert_eq!(args.patient.gender, "F");
                assert!(args.runtime.narrate);
                assert_eq!(args.runtime.language, Some(Language::Hindi));
                assert!(!args.demo);
            }
            other => panic!("expected predict command, got {other:?}"),
        }
    }

    #[test]
    fn parses_session_compare() {
        let cli = Cli::try_parse_from([
            "recurrence-ai-cli",
            "sessions",
            "compare",
            "session_2025-01-01_09-00.csv",
            "--current",
            "session_2025-01-02_10-30.csv",
            "--extended",
        ])
        .expect("valid arguments");

        match cli.command {
            Command::Sessions {
                command: SessionsCommand::Compare(args),
            } => {
                assert_eq!(args.previous, PathBuf::from("session_2025-01-01_09-00.csv"));
                assert_eq!(args.current, Some(PathBuf::from("session_2025-01-02_10-30.csv")));
                assert!(args.extended);
            }
            other => panic!("expected sessions compare, got {other:?}"),
        }
    }

    #[test]
    fn parses_batch_with_live_comparison() {
        let cli = Cli::try_parse_from([
            "recurrence-ai-cli",
            "batch",
            "--input",
            "clinic.csv",
            "--compare",
            "session_2025-01-01_09-00.csv",
            "--list-past",
        ])
        .expect("valid arguments");

        match cli.command {
            Command::Batch(args) => {
                assert_eq!(args.input, PathBuf::from("clinic.csv"));
                assert_eq!(args.compare, Some(PathBuf::from("session_2025-01-01_09-00.csv")));
                assert!(args.list_past);
                assert!(!args.extended);
            }
            other => panic!("expected batch command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_voice() {
        let error = Cli::try_parse_from(["recurrence-ai-cli", "predict", "--voice", "robot"])
            .expect_err("voice must be Male or Female");
        assert!(error.to_string().contains("robot"));
    }
}
