use crate::cli::RuntimeArgs;
use crate::infra::{load_config, print_json, session_store};
use crate::render::{render_comparison, render_patient_comparison, render_snapshot_summary};
use clap::{Args, Subcommand};
use recurrence_ai::analytics::{
    confidence_values, mean_confidence_yes, outcome_counts, patient_comparison, risk_counts,
    SessionComparison,
};
use recurrence_ai::error::AppError;
use recurrence_ai::export::{ReportRenderer, TextTableReport};
use recurrence_ai::history::SessionStore;
use std::io;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub(crate) enum SessionsCommand {
    /// List persisted session files
    List(SessionDirArgs),
    /// Show one session as a table with its aggregates
    Show(ShowArgs),
    /// Compare the mean recurrence confidence of two sessions
    Compare(CompareArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct SessionDirArgs {
    /// Session directory to use instead of RECURRENCE_SESSION_DIR
    #[arg(long)]
    pub(crate) session_dir: Option<PathBuf>,
}

impl SessionDirArgs {
    pub(crate) fn runtime(&self) -> RuntimeArgs {
        RuntimeArgs {
            session_dir: self.session_dir.clone(),
            ..RuntimeArgs::default()
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ShowArgs {
    /// Session file name or path
    pub(crate) file: PathBuf,
    #[command(flatten)]
    pub(crate) dir: SessionDirArgs,
}

#[derive(Args, Debug)]
pub(crate) struct CompareArgs {
    /// Earlier session file name or path
    pub(crate) previous: PathBuf,
    /// Session to compare against (defaults to the newest other session)
    #[arg(long)]
    pub(crate) current: Option<PathBuf>,
    /// Include the per-patient comparison of the current session
    #[arg(long)]
    pub(crate) extended: bool,
    /// Print the comparison as JSON
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) dir: SessionDirArgs,
}

pub(crate) fn run_sessions(command: SessionsCommand) -> Result<(), AppError> {
    match command {
        SessionsCommand::List(dir) => {
            let store = open_store(&dir)?;
            let sessions = store.list_past_sessions(None)?;
            if sessions.is_empty() {
                println!("No saved sessions in {}", store.dir().display());
            }
            for path in sessions {
                println!("{}", path.display());
            }
            Ok(())
        }
        SessionsCommand::Show(args) => {
            let store = open_store(&args.dir)?;
            let snapshot = store.load(&args.file)?;
            render_snapshot_summary(&snapshot);

            let confidences = confidence_values(&snapshot.records);
            println!("- Average recurrence confidence: {:.2}", mean_confidence_yes(&confidences));
            for entry in outcome_counts(&snapshot.records) {
                println!("- {}: {}", entry.label, entry.count);
            }
            for entry in risk_counts(&snapshot.records) {
                println!("- Risk {}: {}", entry.label, entry.count);
            }
            if !snapshot.records.is_empty() {
                println!();
                TextTableReport::default().render(&snapshot.records, io::stdout().lock())?;
            }
            Ok(())
        }
        SessionsCommand::Compare(args) => run_compare(args),
    }
}

fn open_store(dir: &SessionDirArgs) -> Result<SessionStore, AppError> {
    let config = load_config(&dir.runtime())?;
    Ok(session_store(&config))
}

fn run_compare(args: CompareArgs) -> Result<(), AppError> {
    let store = open_store(&args.dir)?;
    let previous = store.load(&args.previous)?;

    let current_path = match args.current {
        Some(path) => path,
        None => store
            .list_past_sessions(Some(&previous.path))?
            .pop()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "no other session to compare against")
            })?,
    };
    let current = store.load(&current_path)?;

    let comparison = SessionComparison::between(&previous, &current.records);
    let extended = args.extended.then(|| patient_comparison(&current.records));

    if args.json {
        return print_json(&serde_json::json!({
            "current_file": current.file_name(),
            "comparison": comparison,
            "extended": extended,
        }));
    }

    println!("Current session: {}", current.file_name());
    render_comparison(&comparison);
    if let Some(extended) = &extended {
        render_patient_comparison(extended);
    }
    Ok(())
}
