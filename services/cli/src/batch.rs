use crate::cli::RuntimeArgs;
use crate::infra::{load_config, now, open_session, print_json};
use crate::render::render_analytics;
use clap::Args;
use recurrence_ai::analytics::{patient_comparison, AnalyticsView, ComparisonHook};
use recurrence_ai::clinical::RawPatientInput;
use recurrence_ai::error::AppError;
use recurrence_ai::history::HistoryError;
use recurrence_ai::session::{PredictionError, PredictionSession};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV with one patient per row (columns as in the prediction form)
    #[arg(long)]
    pub(crate) input: PathBuf,
    #[command(flatten)]
    pub(crate) runtime: RuntimeArgs,
    /// Past session file to compare this session against
    #[arg(long)]
    pub(crate) compare: Option<PathBuf>,
    /// List the past sessions available for comparison
    #[arg(long)]
    pub(crate) list_past: bool,
    /// Include the per-patient comparison dashboard
    #[arg(long)]
    pub(crate) extended: bool,
    /// Print the session analytics as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Default)]
pub(crate) struct BatchTally {
    pub(crate) rejected: usize,
    /// Set while the latest write of the session file has failed.
    pub(crate) unsaved: Option<HistoryError>,
}

/// Rows that fail to deserialize are skipped and counted.
pub(crate) fn read_patients<R: Read>(reader: R) -> Result<(Vec<RawPatientInput>, usize), csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut patients = Vec::new();
    let mut skipped = 0;
    for (index, row) in csv_reader.deserialize::<RawPatientInput>().enumerate() {
        match row {
            Ok(patient) => patients.push(patient),
            Err(err) => {
                skipped += 1;
                warn!(row = index + 1, error = %err, "skipping unreadable patient row");
            }
        }
    }
    Ok((patients, skipped))
}

/// Scores every patient. A failed write keeps the record in the ledger and the
/// next persist rewrites the whole file, so scoring carries on.
pub(crate) fn score_patients(
    session: &mut PredictionSession,
    patients: &[RawPatientInput],
) -> Result<BatchTally, AppError> {
    let mut tally = BatchTally::default();
    for raw in patients {
        match session.predict(raw, now()) {
            Ok(_) => tally.unsaved = None,
            Err(PredictionError::Encode(err)) => {
                tally.rejected += 1;
                warn!(patient = raw.name.as_deref().unwrap_or("unnamed"), error = %err, "patient rejected");
            }
            Err(PredictionError::Persist(err)) => {
                warn!(error = %err, "session file not written, continuing");
                tally.unsaved = Some(err);
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(tally)
}

/// Analytics of the live session, optionally against a past session file.
pub(crate) fn live_analytics(
    session: &PredictionSession,
    compare: Option<&Path>,
    extended: bool,
) -> Result<AnalyticsView, AppError> {
    let previous = match compare {
        Some(path) => {
            let resolved = session.store().resolve(path);
            if session.session_file() == Some(resolved.as_path()) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} is the active session", resolved.display()),
                )
                .into());
            }
            Some(session.store().load(&resolved)?)
        }
        None => None,
    };

    let hook: ComparisonHook = patient_comparison;
    Ok(session.analytics(previous.as_ref(), extended.then_some(hook)))
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let BatchArgs {
        input,
        runtime,
        compare,
        list_past,
        extended,
        json,
    } = args;

    let config = load_config(&runtime)?;
    let mut session = open_session(&config)?;

    let file = std::fs::File::open(&input)?;
    let (patients, unreadable) = read_patients(file)?;
    let tally = score_patients(&mut session, &patients)?;

    info!(
        predicted = session.records().len(),
        rejected = tally.rejected,
        unreadable,
        "batch finished"
    );

    let view = live_analytics(&session, compare.as_deref(), extended)?;
    if json {
        print_json(&view)?;
    } else {
        render_analytics(&view);
        if tally.rejected + unreadable > 0 {
            println!("Skipped rows: {} invalid, {} unreadable", tally.rejected, unreadable);
        }
        if let Some(path) = session.session_file() {
            println!("Session file: {}", path.display());
        }
        if list_past {
            let past = session.past_sessions()?;
            println!("Past sessions available for comparison: {}", past.len());
            for path in past {
                println!("  {}", path.display());
            }
        }
    }

    match tally.unsaved {
        Some(err) => Err(PredictionError::Persist(err).into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recurrence_ai::clinical::FeatureVector;
    use recurrence_ai::history::SessionStore;
    use recurrence_ai::model::{ClassProbabilities, ModelError, RecurrenceClassifier};
    use recurrence_ai::narration::{CommandNarrator, NarrationSettings};
    use std::fs;
    use std::sync::Arc;

    struct FixedClassifier(f64);

    impl RecurrenceClassifier for FixedClassifier {
        fn predict_proba(&self, _: &FeatureVector) -> Result<ClassProbabilities, ModelError> {
            ClassProbabilities::from_weights(1.0 - self.0, self.0)
        }
    }

    fn session(dir: &Path, confidence_yes: f64) -> PredictionSession {
        PredictionSession::new(
            Arc::new(FixedClassifier(confidence_yes)),
            SessionStore::new(dir),
            NarrationSettings::disabled(),
            Box::new(CommandNarrator::new("espeak-ng".to_string())),
            now(),
        )
    }

    fn patients(count: usize) -> Vec<RawPatientInput> {
        (0..count).map(|_| RawPatientInput::default()).collect()
    }

    #[test]
    fn reads_form_columns_and_skips_bad_rows() {
        let csv = "\
name,age,gender,smoking,hx_smoking,hx_radiotherapy,thyroid_func,physical_exam,adenopathy,pathology,focality,risk,T,N,M,stage,response
Asha,34,F,No,No,No,Euthyroid,Normal,No,Papillary,Uni-Focal,Low,T1a,N0,M0,I,Excellent
,71,M,Yes,Yes,No,Euthyroid,Multinodular goiter,Right,Follicular,Multi-Focal,High,T4a,N1b,M1,IVB,Structural Incomplete
Broken,old,M,No,No,No,Euthyroid,Normal,No,Papillary,Uni-Focal,Low,T1a,N0,M0,I,Excellent
";

        let (patients, skipped) = read_patients(csv.as_bytes()).expect("csv parses");
        assert_eq!(patients.len(), 2);
        assert_eq!(skipped, 1);
        assert_eq!(patients[0].name.as_deref(), Some("Asha"));
        assert_eq!(patients[1].name, None);
        assert_eq!(patients[1].metastasis, "M1");
        assert_eq!(patients[1].response, "Structural Incomplete");
    }

    #[test]
    fn live_session_compares_against_past_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let past = dir.path().join("session_2020-01-01_08-00.csv");
        fs::write(&past, "Name,Confidence_Yes\nPatient 1,0.2\nPatient 2,0.4\n").expect("write past session");

        let mut session = session(dir.path(), 0.6);
        let tally = score_patients(&mut session, &patients(2)).expect("batch scores");
        assert_eq!(tally.rejected, 0);
        assert!(tally.unsaved.is_none());

        let active = session.session_file().expect("active session file").to_path_buf();
        assert_eq!(session.past_sessions().expect("list"), vec![past]);

        let view = live_analytics(&session, Some(Path::new("session_2020-01-01_08-00.csv")), true)
            .expect("analytics");
        let comparison = view.comparison.expect("comparison present");
        assert_eq!(comparison.previous_file, "session_2020-01-01_08-00.csv");
        assert!((comparison.previous_mean - 0.3).abs() < 1e-9);
        assert!((comparison.current_mean - 0.6).abs() < 1e-9);
        assert!((comparison.delta - 0.3).abs() < 1e-9);
        assert!(view.extended.is_some());

        let error = live_analytics(&session, Some(&active), false).expect_err("active file refused");
        assert!(error.to_string().contains("active session"));
    }

    #[test]
    fn unwritable_session_dir_keeps_scoring() {
        let dir = tempfile::tempdir().expect("temp dir");
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "occupied").expect("write blocker file");

        let mut session = session(&blocker, 0.6);
        let tally = score_patients(&mut session, &patients(3)).expect("batch scores");

        assert_eq!(session.records().len(), 3);
        assert!(tally.unsaved.is_some());
        assert!(session.session_file().is_none());
    }
}
