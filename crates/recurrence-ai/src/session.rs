//! Session context: everything one run of the tool mutates, held in one
//! place and passed explicitly.

use crate::analytics::{AnalyticsView, ComparisonHook};
use crate::clinical::{demo_input, EncodeError, FeatureVector, PatientProfile, RawPatientInput};
use crate::decision::Decision;
use crate::history::{HistoryError, HistoryLedger, PredictionRecord, SessionSnapshot, SessionStore};
use crate::model::{ClassProbabilities, ModelError, RecurrenceClassifier};
use crate::narration::{narrate, NarrationSettings, Narrator};
use chrono::NaiveDateTime;
use rand::Rng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("invalid patient input: {0}")]
    Encode(#[from] EncodeError),
    #[error("classifier failed: {0}")]
    Model(#[from] ModelError),
    #[error("prediction was recorded but the session file could not be written: {0}")]
    Persist(#[source] HistoryError),
}

/// Outcome of one successful prediction.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub profile: PatientProfile,
    pub probabilities: ClassProbabilities,
    pub decision: Decision,
    pub record: PredictionRecord,
    pub session_file: Option<PathBuf>,
    pub narrated: bool,
}

pub struct PredictionSession {
    classifier: Arc<dyn RecurrenceClassifier>,
    store: SessionStore,
    ledger: HistoryLedger,
    narration: NarrationSettings,
    narrator: Box<dyn Narrator>,
    demo_counter: usize,
}

impl PredictionSession {
    pub fn new(
        classifier: Arc<dyn RecurrenceClassifier>,
        store: SessionStore,
        narration: NarrationSettings,
        narrator: Box<dyn Narrator>,
        started_at: NaiveDateTime,
    ) -> Self {
        Self {
            classifier,
            store,
            ledger: HistoryLedger::new(started_at),
            narration,
            narrator,
            demo_counter: 0,
        }
    }

    /// Validates, scores and records one patient. Invalid input or a
    /// classifier failure leaves the ledger untouched.
    pub fn predict(
        &mut self,
        raw: &RawPatientInput,
        at: NaiveDateTime,
    ) -> Result<PredictionResult, PredictionError> {
        let (profile, features) = FeatureVector::from_raw(raw)?;
        let probabilities = self.classifier.predict_proba(&features)?;
        let decision = Decision::evaluate(probabilities.recurrence, profile.is_high_risk());

        let name = self.ledger.display_name(profile.name.as_deref());
        let record = PredictionRecord::new(name, at, probabilities, &decision, profile.risk);
        info!(
            patient = %record.name,
            outcome = %decision.outcome,
            confidence_yes = record.confidence_yes,
            high_risk = decision.high_risk,
            "prediction recorded"
        );
        self.ledger.append(record.clone());

        let persisted = self.store.persist(&mut self.ledger);

        let narrated = narrate(
            self.narrator.as_ref(),
            &self.narration,
            decision.outcome,
            probabilities.recurrence,
            profile.name.as_deref(),
        );

        let session_file = persisted.map_err(PredictionError::Persist)?;
        Ok(PredictionResult {
            profile,
            probabilities,
            decision,
            record,
            session_file,
            narrated,
        })
    }

    /// Random valid form values for the demo-data toggle.
    pub fn next_demo_input<R: Rng + ?Sized>(&mut self, rng: &mut R) -> RawPatientInput {
        self.demo_counter += 1;
        demo_input(self.demo_counter, rng)
    }

    pub fn records(&self) -> &[PredictionRecord] {
        self.ledger.records()
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn session_file(&self) -> Option<&Path> {
        self.ledger.session_file()
    }

    pub fn narration(&self) -> &NarrationSettings {
        &self.narration
    }

    pub fn set_narration(&mut self, settings: NarrationSettings) {
        self.narration = settings;
    }

    /// Persisted sessions other than this one.
    pub fn past_sessions(&self) -> Result<Vec<PathBuf>, HistoryError> {
        self.store.list_past_sessions(self.ledger.session_file())
    }

    pub fn analytics(
        &self,
        previous: Option<&SessionSnapshot>,
        extended: Option<ComparisonHook>,
    ) -> AnalyticsView {
        AnalyticsView::build(self.ledger.records(), previous, extended)
    }
}
