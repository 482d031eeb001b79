//! The pre-trained recurrence classifier, consumed as a black box.

mod artifact;
mod cache;
mod forest;

pub use artifact::{ClassifierSpec, ModelArtifact, NodeSpec, TreeSpec};
pub use cache::cached_model;

use crate::clinical::{FeatureVector, FEATURE_NAMES};
use forest::{LogisticModel, RandomForest};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

/// Probability pair returned by the classifier; the two values sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassProbabilities {
    pub no_recurrence: f64,
    pub recurrence: f64,
}

impl ClassProbabilities {
    pub fn from_weights(no: f64, yes: f64) -> Result<Self, ModelError> {
        let total = no + yes;
        if !no.is_finite() || !yes.is_finite() || no < 0.0 || yes < 0.0 || total <= 0.0 {
            return Err(ModelError::InvalidProbabilities { no, yes });
        }

        Ok(Self {
            no_recurrence: no / total,
            recurrence: yes / total,
        })
    }
}

/// Anything able to score a feature vector. The session holds one behind
/// an `Arc<dyn RecurrenceClassifier>` so tests can substitute fixed outputs.
pub trait RecurrenceClassifier: Send + Sync {
    fn predict_proba(&self, features: &FeatureVector) -> Result<ClassProbabilities, ModelError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("model artifact is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model expects features {found:?} but the encoder produces {expected:?}")]
    FeatureOrderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("random forest artifact contains no trees")]
    EmptyForest,
    #[error("tree {tree} is malformed: {reason}")]
    InvalidTree { tree: usize, reason: String },
    #[error("logistic model needs {expected} coefficients, found {found}")]
    CoefficientCount { expected: usize, found: usize },
    #[error("classifier produced unusable probabilities (no={no}, yes={yes})")]
    InvalidProbabilities { no: f64, yes: f64 },
    #[error("model cache lock poisoned")]
    CachePoisoned,
}

#[derive(Debug, Clone)]
enum Classifier {
    Forest(RandomForest),
    Logistic(LogisticModel),
}

/// A validated classifier together with the feature names it was trained on.
#[derive(Debug, Clone)]
pub struct RecurrenceModel {
    feature_names: Vec<String>,
    classifier: Classifier,
}

impl RecurrenceModel {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_reader(reader)?;
        Self::from_artifact(artifact)
    }

    /// Refuses artifacts whose column order differs from the encoder's;
    /// a reordered vector would otherwise be scored without any error.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        if artifact.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(ModelError::FeatureOrderMismatch {
                expected: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
                found: artifact.feature_names,
            });
        }

        let classifier = match &artifact.classifier {
            ClassifierSpec::RandomForest { trees } => {
                Classifier::Forest(RandomForest::from_specs(trees)?)
            }
            ClassifierSpec::Logistic {
                coefficients,
                intercept,
            } => Classifier::Logistic(LogisticModel::new(coefficients, *intercept)?),
        };

        Ok(Self {
            feature_names: artifact.feature_names,
            classifier,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn describe(&self) -> String {
        match &self.classifier {
            Classifier::Forest(forest) => format!("random forest ({} trees)", forest.tree_count()),
            Classifier::Logistic(_) => "logistic regression".to_string(),
        }
    }
}

impl RecurrenceClassifier for RecurrenceModel {
    fn predict_proba(&self, features: &FeatureVector) -> Result<ClassProbabilities, ModelError> {
        let raw = match &self.classifier {
            Classifier::Forest(forest) => forest.predict(features),
            Classifier::Logistic(model) => model.predict(features),
        };
        ClassProbabilities::from_weights(raw.no_recurrence, raw.recurrence)
    }
}
