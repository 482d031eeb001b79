//! Patient intake: closed clinical enumerations, validation, and the
//! fixed-order feature vector consumed by the recurrence classifier.

mod demo;
pub mod domain;
mod encoder;

pub use demo::demo_input;
pub use domain::{
    Adenopathy, EncodeError, Focality, Gender, MetastasisStage, NodeStage, OverallStage,
    PatientProfile, Pathology, PhysicalExam, RawPatientInput, RiskLevel, ThyroidFunction,
    TreatmentResponse, TumorStage, UnknownCategory, YesNo, MAX_AGE, MIN_AGE,
};
pub use encoder::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
