use super::domain::{EncodeError, PatientProfile, RawPatientInput};

pub const FEATURE_COUNT: usize = 16;

/// Column order of the training frame, spelling included.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Age",
    "Gender",
    "Smoking",
    "Hx Smoking",
    "Hx Radiothreapy",
    "Thyroid Function",
    "Physical Examination",
    "Adenopathy",
    "Pathology",
    "Focality",
    "Risk",
    "T",
    "N",
    "M",
    "Stage",
    "Response",
];

/// Model input: raw age followed by the categorical codes in training order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn encode(profile: &PatientProfile) -> Self {
        Self([
            f64::from(profile.age),
            f64::from(profile.gender.code()),
            f64::from(profile.smoking.code()),
            f64::from(profile.hx_smoking.code()),
            f64::from(profile.hx_radiotherapy.code()),
            f64::from(profile.thyroid_function.code()),
            f64::from(profile.physical_exam.code()),
            f64::from(profile.adenopathy.code()),
            f64::from(profile.pathology.code()),
            f64::from(profile.focality.code()),
            f64::from(profile.risk.code()),
            f64::from(profile.tumor.code()),
            f64::from(profile.nodes.code()),
            f64::from(profile.metastasis.code()),
            f64::from(profile.stage.code()),
            f64::from(profile.response.code()),
        ])
    }

    /// Validates and encodes in one step.
    pub fn from_raw(raw: &RawPatientInput) -> Result<(PatientProfile, Self), EncodeError> {
        let profile = PatientProfile::try_from(raw)?;
        let features = Self::encode(&profile);
        Ok((profile, features))
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}
