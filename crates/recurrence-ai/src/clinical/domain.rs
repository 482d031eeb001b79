use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A form value that is not part of its field's closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {field} value")]
pub struct UnknownCategory {
    pub field: &'static str,
    pub value: String,
}

/// Declares a closed clinical enumeration. Variant order is the
/// training-time integer code and must not change without retraining.
macro_rules! clinical_category {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const FIELD: &'static str = $field;

            pub const fn ordered() -> &'static [Self] {
                &[$(Self::$variant),+]
            }

            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            pub const fn code(self) -> u8 {
                self as u8
            }
        }

        impl FromStr for $name {
            type Err = UnknownCategory;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let trimmed = value.trim();
                Self::ordered()
                    .iter()
                    .copied()
                    .find(|candidate| candidate.label() == trimmed)
                    .ok_or_else(|| UnknownCategory {
                        field: Self::FIELD,
                        value: value.to_string(),
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = UnknownCategory;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.label()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

clinical_category! {
    /// Biological sex as recorded on the intake form.
    Gender, field = "gender" {
        Female => "F",
        Male => "M",
    }
}

clinical_category! {
    /// Shared table for smoking, smoking history and radiotherapy history.
    YesNo, field = "yes/no" {
        No => "No",
        Yes => "Yes",
    }
}

clinical_category! {
    ThyroidFunction, field = "thyroid function" {
        Euthyroid => "Euthyroid",
        ClinicalHyperthyroidism => "Clinical Hyperthyroidism",
        ClinicalHypothyroidism => "Clinical Hypothyroidism",
        SubclinicalHyperthyroidism => "Subclinical Hyperthyroidism",
        SubclinicalHypothyroidism => "Subclinical Hypothyroidism",
    }
}

clinical_category! {
    PhysicalExam, field = "physical examination" {
        SingleNodularGoiterLeft => "Single nodular goiter-left",
        MultinodularGoiter => "Multinodular goiter",
        SingleNodularGoiterRight => "Single nodular goiter-right",
        Normal => "Normal",
        DiffuseGoiter => "Diffuse goiter",
    }
}

clinical_category! {
    Adenopathy, field = "adenopathy" {
        No => "No",
        Right => "Right",
        Extensive => "Extensive",
        Left => "Left",
        Bilateral => "Bilateral",
        Posterior => "Posterior",
    }
}

clinical_category! {
    Pathology, field = "pathology" {
        Micropapillary => "Micropapillary",
        Papillary => "Papillary",
        Follicular => "Follicular",
        HurthelCell => "Hurthel cell",
    }
}

clinical_category! {
    Focality, field = "focality" {
        UniFocal => "Uni-Focal",
        MultiFocal => "Multi-Focal",
    }
}

clinical_category! {
    /// Clinician-assessed risk, echoed into every history record.
    RiskLevel, field = "risk" {
        Low => "Low",
        Intermediate => "Intermediate",
        High => "High",
    }
}

clinical_category! {
    TumorStage, field = "T" {
        T1a => "T1a",
        T1b => "T1b",
        T2 => "T2",
        T3a => "T3a",
        T3b => "T3b",
        T4a => "T4a",
        T4b => "T4b",
    }
}

clinical_category! {
    /// N1b precedes N1a in the training encoding.
    NodeStage, field = "N" {
        N0 => "N0",
        N1b => "N1b",
        N1a => "N1a",
    }
}

clinical_category! {
    MetastasisStage, field = "M" {
        M0 => "M0",
        M1 => "M1",
    }
}

clinical_category! {
    OverallStage, field = "stage" {
        I => "I",
        II => "II",
        III => "III",
        IVA => "IVA",
        IVB => "IVB",
    }
}

clinical_category! {
    TreatmentResponse, field = "response" {
        Indeterminate => "Indeterminate",
        Excellent => "Excellent",
        StructuralIncomplete => "Structural Incomplete",
        BiochemicalIncomplete => "Biochemical Incomplete",
    }
}

pub const MIN_AGE: i64 = 1;
pub const MAX_AGE: i64 = 100;

/// Field values exactly as collected by the form (or a batch CSV row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPatientInput {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub name: Option<String>,
    pub age: i64,
    pub gender: String,
    pub smoking: String,
    pub hx_smoking: String,
    pub hx_radiotherapy: String,
    pub thyroid_func: String,
    pub physical_exam: String,
    pub adenopathy: String,
    pub pathology: String,
    pub focality: String,
    pub risk: String,
    #[serde(rename = "T")]
    pub tumor: String,
    #[serde(rename = "N")]
    pub nodes: String,
    #[serde(rename = "M")]
    pub metastasis: String,
    pub stage: String,
    pub response: String,
}

impl Default for RawPatientInput {
    /// The form's initial selections.
    fn default() -> Self {
        Self {
            name: None,
            age: 25,
            gender: Gender::Female.label().to_string(),
            smoking: YesNo::No.label().to_string(),
            hx_smoking: YesNo::No.label().to_string(),
            hx_radiotherapy: YesNo::No.label().to_string(),
            thyroid_func: ThyroidFunction::Euthyroid.label().to_string(),
            physical_exam: PhysicalExam::Normal.label().to_string(),
            adenopathy: Adenopathy::No.label().to_string(),
            pathology: Pathology::Papillary.label().to_string(),
            focality: Focality::UniFocal.label().to_string(),
            risk: RiskLevel::Low.label().to_string(),
            tumor: TumorStage::T1a.label().to_string(),
            nodes: NodeStage::N0.label().to_string(),
            metastasis: MetastasisStage::M0.label().to_string(),
            stage: OverallStage::I.label().to_string(),
            response: TreatmentResponse::Excellent.label().to_string(),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Validated patient attributes; every categorical field is a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientProfile {
    pub name: Option<String>,
    pub age: u8,
    pub gender: Gender,
    pub smoking: YesNo,
    pub hx_smoking: YesNo,
    pub hx_radiotherapy: YesNo,
    pub thyroid_function: ThyroidFunction,
    pub physical_exam: PhysicalExam,
    pub adenopathy: Adenopathy,
    pub pathology: Pathology,
    pub focality: Focality,
    pub risk: RiskLevel,
    pub tumor: TumorStage,
    pub nodes: NodeStage,
    pub metastasis: MetastasisStage,
    pub stage: OverallStage,
    pub response: TreatmentResponse,
}

impl PatientProfile {
    pub fn is_high_risk(&self) -> bool {
        crate::decision::is_high_risk(self.stage, self.metastasis)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),
    #[error("age {0} is outside the accepted range 1-100")]
    AgeOutOfRange(i64),
}

fn parse_field<T>(field: &'static str, value: &str) -> Result<T, UnknownCategory>
where
    T: FromStr<Err = UnknownCategory>,
{
    value
        .parse::<T>()
        .map_err(|err| UnknownCategory { field, ..err })
}

impl TryFrom<&RawPatientInput> for PatientProfile {
    type Error = EncodeError;

    fn try_from(raw: &RawPatientInput) -> Result<Self, Self::Error> {
        if !(MIN_AGE..=MAX_AGE).contains(&raw.age) {
            return Err(EncodeError::AgeOutOfRange(raw.age));
        }

        Ok(Self {
            name: raw
                .name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            age: raw.age as u8,
            gender: parse_field("gender", &raw.gender)?,
            smoking: parse_field("smoking", &raw.smoking)?,
            hx_smoking: parse_field("smoking history", &raw.hx_smoking)?,
            hx_radiotherapy: parse_field("radiotherapy history", &raw.hx_radiotherapy)?,
            thyroid_function: parse_field("thyroid function", &raw.thyroid_func)?,
            physical_exam: parse_field("physical examination", &raw.physical_exam)?,
            adenopathy: parse_field("adenopathy", &raw.adenopathy)?,
            pathology: parse_field("pathology", &raw.pathology)?,
            focality: parse_field("focality", &raw.focality)?,
            risk: parse_field("risk", &raw.risk)?,
            tumor: parse_field("T", &raw.tumor)?,
            nodes: parse_field("N", &raw.nodes)?,
            metastasis: parse_field("M", &raw.metastasis)?,
            stage: parse_field("stage", &raw.stage)?,
            response: parse_field("response", &raw.response)?,
        })
    }
}
