use crate::cli::RuntimeArgs;
use crate::infra::{demo_rng, load_config, now, open_session, print_json};
use crate::render::render_prediction;
use clap::Args;
use recurrence_ai::clinical::RawPatientInput;
use recurrence_ai::error::AppError;

/// Patient attributes; unspecified fields keep the form's initial selections.
#[derive(Args, Debug, Clone)]
pub(crate) struct PatientArgs {
    /// Patient name (defaults to "Patient <n>")
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Age in years, 1 to 100
    #[arg(long, default_value_t = 25)]
    pub(crate) age: i64,
    /// F or M
    #[arg(long, default_value = "F")]
    pub(crate) gender: String,
    #[arg(long, default_value = "No")]
    pub(crate) smoking: String,
    #[arg(long, default_value = "No")]
    pub(crate) hx_smoking: String,
    #[arg(long, default_value = "No")]
    pub(crate) hx_radiotherapy: String,
    #[arg(long, default_value = "Euthyroid")]
    pub(crate) thyroid_function: String,
    #[arg(long, default_value = "Normal")]
    pub(crate) physical_exam: String,
    #[arg(long, default_value = "No")]
    pub(crate) adenopathy: String,
    #[arg(long, default_value = "Papillary")]
    pub(crate) pathology: String,
    #[arg(long, default_value = "Uni-Focal")]
    pub(crate) focality: String,
    /// Low, Intermediate or High
    #[arg(long, default_value = "Low")]
    pub(crate) risk: String,
    /// Tumor stage (T1a .. T4b)
    #[arg(long, default_value = "T1a")]
    pub(crate) tumor: String,
    /// Node stage (N0, N1a, N1b)
    #[arg(long, default_value = "N0")]
    pub(crate) nodes: String,
    /// Metastasis stage (M0, M1)
    #[arg(long, default_value = "M0")]
    pub(crate) metastasis: String,
    /// Overall stage (I, II, III, IVA, IVB)
    #[arg(long, default_value = "I")]
    pub(crate) stage: String,
    #[arg(long, default_value = "Excellent")]
    pub(crate) response: String,
}

impl From<PatientArgs> for RawPatientInput {
    fn from(args: PatientArgs) -> Self {
        Self {
            name: args.name,
            age: args.age,
            gender: args.gender,
            smoking: args.smoking,
            hx_smoking: args.hx_smoking,
            hx_radiotherapy: args.hx_radiotherapy,
            thyroid_func: args.thyroid_function,
            physical_exam: args.physical_exam,
            adenopathy: args.adenopathy,
            pathology: args.pathology,
            focality: args.focality,
            risk: args.risk,
            tumor: args.tumor,
            nodes: args.nodes,
            metastasis: args.metastasis,
            stage: args.stage,
            response: args.response,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    #[command(flatten)]
    pub(crate) patient: PatientArgs,
    #[command(flatten)]
    pub(crate) runtime: RuntimeArgs,
    /// Ignore the patient flags and use random valid values
    #[arg(long)]
    pub(crate) demo: bool,
    /// Seed for --demo so the generated patient is reproducible
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let PredictArgs {
        patient,
        runtime,
        demo,
        seed,
        json,
    } = args;

    let config = load_config(&runtime)?;
    let mut session = open_session(&config)?;

    let raw = if demo || config.demo_data {
        let mut rng = demo_rng(seed);
        session.next_demo_input(&mut rng)
    } else {
        RawPatientInput::from(patient)
    };

    let result = session.predict(&raw, now())?;
    if json {
        print_json(&result)
    } else {
        render_prediction(&result);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recurrence_ai::clinical::PatientProfile;

    #[test]
    fn default_flags_match_the_initial_form() {
        let args = PatientArgs {
            name: None,
            age: 25,
            gender: "F".into(),
            smoking: "No".into(),
            hx_smoking: "No".into(),
            hx_radiotherapy: "No".into(),
            thyroid_function: "Euthyroid".into(),
            physical_exam: "Normal".into(),
            adenopathy: "No".into(),
            pathology: "Papillary".into(),
            focality: "Uni-Focal".into(),
            risk: "Low".into(),
            tumor: "T1a".into(),
            nodes: "N0".into(),
            metastasis: "M0".into(),
            stage: "I".into(),
            response: "Excellent".into(),
        };

        let raw = RawPatientInput::from(args);
        assert_eq!(raw, RawPatientInput::default());
        assert!(PatientProfile::try_from(&raw).is_ok());
    }
}
