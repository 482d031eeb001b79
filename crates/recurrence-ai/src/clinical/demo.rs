use super::domain::{
    Adenopathy, Focality, Gender, MetastasisStage, NodeStage, OverallStage, Pathology,
    PhysicalExam, RawPatientInput, RiskLevel, ThyroidFunction, TreatmentResponse, TumorStage,
    YesNo, MAX_AGE, MIN_AGE,
};
use rand::Rng;

fn pick<T, R>(options: &[T], rng: &mut R) -> String
where
    T: Copy + Into<&'static str>,
    R: Rng + ?Sized,
{
    let choice = options[rng.gen_range(0..options.len())];
    choice.into().to_string()
}

/// Random but valid form values for demonstrations.
pub fn demo_input<R: Rng + ?Sized>(counter: usize, rng: &mut R) -> RawPatientInput {
    RawPatientInput {
        name: Some(format!("Demo Patient {counter}")),
        age: rng.gen_range(MIN_AGE..=MAX_AGE),
        gender: pick(Gender::ordered(), rng),
        smoking: pick(YesNo::ordered(), rng),
        hx_smoking: pick(YesNo::ordered(), rng),
        hx_radiotherapy: pick(YesNo::ordered(), rng),
        thyroid_func: pick(ThyroidFunction::ordered(), rng),
        physical_exam: pick(PhysicalExam::ordered(), rng),
        adenopathy: pick(Adenopathy::ordered(), rng),
        pathology: pick(Pathology::ordered(), rng),
        focality: pick(Focality::ordered(), rng),
        risk: pick(RiskLevel::ordered(), rng),
        tumor: pick(TumorStage::ordered(), rng),
        nodes: pick(NodeStage::ordered(), rng),
        metastasis: pick(MetastasisStage::ordered(), rng),
        stage: pick(OverallStage::ordered(), rng),
        response: pick(TreatmentResponse::ordered(), rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clinical::PatientProfile;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn demo_inputs_always_validate() {
        let mut rng = StdRng::seed_from_u64(7);
        for counter in 1..=200 {
            let raw = demo_input(counter, &mut rng);
            assert_eq!(raw.name.as_deref(), Some(format!("Demo Patient {counter}").as_str()));
            PatientProfile::try_from(&raw).expect("demo data stays inside the enumerations");
        }
    }
}
