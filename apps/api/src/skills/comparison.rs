//! Comparison Engine — the candidate's profile against a job's core skills.

use serde::Serialize;

use crate::skills::models::{round1, CandidateSkillProfile, ClassifiedSkillSet, ComparisonResult};

/// Either a comparison, or the reason one cannot be made yet.
///
/// An empty profile must never read as "nothing missing", so both sides are required.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Comparison {
    Ready(ComparisonResult),
    InsufficientData { reason: String },
}

pub fn compare(profile: &CandidateSkillProfile, classified: &ClassifiedSkillSet) -> Comparison {
    let core = classified.core_labels();

    match (profile.is_empty(), core.is_empty()) {
        (true, true) => Comparison::InsufficientData {
            reason: "Analyze both your CV and the job market before comparing.".to_string(),
        },
        (true, false) => Comparison::InsufficientData {
            reason: "No candidate skill profile yet. Analyze your CV first.".to_string(),
        },
        (false, true) => Comparison::InsufficientData {
            reason: "No core skills for a job title yet. Run the job market analysis first."
                .to_string(),
        },
        (false, false) => {
            // BTreeSet iteration keeps both lists sorted
            let matched: Vec<String> = core
                .iter()
                .filter(|label| profile.contains(label))
                .cloned()
                .collect();
            let missing: Vec<String> = core
                .iter()
                .filter(|label| !profile.contains(label))
                .cloned()
                .collect();
            let coverage_pct = round1(matched.len() as f64 / core.len() as f64 * 100.0);

            Comparison::Ready(ComparisonResult {
                matched,
                missing,
                coverage_pct,
            })
        }
    }
}
