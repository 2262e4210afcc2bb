//! Candidate path: résumé text → extracted skills → (+ validated manual skills)
//! → normalized → taxonomy labels → candidate skill profile.

use serde::Serialize;
use tracing::info;

use crate::llm_client::Oracle;
use crate::pipeline::{Stage, StageDiagnostic};
use crate::skills::extractor::{structure_resume, ResumeStructure};
use crate::skills::models::CandidateSkillProfile;
use crate::skills::normalizer::normalize_or_passthrough;
use crate::skills::suggest::suggest_skills;
use crate::skills::taxonomy::{identity_mapping, match_to_taxonomy, TaxonomyMapping};
use crate::skills::validator::{split_manual_input, validate_skills, ValidationReport};

#[derive(Debug, Clone, Serialize)]
pub struct ResumeReport {
    /// `None` when structuring failed; see `diagnostics`.
    pub parsed: Option<ResumeStructure>,
    pub extracted_skills: Vec<String>,
    pub diagnostics: Vec<StageDiagnostic>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionReport {
    pub suggested_skills: Vec<String>,
    /// Set when the oracle answered but found nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
    pub diagnostics: Vec<StageDiagnostic>,
}

/// Whether manually entered skills made it through validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationStatus {
    /// Nothing was entered.
    Skipped,
    Validated(ValidationReport),
    /// The validator failed; no manual skill was added.
    Unavailable { entered: Vec<String> },
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub validation: ValidationStatus,
    pub combined_skills: Vec<String>,
    pub normalized_skills: Vec<String>,
    pub taxonomy: TaxonomyMapping,
    pub profile: CandidateSkillProfile,
    pub diagnostics: Vec<StageDiagnostic>,
}

/// Structures the résumé and pulls out its skills section.
pub async fn analyze_resume(raw_text: &str, oracle: &dyn Oracle) -> ResumeReport {
    match structure_resume(raw_text, oracle).await {
        Ok(parsed) => {
            let extracted_skills = parsed.skills().to_vec();
            info!("Résumé analyzed: {} skills", extracted_skills.len());
            ResumeReport {
                parsed: Some(parsed),
                extracted_skills,
                diagnostics: vec![],
            }
        }
        Err(e) => ResumeReport {
            parsed: None,
            extracted_skills: vec![],
            diagnostics: vec![StageDiagnostic::new(
                Stage::ResumeStructuring,
                &e,
                "no skills extracted",
            )],
        },
    }
}

pub async fn suggest_from_description(description: &str, oracle: &dyn Oracle) -> SuggestionReport {
    match suggest_skills(description, oracle).await {
        Ok(suggested_skills) => SuggestionReport {
            notice: suggested_skills
                .is_empty()
                .then_some("No skills found in the description."),
            suggested_skills,
            diagnostics: vec![],
        },
        Err(e) => SuggestionReport {
            suggested_skills: vec![],
            notice: None,
            diagnostics: vec![StageDiagnostic::new(
                Stage::SkillSuggestion,
                &e,
                "no suggestions",
            )],
        },
    }
}

/// Builds the candidate profile from the résumé's skills plus comma-separated manual input.
///
/// Manual skills are only added once validated. Normalization falls back to the combined list
/// and taxonomy matching to the identity mapping, so a profile is always produced.
pub async fn build_profile(
    extracted: &[String],
    manual_input: &str,
    oracle: &dyn Oracle,
) -> ProfileReport {
    let mut diagnostics = Vec::new();

    let entered = split_manual_input(manual_input);
    let (validation, valid) = if entered.is_empty() {
        (ValidationStatus::Skipped, vec![])
    } else {
        match validate_skills(&entered, oracle).await {
            Ok(report) => {
                let valid = report.valid.clone();
                (ValidationStatus::Validated(report), valid)
            }
            Err(e) => {
                diagnostics.push(StageDiagnostic::new(
                    Stage::SkillValidation,
                    &e,
                    "manual skills not added",
                ));
                (ValidationStatus::Unavailable { entered }, vec![])
            }
        }
    };

    let combined_skills: Vec<String> = extracted.iter().cloned().chain(valid).collect();

    let (normalized_skills, err) = normalize_or_passthrough(&combined_skills, oracle).await;
    if let Some(e) = err {
        diagnostics.push(StageDiagnostic::new(
            Stage::SkillNormalization,
            &e,
            "unnormalized skills",
        ));
    }

    let taxonomy = match match_to_taxonomy(&normalized_skills, oracle).await {
        Ok(mapping) => mapping,
        Err(e) => {
            diagnostics.push(StageDiagnostic::new(
                Stage::TaxonomyMatching,
                &e,
                "normalized names used as labels",
            ));
            identity_mapping(&normalized_skills)
        }
    };

    let profile = CandidateSkillProfile::from_labels(taxonomy.values());
    info!(
        "Candidate profile built: {} labels from {} combined skills",
        profile.len(),
        combined_skills.len()
    );

    ProfileReport {
        validation,
        combined_skills,
        normalized_skills,
        taxonomy,
        profile,
        diagnostics,
    }
}
