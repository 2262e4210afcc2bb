//! Skill Extractor — turns raw texts into skill phrase lists.
//!
//! Two modes:
//! - postings: N descriptions → N positionally aligned skill lists, one oracle call
//! - résumé: one document → fixed-shape record; only the skills section feeds the pipeline

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{call_json, Oracle, OracleRequest};
use crate::skills::error::SkillError;
use crate::skills::prompts::{EXTRACTION_PROMPT, RESUME_STRUCTURE_PROMPT, RESUME_STRUCTURE_SYSTEM};
use crate::skills::{expect_string_array, json_type};

/// Structured résumé as returned by the oracle.
///
/// Only `programming_languages_and_technical_skills` is consumed by the pipeline; the other
/// sections are passed through to the caller untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeStructure {
    #[serde(default)]
    pub work_experience: Value,
    #[serde(default)]
    pub education: Value,
    /// Missing or `null` reads as no skills; the other sections are still kept.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub programming_languages_and_technical_skills: Vec<String>,
    #[serde(default)]
    pub projects: Value,
    #[serde(default)]
    pub certifications_and_languages: Value,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ResumeStructure {
    pub fn skills(&self) -> &[String] {
        &self.programming_languages_and_technical_skills
    }
}

/// Extracts one skill list per text. `result[i]` holds the skills found in `texts[i]`.
///
/// Fails with `MalformedResponse` when the reply is not an array of `texts.len()` string arrays.
pub async fn extract_skills(
    texts: &[String],
    oracle: &dyn Oracle,
) -> Result<Vec<Vec<String>>, SkillError> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let descriptions_json =
        serde_json::to_string(texts).map_err(|e| SkillError::OracleCall(e.to_string()))?;
    let count = texts.len().to_string();
    let prompt = render(
        EXTRACTION_PROMPT,
        &[
            ("count", count.as_str()),
            ("descriptions_json", descriptions_json.as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );

    let raw: Value = call_json(oracle, OracleRequest::new(JSON_ONLY_SYSTEM, &prompt)).await?;
    let lists = parse_aligned_lists(raw, texts.len())?;

    info!(
        "Extracted {} skill mentions from {} postings",
        lists.iter().map(Vec::len).sum::<usize>(),
        texts.len()
    );
    Ok(lists)
}

/// Validates the outer sequence, its length against the request, and each inner list.
fn parse_aligned_lists(raw: Value, expected: usize) -> Result<Vec<Vec<String>>, SkillError> {
    let Value::Array(outer) = raw else {
        return Err(SkillError::malformed(format!(
            "skill extraction: expected an array of arrays, got {}",
            json_type(&raw)
        )));
    };

    if outer.len() != expected {
        return Err(SkillError::malformed(format!(
            "skill extraction: expected {expected} lists (one per posting), got {}",
            outer.len()
        )));
    }

    outer
        .into_iter()
        .enumerate()
        .map(|(i, inner)| expect_string_array(inner, &format!("skill extraction, posting {i}")))
        .collect()
}

/// Structures a résumé's raw text into the fixed-shape record.
pub async fn structure_resume(
    cv_text: &str,
    oracle: &dyn Oracle,
) -> Result<ResumeStructure, SkillError> {
    let prompt = render(
        RESUME_STRUCTURE_PROMPT,
        &[("cv_text", cv_text), ("json_only", JSON_ONLY_INSTRUCTION)],
    );

    let raw: Value =
        call_json(oracle, OracleRequest::new(RESUME_STRUCTURE_SYSTEM, &prompt)).await?;
    if !raw.is_object() {
        return Err(SkillError::malformed(format!(
            "résumé structuring: expected an object, got {}",
            json_type(&raw)
        )));
    }

    let structure: ResumeStructure = serde_json::from_value(raw)
        .map_err(|e| SkillError::malformed(format!("résumé structuring: {e}")))?;

    debug!(
        "Résumé structured: {} skills extracted",
        structure.skills().len()
    );
    Ok(structure)
}
