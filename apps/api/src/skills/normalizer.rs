//! Skill Normalizer — canonicalizes a flat list of skill phrases via the oracle.
//!
//! The oracle expands abbreviations and unifies synonyms; the result is then trimmed and
//! deduplicated case-insensitively here so the no-duplicates guarantee never depends on the model.

use serde_json::Value;
use tracing::debug;

use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{call_json, Oracle, OracleRequest};
use crate::skills::error::SkillError;
use crate::skills::prompts::NORMALIZE_PROMPT;
use crate::skills::{dedupe_case_insensitive, expect_string_array, to_json_list};

/// Returns canonical, deduplicated skill names for `skills`.
pub async fn normalize_skills(
    skills: &[String],
    oracle: &dyn Oracle,
) -> Result<Vec<String>, SkillError> {
    if skills.is_empty() {
        return Ok(Vec::new());
    }

    let skills_json = to_json_list(skills);
    let prompt = render(
        NORMALIZE_PROMPT,
        &[
            ("skills_json", skills_json.as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );

    let raw: Value = call_json(oracle, OracleRequest::new(JSON_ONLY_SYSTEM, &prompt)).await?;
    let normalized = dedupe_case_insensitive(expect_string_array(raw, "skill normalization")?);

    debug!(
        "Normalized {} skills into {} canonical names",
        skills.len(),
        normalized.len()
    );
    Ok(normalized)
}

/// Normalizes, or hands back the input unchanged when the oracle stage fails.
/// The error is returned alongside so the caller can report it.
pub async fn normalize_or_passthrough(
    skills: &[String],
    oracle: &dyn Oracle,
) -> (Vec<String>, Option<SkillError>) {
    match normalize_skills(skills, oracle).await {
        Ok(normalized) => (normalized, None),
        Err(e) => (skills.to_vec(), Some(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::mock::ScriptedOracle;
    use crate::skills::error::ErrorKind;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_normalize_dedupes_model_output() {
        let oracle = ScriptedOracle::new([r#"["javascript", "JavaScript", "ci/cd", " python "]"#]);
        let out = normalize_skills(&strings(&["JS", "javascript", "CI/CD", "Py"]), &oracle)
            .await
            .unwrap();
        assert_eq!(out, vec!["javascript", "ci/cd", "python"]);
    }

    #[tokio::test]
    async fn test_normalize_keeps_compound_skill_whole() {
        let oracle = ScriptedOracle::new([r#"["CI/CD", "git"]"#]);
        let out = normalize_skills(&strings(&["CI/CD", "Git"]), &oracle)
            .await
            .unwrap();
        assert!(out.contains(&"CI/CD".to_string()));
        assert_eq!(out.len(), 2);
    }

    #[tokio::test]
    async fn test_normalize_rejects_mapping_reply() {
        let oracle = ScriptedOracle::new([r#"{"JS": "javascript"}"#]);
        let err = normalize_skills(&strings(&["JS"]), &oracle).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_passthrough_on_oracle_failure() {
        let oracle = ScriptedOracle::unreachable();
        let input = strings(&["JS", "Py"]);
        let (out, err) = normalize_or_passthrough(&input, &oracle).await;
        assert_eq!(out, input);
        assert_eq!(err.unwrap().kind(), ErrorKind::OracleCall);
    }

    #[tokio::test]
    async fn test_empty_input_skips_oracle() {
        let oracle = ScriptedOracle::unreachable();
        let out = normalize_skills(&[], &oracle).await.unwrap();
        assert!(out.is_empty());
        assert_eq!(oracle.calls(), 0);
    }

    proptest! {
        #[test]
        fn normalized_output_has_no_casefold_duplicates(
            reply in proptest::collection::vec("[A-Za-z/ ]{0,8}", 0..20)
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let json = serde_json::to_string(&reply).unwrap();
            let oracle = ScriptedOracle::new([json]);
            let out = rt
                .block_on(normalize_skills(&strings(&["seed"]), &oracle))
                .unwrap();
            let folded: HashSet<String> = out.iter().map(|s| s.to_lowercase()).collect();
            prop_assert_eq!(folded.len(), out.len());
        }
    }
}
