//! Skill Suggester — proposes skill names from a free-text self-description.

use serde_json::Value;
use tracing::info;

use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{call_json, Oracle, OracleRequest};
use crate::skills::error::SkillError;
use crate::skills::prompts::SUGGEST_PROMPT;
use crate::skills::{dedupe_case_insensitive, expect_string_array};

/// Returns the skills described in `description`. Callers reject blank descriptions first.
pub async fn suggest_skills(
    description: &str,
    oracle: &dyn Oracle,
) -> Result<Vec<String>, SkillError> {
    let prompt = render(
        SUGGEST_PROMPT,
        &[
            ("description", description.trim()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );

    let raw: Value = call_json(oracle, OracleRequest::new(JSON_ONLY_SYSTEM, &prompt)).await?;
    let suggested = dedupe_case_insensitive(expect_string_array(raw, "skill suggestion")?);

    info!("Suggested {} skills from description", suggested.len());
    Ok(suggested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::mock::ScriptedOracle;
    use crate::skills::error::ErrorKind;

    #[tokio::test]
    async fn test_suggest_returns_clean_names() {
        let oracle = ScriptedOracle::new([r#"["Node.js", "REST API", "Amazon Web Services", "node.js"]"#]);
        let out = suggest_skills(
            "I built REST APIs using Node.js and deployed on AWS",
            &oracle,
        )
        .await
        .unwrap();
        assert_eq!(out, vec!["Node.js", "REST API", "Amazon Web Services"]);
        assert!(oracle.prompts()[0].contains("deployed on AWS"));
    }

    #[tokio::test]
    async fn test_suggest_empty_reply_is_ok_and_empty() {
        let oracle = ScriptedOracle::new(["[]"]);
        let out = suggest_skills("I like walks", &oracle).await.unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_suggest_rejects_object_reply() {
        let oracle = ScriptedOracle::new([r#"{"skills": ["Java"]}"#]);
        let err = suggest_skills("coding in Java", &oracle).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }
}
