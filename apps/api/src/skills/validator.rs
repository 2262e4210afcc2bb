//! Skill Validator — keeps only the candidate-entered phrases the oracle recognizes as real skills.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{call_json, Oracle, OracleRequest};
use crate::skills::error::SkillError;
use crate::skills::prompts::VALIDATE_PROMPT;
use crate::skills::{expect_string_array, to_json_list};

/// Outcome of validating user-entered skills.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: Vec<String>,
    pub rejected: Vec<String>,
}

/// Splits `skills` into recognized and rejected items.
///
/// The valid list only ever contains items from the input, in input order and spelling.
pub async fn validate_skills(
    skills: &[String],
    oracle: &dyn Oracle,
) -> Result<ValidationReport, SkillError> {
    if skills.is_empty() {
        return Ok(ValidationReport::default());
    }

    let skills_json = to_json_list(skills);
    let prompt = render(
        VALIDATE_PROMPT,
        &[
            ("skills_json", skills_json.as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );

    let raw: Value = call_json(oracle, OracleRequest::new(JSON_ONLY_SYSTEM, &prompt)).await?;
    let accepted = expect_string_array(raw, "skill validation")?;
    let report = partition(skills, &accepted);

    info!(
        "Validated {} skills: {} accepted, {} rejected",
        skills.len(),
        report.valid.len(),
        report.rejected.len()
    );
    Ok(report)
}

fn partition(skills: &[String], accepted: &[String]) -> ValidationReport {
    let accepted: HashSet<String> = accepted.iter().map(|s| s.trim().to_lowercase()).collect();

    let mut report = ValidationReport::default();
    for skill in skills {
        if accepted.contains(&skill.trim().to_lowercase()) {
            if !report.valid.contains(skill) {
                report.valid.push(skill.clone());
            }
        } else if !report.rejected.contains(skill) {
            report.rejected.push(skill.clone());
        }
    }
    report
}

/// Parses comma-separated manual input into trimmed, non-empty entries.
pub fn split_manual_input(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::mock::ScriptedOracle;
    use crate::skills::error::ErrorKind;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_nonsense_is_rejected() {
        let oracle = ScriptedOracle::new([r#"["CATIA", "Blender"]"#]);
        let report = validate_skills(&strings(&["CATIA", "sdfsdf", "Blender", "baba"]), &oracle)
            .await
            .unwrap();
        assert_eq!(report.valid, vec!["CATIA", "Blender"]);
        assert_eq!(report.rejected, vec!["sdfsdf", "baba"]);
    }

    #[tokio::test]
    async fn test_fabricated_items_are_ignored() {
        let oracle = ScriptedOracle::new([r#"["SAS", "Kubernetes"]"#]);
        let report = validate_skills(&strings(&["sas"]), &oracle).await.unwrap();
        assert_eq!(report.valid, vec!["sas"]);
        assert!(report.rejected.is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_an_error_not_a_list() {
        let oracle = ScriptedOracle::unreachable();
        let err = validate_skills(&strings(&["React"]), &oracle)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OracleCall);
    }

    #[tokio::test]
    async fn test_object_reply_is_malformed() {
        let oracle = ScriptedOracle::new([r#"{"valid": ["React"]}"#]);
        let err = validate_skills(&strings(&["React"]), &oracle)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_empty_input_skips_oracle() {
        let oracle = ScriptedOracle::unreachable();
        let report = validate_skills(&[], &oracle).await.unwrap();
        assert!(report.valid.is_empty());
        assert_eq!(oracle.calls(), 0);
    }

    #[test]
    fn test_split_manual_input() {
        assert_eq!(
            split_manual_input(" React, Spring Boot,,GraphQL , "),
            vec!["React", "Spring Boot", "GraphQL"]
        );
        assert!(split_manual_input("  ").is_empty());
    }
}
