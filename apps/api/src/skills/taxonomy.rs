//! Taxonomy Matcher — maps phrases to the most specific ESCO/O*NET-style label.
//!
//! The returned mapping is total over the input: phrases the oracle left out map to themselves.
//! A reply that is not an object of string labels is a total failure, never a partial guess.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{call_json, Oracle, OracleRequest};
use crate::skills::error::SkillError;
use crate::skills::prompts::TAXONOMY_PROMPT;
use crate::skills::{json_type, to_json_list};

/// Input phrase → canonical taxonomy label.
pub type TaxonomyMapping = BTreeMap<String, String>;

/// Leading verbs and modifiers that never belong to a taxonomy label. Longest first.
const LEADING_MODIFIERS: &[&str] = &[
    "experience with ",
    "developing in ",
    "knowledge of ",
    "proficiency in ",
    "working with ",
    "develop in ",
    "work with ",
    "using ",
    "use of ",
    "use ",
];

pub async fn match_to_taxonomy(
    skills: &[String],
    oracle: &dyn Oracle,
) -> Result<TaxonomyMapping, SkillError> {
    if skills.is_empty() {
        return Ok(TaxonomyMapping::new());
    }

    let skills_json = to_json_list(skills);
    let prompt = render(
        TAXONOMY_PROMPT,
        &[
            ("skills_json", skills_json.as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );

    let raw: Value = call_json(oracle, OracleRequest::new(JSON_ONLY_SYSTEM, &prompt)).await?;
    let returned = parse_mapping(raw)?;
    Ok(complete_mapping(skills, &returned))
}

/// Identity mapping, used when taxonomy matching is unavailable.
pub fn identity_mapping(skills: &[String]) -> TaxonomyMapping {
    skills.iter().map(|s| (s.clone(), s.clone())).collect()
}

fn parse_mapping(raw: Value) -> Result<BTreeMap<String, String>, SkillError> {
    let Value::Object(map) = raw else {
        return Err(SkillError::malformed(format!(
            "taxonomy matching: expected an object mapping skills to labels, got {}",
            json_type(&raw)
        )));
    };

    map.into_iter()
        .map(|(key, value)| match value {
            Value::String(label) => Ok((key, label)),
            other => Err(SkillError::malformed(format!(
                "taxonomy matching: label for '{key}' is {}, expected a string",
                json_type(&other)
            ))),
        })
        .collect()
}

/// Builds the total mapping: exact key, then case-insensitive key, then identity.
fn complete_mapping(skills: &[String], returned: &BTreeMap<String, String>) -> TaxonomyMapping {
    let by_folded: BTreeMap<String, &String> = returned
        .iter()
        .map(|(k, v)| (k.trim().to_lowercase(), v))
        .collect();

    let mut missing = 0usize;
    let mapping: TaxonomyMapping = skills
        .iter()
        .map(|skill| {
            let label = returned
                .get(skill)
                .or_else(|| by_folded.get(&skill.trim().to_lowercase()).copied())
                .map(|l| strip_leading_modifiers(l))
                .filter(|l| !l.is_empty());
            let label = match label {
                Some(l) => l.to_string(),
                None => {
                    missing += 1;
                    skill.clone()
                }
            };
            (skill.clone(), label)
        })
        .collect();

    if missing > 0 {
        warn!("Taxonomy matcher left {missing} skills unmapped; using identity labels");
    }
    debug!("Taxonomy matched {} skills", mapping.len());
    mapping
}

/// Removes leading verbs/modifiers such as "use X" or "develop in X".
pub fn strip_leading_modifiers(label: &str) -> &str {
    let trimmed = label.trim();
    for prefix in LEADING_MODIFIERS {
        if trimmed.len() > prefix.len()
            && trimmed.is_char_boundary(prefix.len())
            && trimmed[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            return trimmed[prefix.len()..].trim_start();
        }
    }
    trimmed
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
    async fn test_mapping_is_total_on_partial_reply() {
        let oracle = ScriptedOracle::new([r#"{"programming": "Programming"}"#]);
        let mapping = match_to_taxonomy(&strings(&["programming", "blender"]), &oracle)
            .await
            .unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping["programming"], "Programming");
        assert_eq!(mapping["blender"], "blender");
    }

    #[tokio::test]
    async fn test_leading_verbs_are_stripped() {
        let oracle = ScriptedOracle::new([r#"{"java": "use Java", "c++": "Develop in C++"}"#]);
        let mapping = match_to_taxonomy(&strings(&["java", "c++"]), &oracle)
            .await
            .unwrap();
        assert_eq!(mapping["java"], "Java");
        assert_eq!(mapping["c++"], "C++");
    }

    #[tokio::test]
    async fn test_case_insensitive_key_lookup() {
        let oracle = ScriptedOracle::new([r#"{"Python": "Python"}"#]);
        let mapping = match_to_taxonomy(&strings(&["python"]), &oracle)
            .await
            .unwrap();
        assert_eq!(mapping["python"], "Python");
    }

    #[tokio::test]
    async fn test_array_reply_is_total_failure() {
        let oracle = ScriptedOracle::new([r#"["Python"]"#]);
        let err = match_to_taxonomy(&strings(&["python"]), &oracle)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_non_string_label_is_total_failure() {
        let oracle = ScriptedOracle::new([r#"{"python": ["Python", "Python 3"]}"#]);
        assert!(match_to_taxonomy(&strings(&["python"]), &oracle)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_canonical_labels_map_to_themselves() {
        let labels = strings(&["Java", "SQL", "Project management"]);
        let reply = serde_json::to_string(&identity_mapping(&labels)).unwrap();
        let oracle = ScriptedOracle::new([reply]);
        let mapping = match_to_taxonomy(&labels, &oracle).await.unwrap();
        for label in &labels {
            assert_eq!(&mapping[label], label);
        }
    }

    #[tokio::test]
    async fn test_identity_reply_is_idempotent_on_rerun() {
        let labels = strings(&["Programming", "Git"]);
        let oracle = ScriptedOracle::new([
            r#"{"Programming": "Programming", "Git": "Git"}"#,
            r#"{"Programming": "Programming", "Git": "Git"}"#,
        ]);
        let first = match_to_taxonomy(&labels, &oracle).await.unwrap();
        let second_input: Vec<String> = first.values().cloned().collect();
        let second = match_to_taxonomy(&second_input, &oracle).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_strip_leading_modifiers_leaves_plain_labels() {
        assert_eq!(strip_leading_modifiers("User research"), "User research");
        assert_eq!(strip_leading_modifiers("working with Kubernetes"), "Kubernetes");
        assert_eq!(strip_leading_modifiers("use"), "use");
    }
}
