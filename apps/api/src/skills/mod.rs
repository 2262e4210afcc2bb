// Skill pipeline stages: extraction → aggregation → normalization → classification,
// plus the candidate-side validation, suggestion and taxonomy matching, and the final comparison.
// Oracle-backed stages validate the response shape before building their result.

pub mod aggregator;
pub mod classifier;
pub mod comparison;
pub mod error;
pub mod extractor;
pub mod job_title;
pub mod models;
pub mod normalizer;
pub mod prompts;
pub mod suggest;
pub mod taxonomy;
pub mod validator;

use serde_json::Value;

use crate::skills::error::SkillError;

/// Serializes a skill list for embedding in a prompt.
pub(crate) fn to_json_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Accepts only a JSON array whose elements are all strings.
pub(crate) fn expect_string_array(value: Value, what: &str) -> Result<Vec<String>, SkillError> {
    let Value::Array(items) = value else {
        return Err(SkillError::malformed(format!(
            "{what}: expected a JSON array, got {}",
            json_type(&value)
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(s) => Ok(s),
            other => Err(SkillError::malformed(format!(
                "{what}: element {i} is {}, expected a string",
                json_type(&other)
            ))),
        })
        .collect()
}

/// Trims entries, drops blanks and removes case-insensitive duplicates, keeping first spelling.
pub(crate) fn dedupe_case_insensitive<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .collect()
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
