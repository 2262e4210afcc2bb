//! Core Classifier — splits aggregated skills into core and optional for a job title.
//!
//! The oracle judges core-ness; the set invariants are enforced here regardless of what it returns:
//! - only names that were passed in survive (input spelling kept)
//! - the job title itself and spoken-language requirements are dropped
//! - no duplicates; a name listed under both stays in `core`
//!
//! Each surviving name is then re-joined with the aggregator's percentage by literal name.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use tracing::{info, warn};

use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{call_json, Oracle, OracleRequest};
use crate::skills::error::SkillError;
use crate::skills::models::{AggregatedSkill, ClassifiedSkillSet};
use crate::skills::prompts::CLASSIFY_PROMPT;
use crate::skills::to_json_list;

const CLASSIFY_TEMPERATURE: f32 = 0.2;

/// Spoken languages that show up as "skills" in postings but are never classified.
const SPOKEN_LANGUAGES: &[&str] = &[
    "english", "swedish", "german", "french", "spanish", "norwegian", "danish", "finnish",
    "dutch", "italian", "portuguese", "polish", "arabic", "chinese", "mandarin", "japanese",
    "russian", "hindi",
];

/// Raw classifier reply. Both keys are required.
#[derive(Debug, Deserialize)]
struct ClassificationReply {
    core: Vec<String>,
    optional: Vec<String>,
}

/// Core and optional names after invariant enforcement, before percentages are attached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedNames {
    pub core: Vec<String>,
    pub optional: Vec<String>,
}

/// Classifies `skills` for `job_title` in the market identified by `country_code`.
pub async fn classify_skills(
    skills: &[String],
    job_title: &str,
    country_code: &str,
    oracle: &dyn Oracle,
) -> Result<ClassifiedNames, SkillError> {
    if skills.is_empty() {
        return Ok(ClassifiedNames::default());
    }

    let skills_json = to_json_list(skills);
    let prompt = render(
        CLASSIFY_PROMPT,
        &[
            ("job_title", job_title.trim()),
            ("country", country_name(country_code)),
            ("skills_json", skills_json.as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );

    let reply: ClassificationReply = call_json(
        oracle,
        OracleRequest::new(JSON_ONLY_SYSTEM, &prompt).with_temperature(CLASSIFY_TEMPERATURE),
    )
    .await
    .map_err(|e| match e {
        crate::llm_client::LlmError::Parse(inner) => SkillError::malformed(format!(
            "classification: expected {{\"core\": [...], \"optional\": [...]}}: {inner}"
        )),
        other => SkillError::from(other),
    })?;

    let names = enforce_invariants(reply, skills, job_title);
    info!(
        "Classified skills for '{}': {} core, {} optional",
        job_title,
        names.core.len(),
        names.optional.len()
    );
    Ok(names)
}

fn enforce_invariants(
    reply: ClassificationReply,
    skills: &[String],
    job_title: &str,
) -> ClassifiedNames {
    let input: HashMap<String, &String> = skills
        .iter()
        .map(|s| (s.trim().to_lowercase(), s))
        .collect();
    let title = job_title.trim().to_lowercase();
    let mut seen: HashSet<String> = HashSet::new();
    let mut dropped = 0usize;

    let mut keep = |names: Vec<String>| -> Vec<String> {
        let mut kept = Vec::new();
        for name in names {
            let folded = name.trim().to_lowercase();
            let Some(original) = input.get(&folded) else {
                dropped += 1;
                continue;
            };
            if folded == title || is_spoken_language(&folded) || !seen.insert(folded) {
                continue;
            }
            kept.push((*original).clone());
        }
        kept
    };

    let core = keep(reply.core);
    let optional = keep(reply.optional);

    if dropped > 0 {
        warn!("Classifier returned {dropped} names that were not in the input; dropped");
    }
    ClassifiedNames { core, optional }
}

fn is_spoken_language(folded: &str) -> bool {
    let bare = folded
        .trim_start_matches("fluent ")
        .trim_start_matches("fluency in ")
        .trim_start_matches("business ")
        .trim_end_matches(" language")
        .trim_end_matches(" (fluent)")
        .trim();
    SPOKEN_LANGUAGES.contains(&bare)
}

/// Re-joins each classified name with its aggregate by literal name; unmatched names get 0.
pub fn attach_frequencies(
    names: ClassifiedNames,
    aggregated: &[AggregatedSkill],
) -> ClassifiedSkillSet {
    let lookup = |name: String| -> AggregatedSkill {
        match aggregated.iter().find(|a| a.name == name) {
            Some(found) => found.clone(),
            None => AggregatedSkill {
                name,
                count: 0,
                percentage: 0.0,
            },
        }
    };

    ClassifiedSkillSet {
        core: names.core.into_iter().map(lookup).collect(),
        optional: names.optional.into_iter().map(lookup).collect(),
    }
}

fn country_name(code: &str) -> &str {
    match code.trim().to_ascii_uppercase().as_str() {
        "SE" => "Sweden",
        "NO" => "Norway",
        "DK" => "Denmark",
        "FI" => "Finland",
        "DE" => "Germany",
        "GB" | "UK" => "the United Kingdom",
        "US" => "the United States",
        _ => code,
    }
}
