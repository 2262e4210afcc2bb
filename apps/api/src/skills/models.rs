use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A literal skill phrase with its mention count across postings and its share of the
/// retained mentions (0–100, one decimal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSkill {
    #[serde(rename = "skill", alias = "name")]
    pub name: String,
    pub count: u32,
    #[serde(rename = "pct", alias = "percentage")]
    pub percentage: f64,
}

/// Skills for a job title split into near-universal (`core`) and role-specific (`optional`).
///
/// Disjoint by name, never contains the job title, no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedSkillSet {
    pub core: Vec<AggregatedSkill>,
    pub optional: Vec<AggregatedSkill>,
}

impl ClassifiedSkillSet {
    pub fn is_empty(&self) -> bool {
        self.core.is_empty() && self.optional.is_empty()
    }

    /// Lower-cased core names, as used for comparison.
    pub fn core_labels(&self) -> BTreeSet<String> {
        self.core
            .iter()
            .map(|s| s.name.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// The candidate's canonical skill labels, lower-cased and deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateSkillProfile(BTreeSet<String>);

impl CandidateSkillProfile {
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            labels
                .into_iter()
                .map(|l| l.as_ref().trim().to_lowercase())
                .filter(|l| !l.is_empty())
                .collect(),
        )
    }

    pub fn labels(&self) -> &BTreeSet<String> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(&label.trim().to_lowercase())
    }
}

/// Matched and missing core skills, both sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    /// matched / core × 100, one decimal.
    pub coverage_pct: f64,
}

/// Rounds to one decimal place, the precision used for every displayed percentage.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregated_skill_wire_names() {
        let skill = AggregatedSkill {
            name: "Python".to_string(),
            count: 3,
            percentage: 100.0,
        };
        let json = serde_json::to_value(&skill).unwrap();
        assert_eq!(json["skill"], "Python");
        assert_eq!(json["pct"], 100.0);
    }

    #[test]
    fn test_aggregated_skill_accepts_long_field_names() {
        let json = r#"{"name": "Git", "count": 2, "percentage": 40.0}"#;
        let skill: AggregatedSkill = serde_json::from_str(json).unwrap();
        assert_eq!(skill.name, "Git");
    }

    #[test]
    fn test_profile_lowercases_and_dedupes() {
        let profile = CandidateSkillProfile::from_labels(["Python", "python ", "Git", ""]);
        assert_eq!(profile.len(), 2);
        assert!(profile.contains("PYTHON"));
    }

    #[test]
    fn test_core_labels_are_lowercase() {
        let set = ClassifiedSkillSet {
            core: vec![AggregatedSkill {
                name: "Docker".to_string(),
                count: 2,
                percentage: 50.0,
            }],
            optional: vec![],
        };
        assert!(set.core_labels().contains("docker"));
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(33.333), 33.3);
        assert_eq!(round1(66.66), 66.7);
    }
}
