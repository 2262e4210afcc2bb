//! Frequency Aggregator — counts literal skill phrases across postings.
//!
//! Works on literal phrases, before normalization, so frequencies reflect how employers
//! actually phrase requirements. Percentages are shares of the *retained* mentions.
//! Pure function, no oracle.

use std::collections::HashMap;

use crate::skills::models::{round1, AggregatedSkill};

/// Counts each distinct phrase, keeps those with `count >= threshold`, and orders them by
/// count descending, ties broken by first appearance in `mentions`.
pub fn aggregate_skills<S: AsRef<str>>(mentions: &[S], threshold: u32) -> Vec<AggregatedSkill> {
    // (count, first-seen index) per literal phrase
    let mut counts: HashMap<&str, (u32, usize)> = HashMap::new();
    for (index, mention) in mentions.iter().enumerate() {
        counts
            .entry(mention.as_ref())
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, index));
    }

    let mut retained: Vec<(&str, u32, usize)> = counts
        .into_iter()
        .filter(|(_, (count, _))| *count >= threshold)
        .map(|(name, (count, first_seen))| (name, count, first_seen))
        .collect();

    retained.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    let total: u32 = retained.iter().map(|(_, count, _)| count).sum();
    if total == 0 {
        return Vec::new();
    }

    retained
        .into_iter()
        .map(|(name, count, _)| AggregatedSkill {
            name: name.to_string(),
            count,
            percentage: round1(count as f64 / total as f64 * 100.0),
        })
        .collect()
}

/// Flattens per-posting skill lists into a single mention list, preserving order.
pub fn flatten_mentions(lists: Vec<Vec<String>>) -> Vec<String> {
    lists.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_threshold_two_keeps_only_python() {
        let lists = vec![
            vec!["Python".to_string(), "SQL".to_string()],
            vec!["Python".to_string(), "Docker".to_string(), "Agile".to_string()],
            vec!["Python".to_string(), "Git".to_string()],
        ];
        let out = aggregate_skills(&flatten_mentions(lists), 2);
        assert_eq!(
            out,
            vec![AggregatedSkill {
                name: "Python".to_string(),
                count: 3,
                percentage: 100.0,
            }]
        );
    }

    #[test]
    fn test_percentage_uses_retained_denominator() {
        // Python 3, Git 2 retained (sum 5); SQL 1 dropped
        let mentions = ["Python", "Git", "Python", "SQL", "Git", "Python"];
        let out = aggregate_skills(&mentions, 2);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].percentage, 60.0);
        assert_eq!(out[1].percentage, 40.0);
    }

    #[test]
    fn test_ties_break_by_first_seen() {
        let mentions = ["Docker", "Agile", "Agile", "Docker", "Git"];
        let out = aggregate_skills(&mentions, 1);
        let names: Vec<&str> = out.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Docker", "Agile", "Git"]);
    }

    #[test]
    fn test_literal_phrases_are_not_merged() {
        let mentions = ["python", "Python", "Python"];
        let out = aggregate_skills(&mentions, 1);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "Python");
        assert_eq!(out[1].name, "python");
    }

    #[test]
    fn test_nothing_retained_returns_empty() {
        let mentions = ["SQL", "Git"];
        assert!(aggregate_skills(&mentions, 2).is_empty());
        assert!(aggregate_skills::<&str>(&[], 1).is_empty());
    }

    #[test]
    fn test_percentages_round_to_one_decimal() {
        let mentions = ["A", "B", "C"];
        let out = aggregate_skills(&mentions, 1);
        assert!(out.iter().all(|s| s.percentage == 33.3));
    }

    proptest! {
        #[test]
        fn percentages_sum_to_hundred_and_respect_threshold(
            mentions in proptest::collection::vec("[a-e]", 0..60),
            threshold in 1u32..5
        ) {
            let out = aggregate_skills(&mentions, threshold);
            prop_assert!(out.iter().all(|s| s.count >= threshold));
            prop_assert!(out.iter().all(|s| (0.0..=100.0).contains(&s.percentage)));
            if !out.is_empty() {
                let sum: f64 = out.iter().map(|s| s.percentage).sum();
                // each entry rounds by at most 0.05
                prop_assert!((sum - 100.0).abs() <= 0.05 * out.len() as f64 + 1e-9);
            }
            for pair in out.windows(2) {
                prop_assert!(pair[0].count >= pair[1].count);
            }
        }
    }
}
