//! Market path: job title → postings → extracted mentions → aggregated frequencies
//! → normalized names → core/optional classification.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::job_search::{JobSearch, JobSearchError, SearchQuery};
use crate::llm_client::Oracle;
use crate::pipeline::{Stage, StageDiagnostic};
use crate::skills::aggregator::{aggregate_skills, flatten_mentions};
use crate::skills::classifier::{attach_frequencies, classify_skills, ClassifiedNames};
use crate::skills::error::SkillError;
use crate::skills::extractor::extract_skills;
use crate::skills::job_title::is_valid_job_title;
use crate::skills::models::{AggregatedSkill, ClassifiedSkillSet};
use crate::skills::normalizer::normalize_or_passthrough;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("'{0}' is not a recognized job title")]
    InvalidJobTitle(String),

    /// The title check itself could not run, so nothing downstream was attempted.
    #[error("job title check failed: {0}")]
    TitleCheckUnavailable(#[source] SkillError),

    #[error(transparent)]
    JobSearch(#[from] JobSearchError),
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketAnalysis {
    pub job_title: String,
    pub country_code: String,
    pub postings_analyzed: usize,
    pub aggregated: Vec<AggregatedSkill>,
    pub normalized_skills: Vec<String>,
    pub classified: ClassifiedSkillSet,
    pub diagnostics: Vec<StageDiagnostic>,
}

/// Runs the full market analysis for `query.job_title`.
///
/// The title is checked before any search is made, and a search failure (including an
/// exhausted quota) stops the run before extraction. Past that point every stage degrades:
/// extraction to no mentions, normalization to the aggregated names, classification to an
/// empty set.
pub async fn analyze_market(
    query: &SearchQuery,
    frequency_threshold: u32,
    oracle: &dyn Oracle,
    job_search: &dyn JobSearch,
) -> Result<MarketAnalysis, MarketError> {
    let title = query.job_title.trim();
    let valid = is_valid_job_title(title, oracle)
        .await
        .map_err(MarketError::TitleCheckUnavailable)?;
    if !valid {
        return Err(MarketError::InvalidJobTitle(title.to_string()));
    }

    let postings = job_search.search(query).await?;
    if postings.is_empty() {
        warn!("No postings found for '{title}'");
    }

    let mut diagnostics = Vec::new();

    let lists = match extract_skills(&postings, oracle).await {
        Ok(lists) => lists,
        Err(e) => {
            diagnostics.push(StageDiagnostic::new(
                Stage::SkillExtraction,
                &e,
                "no skill mentions",
            ));
            Vec::new()
        }
    };

    let aggregated = aggregate_skills(&flatten_mentions(lists), frequency_threshold);
    let names: Vec<String> = aggregated.iter().map(|s| s.name.clone()).collect();

    let (normalized_skills, err) = normalize_or_passthrough(&names, oracle).await;
    if let Some(e) = err {
        diagnostics.push(StageDiagnostic::new(
            Stage::SkillNormalization,
            &e,
            "aggregated names used as-is",
        ));
    }

    let classified_names =
        match classify_skills(&normalized_skills, title, &query.country_code, oracle).await {
            Ok(names) => names,
            Err(e) => {
                diagnostics.push(StageDiagnostic::new(
                    Stage::CoreClassification,
                    &e,
                    "empty classification",
                ));
                ClassifiedNames::default()
            }
        };
    let classified = attach_frequencies(classified_names, &aggregated);
    if classified.is_empty() && !aggregated.is_empty() {
        warn!("No skills classified for '{title}' despite {} retained", aggregated.len());
    }

    info!(
        "Market analysis for '{}': {} postings, {} retained skills, {} core",
        title,
        postings.len(),
        aggregated.len(),
        classified.core.len()
    );

    Ok(MarketAnalysis {
        job_title: title.to_string(),
        country_code: query.country_code.clone(),
        postings_analyzed: postings.len(),
        aggregated,
        normalized_skills,
        classified,
        diagnostics,
    })
}
