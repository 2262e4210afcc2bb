// Stage orchestration for the two data paths, plus the per-session context they write into.
// Every stage failure is recovered here and surfaced as a `StageDiagnostic` beside the result.

pub mod candidate;
pub mod context;
pub mod market;

use serde::Serialize;
use tracing::warn;

use crate::skills::error::{ErrorKind, SkillError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ResumeStructuring,
    SkillExtraction,
    SkillSuggestion,
    SkillValidation,
    SkillNormalization,
    TaxonomyMatching,
    CoreClassification,
}

/// A stage that failed and was degraded rather than aborting the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageDiagnostic {
    pub stage: Stage,
    pub kind: ErrorKind,
    pub message: String,
    /// What the pipeline used instead.
    pub fallback: &'static str,
}

impl StageDiagnostic {
    pub fn new(stage: Stage, error: &SkillError, fallback: &'static str) -> Self {
        warn!("{stage:?} degraded ({fallback}): {error}");
        Self {
            stage,
            kind: error.kind(),
            message: error.to_string(),
            fallback,
        }
    }
}
