//! Per-session pipeline context: what each stage has produced so far for one user.
//!
//! Each field is owned by exactly one step and overwritten whenever that step reruns.
//! The comparison is never stored; it is recomputed from the profile and the latest market run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::pipeline::candidate::{ProfileReport, ResumeReport, SuggestionReport};
use crate::pipeline::market::MarketAnalysis;
use crate::skills::comparison::{compare, Comparison};
use crate::skills::models::CandidateSkillProfile;

#[derive(Debug, Clone, Serialize)]
pub struct PipelineContext {
    pub id: Uuid,
    pub raw_text: Option<String>,
    pub resume: Option<ResumeReport>,
    pub suggestions: Option<SuggestionReport>,
    pub profile: Option<ProfileReport>,
    pub market: Option<MarketAnalysis>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PipelineContext {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            raw_text: None,
            resume: None,
            suggestions: None,
            profile: None,
            market: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the résumé only. A profile built from the previous one stays until rebuilt.
    pub fn set_resume(&mut self, raw_text: String, report: ResumeReport) {
        self.raw_text = Some(raw_text);
        self.resume = Some(report);
        self.touch();
    }

    pub fn set_suggestions(&mut self, report: SuggestionReport) {
        self.suggestions = Some(report);
        self.touch();
    }

    pub fn set_profile(&mut self, report: ProfileReport) {
        self.profile = Some(report);
        self.touch();
    }

    pub fn set_market(&mut self, analysis: MarketAnalysis) {
        self.market = Some(analysis);
        self.touch();
    }

    /// Skills pulled from the résumé, or none if no résumé was analyzed.
    pub fn extracted_skills(&self) -> &[String] {
        self.resume
            .as_ref()
            .map(|r| r.extracted_skills.as_slice())
            .unwrap_or_default()
    }

    pub fn comparison(&self) -> Comparison {
        let empty_profile = CandidateSkillProfile::default();
        let profile = self.profile.as_ref().map_or(&empty_profile, |p| &p.profile);
        let classified = self
            .market
            .as_ref()
            .map(|m| m.classified.clone())
            .unwrap_or_default();
        compare(profile, &classified)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self::new()
    }
}
