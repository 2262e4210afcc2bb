//! Job-title check — asks the oracle whether a string is a real job title.

use tracing::info;

use crate::llm_client::prompts::render;
use crate::llm_client::{Oracle, OracleRequest};
use crate::skills::error::SkillError;
use crate::skills::prompts::{JOB_TITLE_PROMPT, JOB_TITLE_SYSTEM};

/// `Ok(true)` when the oracle's reply contains "yes" (case-insensitive).
/// Blank titles are invalid without asking.
pub async fn is_valid_job_title(title: &str, oracle: &dyn Oracle) -> Result<bool, SkillError> {
    let title = title.trim();
    if title.is_empty() {
        return Ok(false);
    }

    let prompt = render(JOB_TITLE_PROMPT, &[("title", title)]);
    let reply = oracle
        .complete(OracleRequest::new(JOB_TITLE_SYSTEM, &prompt))
        .await?;

    let valid = reply.to_lowercase().contains("yes");
    info!("Job title '{title}' judged valid: {valid}");
    Ok(valid)
}
