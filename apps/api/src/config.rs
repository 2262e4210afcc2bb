use anyhow::{Context, Result};

use crate::llm_client::Provider;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_provider: Provider,
    pub llm_api_key: String,
    /// Overrides the provider's default endpoint (OpenAI-compatible gateways).
    pub llm_base_url: Option<String>,
    pub llm_model: Option<String>,
    /// Total attempts per LLM call. 1 means no retry.
    pub llm_max_attempts: u32,
    pub llm_timeout_secs: u64,
    pub theirstack_api_key: String,
    pub job_search_url: String,
    pub job_search_limit: u32,
    pub job_search_max_age_days: u32,
    pub job_search_country: String,
    /// Minimum mention count for a skill to survive aggregation.
    pub skill_frequency_threshold: u32,
    /// Sessions untouched for this long are evicted.
    pub session_idle_ttl_secs: u64,
    pub session_sweep_interval_secs: u64,
    /// Body limit for résumé uploads.
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm_provider = std::env::var("LLM_PROVIDER")
            .unwrap_or_else(|_| "openai".to_string())
            .parse::<Provider>()
            .context("LLM_PROVIDER must be 'openai' or 'anthropic'")?;

        Ok(Config {
            llm_provider,
            llm_api_key: require_env("LLM_API_KEY")?,
            llm_base_url: optional_env("LLM_BASE_URL"),
            llm_model: optional_env("LLM_MODEL"),
            llm_max_attempts: parse_env("LLM_MAX_ATTEMPTS", 1)?.max(1),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            theirstack_api_key: require_env("THEIRSTACK_API_KEY")?,
            job_search_url: std::env::var("JOB_SEARCH_URL")
                .unwrap_or_else(|_| crate::job_search::THEIRSTACK_SEARCH_URL.to_string()),
            job_search_limit: parse_env("JOB_SEARCH_LIMIT", 10)?,
            job_search_max_age_days: parse_env("JOB_SEARCH_MAX_AGE_DAYS", 15)?,
            job_search_country: std::env::var("JOB_SEARCH_COUNTRY")
                .unwrap_or_else(|_| "SE".to_string()),
            skill_frequency_threshold: parse_env("SKILL_FREQUENCY_THRESHOLD", 2)?,
            session_idle_ttl_secs: parse_env("SESSION_IDLE_TTL_SECS", 3600)?,
            session_sweep_interval_secs: parse_env("SESSION_SWEEP_INTERVAL_SECS", 60)?.max(1),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            llm_provider: Provider::OpenAi,
            llm_api_key: "test-key".to_string(),
            llm_base_url: None,
            llm_model: None,
            llm_max_attempts: 1,
            llm_timeout_secs: 5,
            theirstack_api_key: "test-key".to_string(),
            job_search_url: crate::job_search::THEIRSTACK_SEARCH_URL.to_string(),
            job_search_limit: 10,
            job_search_max_age_days: 15,
            job_search_country: "SE".to_string(),
            skill_frequency_threshold: 2,
            session_idle_ttl_secs: 3600,
            session_sweep_interval_secs: 60,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            port: 0,
            rust_log: "info".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}
