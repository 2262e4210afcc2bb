use std::sync::Arc;

use crate::config::Config;
use crate::job_search::JobSearch;
use crate::llm_client::Oracle;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Every oracle-backed stage goes through this. `LlmClient` in production.
    pub oracle: Arc<dyn Oracle>,
    pub job_search: Arc<dyn JobSearch>,
    pub sessions: SessionStore,
    pub config: Config,
}
