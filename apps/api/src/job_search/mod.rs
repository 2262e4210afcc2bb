//! Job Search — fetches recent posting descriptions for a job title.
//!
//! `TheirStackClient` is the production implementation. The pipeline depends on the
//! `JobSearch` trait only.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;

#[cfg(test)]
pub mod mock;

pub const THEIRSTACK_SEARCH_URL: &str = "https://api.theirstack.com/v1/jobs/search";

#[derive(Debug, Error)]
pub enum JobSearchError {
    /// 402 Payment Required: credits exhausted or the plan expired.
    #[error("job search quota exhausted: the API credits are used up or the plan has expired")]
    QuotaExhausted,

    #[error("job search API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("job search HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// What to search for. Built from config plus the user's job title.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub job_title: String,
    pub limit: u32,
    pub max_age_days: u32,
    pub country_code: String,
}

impl SearchQuery {
    pub fn from_config(job_title: &str, config: &Config) -> Self {
        Self {
            job_title: job_title.trim().to_string(),
            limit: config.job_search_limit,
            max_age_days: config.job_search_max_age_days,
            country_code: config.job_search_country.clone(),
        }
    }
}

/// Returns a bounded list of non-empty posting descriptions.
#[async_trait]
pub trait JobSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, JobSearchError>;
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    page: u32,
    limit: u32,
    job_title_or: [&'a str; 1],
    posted_at_max_age_days: u32,
    blur_company_data: bool,
    order_by: [OrderBy; 1],
    job_country_code_or: [&'a str; 1],
    include_total_results: bool,
}

#[derive(Debug, Serialize)]
struct OrderBy {
    desc: bool,
    field: &'static str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Value>,
}

#[derive(Clone)]
pub struct TheirStackClient {
    client: Client,
    api_key: String,
    url: String,
}

impl TheirStackClient {
    pub fn from_config(config: &Config) -> Result<Self, JobSearchError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            api_key: config.theirstack_api_key.clone(),
            url: config.job_search_url.clone(),
        })
    }
}

#[async_trait]
impl JobSearch for TheirStackClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, JobSearchError> {
        let body = SearchRequest {
            page: 0,
            limit: query.limit,
            job_title_or: [query.job_title.as_str()],
            posted_at_max_age_days: query.max_age_days,
            blur_company_data: false,
            order_by: [OrderBy {
                desc: true,
                field: "date_posted",
            }],
            job_country_code_or: [query.country_code.as_str()],
            include_total_results: false,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::PAYMENT_REQUIRED {
            warn!("Job search returned 402 for '{}'", query.job_title);
            return Err(JobSearchError::QuotaExhausted);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(JobSearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SearchResponse = response.json().await?;
        debug!("Job search returned {} records", parsed.data.len());
        let descriptions = collect_descriptions(parsed.data);
        info!(
            "Fetched {} postings with descriptions for '{}'",
            descriptions.len(),
            query.job_title
        );
        Ok(descriptions)
    }
}

/// Keeps only non-empty string `description` fields, trimmed. Other records are dropped silently.
fn collect_descriptions(records: Vec<Value>) -> Vec<String> {
    records
        .into_iter()
        .filter_map(|record| match record.get("description") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::{HeaderMap, StatusCode}, routing::post, Json, Router};
    use serde_json::json;

    /// Serves `app` on an ephemeral local port and returns the search URL.
    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1/jobs/search")
    }

    async fn respond_with(status: StatusCode, body: &'static str) -> String {
        serve(Router::new().route(
            "/v1/jobs/search",
            post(move || async move { (status, body) }),
        ))
        .await
    }

    fn client_for(url: String) -> TheirStackClient {
        let mut config = Config::for_tests();
        config.job_search_url = url;
        TheirStackClient::from_config(&config).unwrap()
    }

    fn data_analyst() -> SearchQuery {
        SearchQuery::from_config("Data Analyst", &Config::for_tests())
    }

    #[tokio::test]
    async fn test_payment_required_maps_to_quota_exhausted() {
        let url = respond_with(StatusCode::PAYMENT_REQUIRED, r#"{"error": "no credits"}"#).await;
        let err = client_for(url).search(&data_analyst()).await.unwrap_err();
        assert!(matches!(err, JobSearchError::QuotaExhausted));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api_error_with_status() {
        let url = respond_with(StatusCode::INTERNAL_SERVER_ERROR, "upstream down").await;
        let err = client_for(url).search(&data_analyst()).await.unwrap_err();
        match err {
            JobSearchError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream down");
            }
            other => panic!("expected an API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        // bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(format!("http://{addr}/v1/jobs/search"))
            .search(&data_analyst())
            .await
            .unwrap_err();
        assert!(matches!(err, JobSearchError::Http(_)));
    }

    #[tokio::test]
    async fn test_success_sends_bearer_and_payload() {
        let app = Router::new().route(
            "/v1/jobs/search",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({
                    "data": [
                        {"description": format!("{auth} | {}", body["job_title_or"][0])},
                        {"description": "  "},
                        {"description": format!("limit {} country {}", body["limit"], body["job_country_code_or"][0])},
                    ]
                }))
            }),
        );
        let url = serve(app).await;

        let postings = client_for(url).search(&data_analyst()).await.unwrap();
        assert_eq!(
            postings,
            vec![
                r#"Bearer test-key | "Data Analyst""#.to_string(),
                r#"limit 10 country "SE""#.to_string(),
            ]
        );
    }

    #[test]
    fn test_collect_descriptions_drops_missing_and_blank() {
        let records = vec![
            json!({"description": "  Requires Python and SQL.  "}),
            json!({"description": ""}),
            json!({"description": "   "}),
            json!({"description": null}),
            json!({"description": 42}),
            json!({"job_title": "Developer"}),
            json!({"description": "Needs Docker."}),
        ];
        assert_eq!(
            collect_descriptions(records),
            vec!["Requires Python and SQL.", "Needs Docker."]
        );
    }

    #[test]
    fn test_request_payload_shape() {
        let body = SearchRequest {
            page: 0,
            limit: 10,
            job_title_or: ["software developer"],
            posted_at_max_age_days: 15,
            blur_company_data: false,
            order_by: [OrderBy {
                desc: true,
                field: "date_posted",
            }],
            job_country_code_or: ["SE"],
            include_total_results: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["job_title_or"][0], "software developer");
        assert_eq!(json["job_country_code_or"][0], "SE");
        assert_eq!(json["order_by"][0]["field"], "date_posted");
        assert_eq!(json["posted_at_max_age_days"], 15);
    }

    #[test]
    fn test_response_without_data_is_empty() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.data.is_empty());
    }

    #[test]
    fn test_quota_error_message_is_user_facing() {
        assert!(JobSearchError::QuotaExhausted
            .to_string()
            .contains("quota exhausted"));
    }
}
