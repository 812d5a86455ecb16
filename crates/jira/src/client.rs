//! Tracker REST client.

use async_trait::async_trait;
use pipeline::{truncate_body, FetchError, Issue, IssueSource, ProjectName, Secret, TrackerConfig};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::jql;
use crate::types::{Myself, SearchResponse};

pub const SEARCH_PATH: &str = "/rest/api/3/search";
pub const MYSELF_PATH: &str = "/rest/api/3/myself";

/// Fields requested from the search endpoint.
const SEARCH_FIELDS: &str = "summary,description,status,issuetype,duedate,updated";

/// Authenticated client for one tracker instance.
///
/// Requests are bounded by the configured timeout and no idle connection is
/// kept between calls.
pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    token: Secret,
}

impl JiraClient {
    /// Builds a client. Performs no network I/O.
    pub fn new(config: &TrackerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(0)
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .header(AUTHORIZATION, format!("Bearer {}", self.token.expose()))
            .header(ACCEPT, "application/json")
    }

    async fn search_request(&self, jql: &str, max_results: u32) -> reqwest::Result<reqwest::Response> {
        let max_results = max_results.to_string();
        self.get(SEARCH_PATH)
            .query(&[
                ("jql", jql),
                ("maxResults", max_results.as_str()),
                ("fields", SEARCH_FIELDS),
            ])
            .send()
            .await
    }

    /// Returns the account the token authenticates as.
    pub async fn myself(&self) -> Result<Myself> {
        let response = self.get(MYSELF_PATH).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Runs `jql` as-is (no project clause) and returns the raw page.
    pub async fn sample_search(&self, jql: &str, max_results: u32) -> Result<SearchResponse> {
        let response = self.search_request(jql, max_results).await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl IssueSource for JiraClient {
    async fn fetch_issues(
        &self,
        project: &ProjectName,
        query_rest: &str,
        page_size: u32,
    ) -> std::result::Result<Vec<Issue>, FetchError> {
        let query = jql::project_query(project, query_rest);
        debug!(project = %project, jql = %query, max_results = page_size, "Searching tracker");

        let transport = |e: reqwest::Error| FetchError::Transport {
            project: project.clone(),
            timed_out: e.is_timeout(),
            message: e.to_string(),
        };

        let response = self
            .search_request(&query, page_size)
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(FetchError::Status {
                project: project.clone(),
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let page: SearchResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode {
                project: project.clone(),
                message: e.to_string(),
            })?;

        if let Some(total) = page.total {
            if total > page.issues.len() as u64 {
                info!(
                    project = %project,
                    total,
                    returned = page.issues.len(),
                    "More issues match than the result cap allows; extra issues are not fetched"
                );
            }
        }

        let mut issues = Vec::with_capacity(page.issues.len());
        for record in page.issues {
            match record.into_issue(project) {
                Some(issue) => issues.push(issue),
                None => warn!(project = %project, "Skipping tracker record without a key"),
            }
        }
        info!(project = %project, count = issues.len(), "Fetched issues");
        Ok(issues)
    }
}
