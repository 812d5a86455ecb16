//! Run configuration.
//!
//! Configuration is read once, from named key/value pairs supplied by the
//! environment, into an immutable [`PipelineConfig`]. Every other component
//! receives the parts it needs at construction time; nothing reads the
//! environment after loading.
//!
//! Loading performs no network calls. Missing or malformed required values fail
//! with [`ConfigError`] before any adapter is constructed.
//!
//! ## Keys
//!
//! | Key | Required | Default |
//! |-----|----------|---------|
//! | `JIRA_TOKEN` | yes | |
//! | `JIRA_URL` | yes | |
//! | `JIRA_JQL` | yes | |
//! | `JIRA_PROJECTS` | no | [`DEFAULT_PROJECTS`] |
//! | `JIRA_MAX_RESULTS` | no | [`DEFAULT_MAX_RESULTS`] |
//! | `JIRA_TIMEOUT_SECS` | no | [`DEFAULT_TRACKER_TIMEOUT_SECS`] |
//! | `OLLAMA_URL` | no | [`DEFAULT_SUMMARIZER_URL`] |
//! | `OLLAMA_MODEL` | no | [`DEFAULT_SUMMARIZER_MODEL`] |
//! | `OLLAMA_TIMEOUT_SECS` | no | [`DEFAULT_SUMMARIZER_TIMEOUT_SECS`] |
//! | `SUMMARIZE_RETRIES` | no | `0` |
//! | `SUMMARIZE_RETRY_DELAY_MS` | no | [`DEFAULT_RETRY_DELAY_MS`] |
//! | `REPORT_PATH` | no | [`DEFAULT_REPORT_PATH`] |
//! | `REPORT_TITLE` | no | [`DEFAULT_REPORT_TITLE`] |
//! | `REPORT_PROJECT_OVERVIEW` | no | `false` |
//! | `REPORT_DELIVERABLES` | no | `false` |

use std::path::PathBuf;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::{ConfigError, ProjectName, ProjectQuery};

pub const KEY_TOKEN: &str = "JIRA_TOKEN";
pub const KEY_URL: &str = "JIRA_URL";
pub const KEY_JQL: &str = "JIRA_JQL";
pub const KEY_PROJECTS: &str = "JIRA_PROJECTS";
pub const KEY_MAX_RESULTS: &str = "JIRA_MAX_RESULTS";
pub const KEY_TRACKER_TIMEOUT: &str = "JIRA_TIMEOUT_SECS";
pub const KEY_SUMMARIZER_URL: &str = "OLLAMA_URL";
pub const KEY_SUMMARIZER_MODEL: &str = "OLLAMA_MODEL";
pub const KEY_SUMMARIZER_TIMEOUT: &str = "OLLAMA_TIMEOUT_SECS";
pub const KEY_RETRIES: &str = "SUMMARIZE_RETRIES";
pub const KEY_RETRY_DELAY: &str = "SUMMARIZE_RETRY_DELAY_MS";
pub const KEY_REPORT_PATH: &str = "REPORT_PATH";
pub const KEY_REPORT_TITLE: &str = "REPORT_TITLE";
pub const KEY_PROJECT_OVERVIEW: &str = "REPORT_PROJECT_OVERVIEW";
pub const KEY_DELIVERABLES: &str = "REPORT_DELIVERABLES";

/// Projects processed when neither `JIRA_PROJECTS` nor a command-line override
/// names any. Empty: such a run produces a title-only report.
pub const DEFAULT_PROJECTS: &[&str] = &[];
pub const DEFAULT_MAX_RESULTS: u32 = 50;
/// Upper bound accepted for `JIRA_MAX_RESULTS`; the tracker clamps above this.
pub const MAX_RESULTS_LIMIT: u32 = 1000;
pub const DEFAULT_TRACKER_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SUMMARIZER_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_SUMMARIZER_MODEL: &str = "llama3";
pub const DEFAULT_SUMMARIZER_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 2000;
pub const DEFAULT_REPORT_PATH: &str = "JIRA_Summary_Report.docx";
pub const DEFAULT_REPORT_TITLE: &str = "Projects Monthly Status Report";

const PLACEHOLDER_TOKEN: &str = "your_token_here";
const PLACEHOLDER_DOMAIN: &str = "yourdomain";

// ---------------------------------------------------------------------------
// Secret
// ---------------------------------------------------------------------------

/// A credential that never appears in `Debug` output or serialized config.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw credential for use in a request header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("***")
    }
}

// ---------------------------------------------------------------------------
// Config sections
// ---------------------------------------------------------------------------

/// Connection parameters for the issue tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerConfig {
    /// Base URL without a trailing slash (e.g. `https://tracker.example.com`).
    pub base_url: String,
    /// Bearer token.
    pub token: Secret,
    pub timeout_secs: u64,
}

impl TrackerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Connection parameters for the local generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummarizerConfig {
    /// Full endpoint URL (`.../api/generate` or `.../api/chat`).
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Extra attempts after a retryable failure. `0` disables retrying.
    pub retries: u32,
    /// Fixed delay between attempts.
    pub retry_delay_ms: u64,
}

impl SummarizerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Output document settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportConfig {
    pub path: PathBuf,
    pub title: String,
    /// Ask the summarizer for one overview paragraph per project.
    pub project_overview: bool,
    /// Add a deliverables table per project ahead of the issue sections.
    pub deliverables: bool,
}

/// Immutable configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineConfig {
    pub tracker: TrackerConfig,
    /// Query clause appended to every project filter.
    pub query_suffix: String,
    /// Projects in processing order.
    pub projects: Vec<ProjectQuery>,
    /// Per-project result cap.
    pub max_results: u32,
    pub summarizer: SummarizerConfig,
    pub report: ReportConfig,
}

impl PipelineConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which returns the raw value for a
    /// key or `None` when it is unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &str| get(key).ok_or_else(|| ConfigError::Missing { key: key.into() });

        let token = require(KEY_TOKEN)?;
        if token == PLACEHOLDER_TOKEN {
            return Err(ConfigError::Placeholder {
                key: KEY_TOKEN.into(),
            });
        }

        let base_url = require(KEY_URL)?;
        if base_url.contains(PLACEHOLDER_DOMAIN) {
            return Err(ConfigError::Placeholder {
                key: KEY_URL.into(),
            });
        }
        let base_url = parse_http_url(KEY_URL, &base_url)?;

        let query_suffix = require(KEY_JQL)?;

        let max_results = match get(KEY_MAX_RESULTS) {
            Some(raw) => {
                let n: u32 = parse_number(KEY_MAX_RESULTS, &raw)?;
                if n == 0 || n > MAX_RESULTS_LIMIT {
                    return Err(ConfigError::Invalid {
                        key: KEY_MAX_RESULTS.into(),
                        value: raw,
                        reason: format!("must be between 1 and {MAX_RESULTS_LIMIT}"),
                    });
                }
                n
            }
            None => DEFAULT_MAX_RESULTS,
        };

        let tracker_timeout = optional_number(&get, KEY_TRACKER_TIMEOUT, DEFAULT_TRACKER_TIMEOUT_SECS)?;
        let summarizer_timeout =
            optional_number(&get, KEY_SUMMARIZER_TIMEOUT, DEFAULT_SUMMARIZER_TIMEOUT_SECS)?;
        for (key, secs) in [
            (KEY_TRACKER_TIMEOUT, tracker_timeout),
            (KEY_SUMMARIZER_TIMEOUT, summarizer_timeout),
        ] {
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    key: key.into(),
                    value: "0".into(),
                    reason: "timeout must be at least one second".into(),
                });
            }
        }

        let summarizer_url = match get(KEY_SUMMARIZER_URL) {
            Some(raw) => parse_http_url(KEY_SUMMARIZER_URL, &raw)?,
            None => DEFAULT_SUMMARIZER_URL.to_string(),
        };

        let project_names = match get(KEY_PROJECTS) {
            Some(raw) => split_project_list(&raw),
            None => DEFAULT_PROJECTS.iter().map(|s| s.to_string()).collect(),
        };

        let project_overview = optional_bool(&get, KEY_PROJECT_OVERVIEW)?;
        let deliverables = optional_bool(&get, KEY_DELIVERABLES)?;

        let mut config = Self {
            tracker: TrackerConfig {
                base_url,
                token: Secret::new(token),
                timeout_secs: tracker_timeout,
            },
            query_suffix,
            projects: Vec::new(),
            max_results,
            summarizer: SummarizerConfig {
                endpoint: summarizer_url,
                model: get(KEY_SUMMARIZER_MODEL)
                    .unwrap_or_else(|| DEFAULT_SUMMARIZER_MODEL.to_string()),
                timeout_secs: summarizer_timeout,
                retries: optional_number(&get, KEY_RETRIES, 0)?,
                retry_delay_ms: optional_number(&get, KEY_RETRY_DELAY, DEFAULT_RETRY_DELAY_MS)?,
            },
            report: ReportConfig {
                path: get(KEY_REPORT_PATH)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH)),
                title: get(KEY_REPORT_TITLE).unwrap_or_else(|| DEFAULT_REPORT_TITLE.to_string()),
                project_overview,
                deliverables,
            },
        };
        config.set_projects(project_names);
        Ok(config)
    }

    /// Replaces the project list, e.g. with names given on the command line.
    /// Blank and duplicate names are dropped; order is preserved.
    pub fn with_projects<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_projects(names.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the output path.
    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report.path = path.into();
        self
    }

    fn set_projects(&mut self, names: Vec<String>) {
        let mut projects: Vec<ProjectQuery> = Vec::new();
        for name in names.into_iter().filter_map(ProjectName::new) {
            if projects.iter().any(|p| p.name == name) {
                continue;
            }
            projects.push(ProjectQuery::new(name, self.query_suffix.clone()));
        }
        self.projects = projects;
    }
}

fn split_project_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

fn parse_http_url(key: &str, raw: &str) -> Result<String, ConfigError> {
    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            key: key.into(),
            value: raw.into(),
            reason: "expected an http:// or https:// URL".into(),
        });
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key: key.into(),
        value: raw.into(),
        reason: e.to_string(),
    })
}

fn optional_number<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => parse_number(key, &raw),
        None => Ok(default),
    }
}

/// Unset means `false`.
fn optional_bool<G>(get: &G, key: &str) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => parse_bool(key, &raw),
        None => Ok(false),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key: key.into(),
            value: raw.into(),
            reason: "expected true or false".into(),
        }),
    }
}
