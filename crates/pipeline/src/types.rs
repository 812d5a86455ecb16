//! Shared value types for the jira-digest pipeline domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! the data that flows through a run: the per-project query, the normalized
//! issue record, and the per-issue summary outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{IssueKey, ProjectName};

/// Value used for optional tracker fields (status, issue type) that were absent.
pub const UNKNOWN_FIELD: &str = "Unknown";

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// One configured project together with the query clause appended to its
/// project filter.
///
/// Immutable once loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectQuery {
    /// Project name used in the `project = '...'` clause.
    pub name: ProjectName,
    /// Query clause appended after the project filter (e.g. `AND status = Done`).
    pub jql_suffix: String,
}

impl ProjectQuery {
    /// Creates a [`ProjectQuery`].
    pub fn new(name: ProjectName, jql_suffix: impl Into<String>) -> Self {
        Self {
            name,
            jql_suffix: jql_suffix.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

/// A tracker issue, normalized at the adapter boundary.
///
/// Optional tracker fields are resolved to their defaults before an [`Issue`]
/// is built, so downstream code never deals with absent values: a missing
/// description is an empty string and a missing status or type is
/// [`UNKNOWN_FIELD`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Tracker-assigned key.
    pub key: IssueKey,
    /// One-line issue title.
    pub summary: String,
    /// Plain-text description; empty when the issue has none.
    pub description: String,
    /// Project the issue was fetched for.
    pub project_name: ProjectName,
    /// Issue type name (e.g. `"Story"`).
    pub issue_type: String,
    /// Workflow status name (e.g. `"Done"`).
    pub status: String,
    /// Due date as the tracker reported it, if any.
    #[serde(default)]
    pub due_date: Option<String>,
    /// Last update time as the tracker reported it, if known.
    #[serde(default)]
    pub updated: Option<String>,
}

impl Issue {
    /// Creates an issue with unknown type and status.
    pub fn new(
        key: IssueKey,
        project_name: ProjectName,
        summary: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key,
            summary: summary.into(),
            description: description.into(),
            project_name,
            issue_type: UNKNOWN_FIELD.to_string(),
            status: UNKNOWN_FIELD.to_string(),
            due_date: None,
            updated: None,
        }
    }

    /// Sets the issue type and status.
    pub fn with_classification(
        mut self,
        issue_type: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        self.issue_type = issue_type.into();
        self.status = status.into();
        self
    }

    /// Sets the due date and last update time.
    pub fn with_dates(mut self, due_date: Option<String>, updated: Option<String>) -> Self {
        self.due_date = due_date;
        self.updated = updated;
        self
    }

    /// Text handed to the summarizer: the title, then the description when
    /// there is one.
    pub fn summarization_text(&self) -> String {
        let description = self.description.trim();
        if description.is_empty() {
            self.summary.clone()
        } else {
            format!("{}\n\n{}", self.summary, description)
        }
    }

    /// Single-line rendering used when summarizing a whole project.
    pub fn overview_line(&self) -> String {
        format!(
            "Issue Key: {}, Type: {}, Summary: {}, Status: {}",
            self.key, self.issue_type, self.summary, self.status
        )
    }
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Outcome of summarizing one issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatus {
    /// The summarizer returned text.
    Ok,
    /// The summarizer failed; the summary text is a placeholder.
    Failed,
}

/// The summary produced for exactly one [`Issue`].
///
/// Never mutated after creation. A failed summarization still yields a
/// [`SummaryResult`] whose text is a visible placeholder, so the report keeps
/// one entry per fetched issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    /// Key of the summarized issue.
    pub issue_key: IssueKey,
    /// Project of the summarized issue.
    pub project_name: ProjectName,
    /// Generated summary, or the placeholder when [`SummaryStatus::Failed`].
    pub summary_text: String,
    /// Whether the summarizer succeeded.
    pub status: SummaryStatus,
    /// Failure reason; `None` when the summary succeeded.
    pub error_detail: Option<String>,
}

impl SummaryResult {
    /// A successful summary of `issue`.
    pub fn ok(issue: &Issue, summary_text: impl Into<String>) -> Self {
        Self {
            issue_key: issue.key.clone(),
            project_name: issue.project_name.clone(),
            summary_text: summary_text.into(),
            status: SummaryStatus::Ok,
            error_detail: None,
        }
    }

    /// A failed summary of `issue`; the text becomes [`placeholder_summary`].
    pub fn failed(issue: &Issue, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            issue_key: issue.key.clone(),
            project_name: issue.project_name.clone(),
            summary_text: placeholder_summary(&reason),
            status: SummaryStatus::Failed,
            error_detail: Some(reason),
        }
    }

    /// Returns `true` if the summarizer succeeded.
    pub fn is_ok(&self) -> bool {
        self.status == SummaryStatus::Ok
    }
}

/// Visible text substituted for a summary that could not be generated.
pub fn placeholder_summary(reason: &str) -> String {
    format!("[Summary unavailable: {reason}]")
}

// ---------------------------------------------------------------------------
// Run state
// ---------------------------------------------------------------------------

/// Stages of a single run.
///
/// `Failed` is reachable only from `LoadingConfig`; every later failure is
/// recorded and the run still reaches `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Init,
    LoadingConfig,
    Fetching,
    Summarizing,
    Appended,
    Serializing,
    Done,
    Failed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunState::Init => "init",
            RunState::LoadingConfig => "loading_config",
            RunState::Fetching => "fetching",
            RunState::Summarizing => "summarizing",
            RunState::Appended => "appended",
            RunState::Serializing => "serializing",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// W3C date-time with second precision (`2025-07-01T09:30:00Z`), the form
    /// document metadata expects.
    pub fn to_w3c(self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
