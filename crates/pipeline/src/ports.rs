//! Port traits implemented by the infrastructure crates.
//!
//! | Trait | Implemented by |
//! |-------|----------------|
//! | [`IssueSource`] | `jira::JiraClient` |
//! | [`Summarizer`] | `llm::OllamaSummarizer` |
//! | [`ReportWriter`] | `document::DocxWriter` |
//!
//! The executor in the `runner` crate holds these as trait objects, so tests can
//! substitute in-memory fakes for every external call.

use std::path::Path;

use async_trait::async_trait;

use crate::{Deliverable, FetchError, Issue, ProjectName, Report, SerializeError, SummarizeError};

/// Searches the issue tracker.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Returns at most `page_size` issues of `project` matching `query_rest`,
    /// in the order the tracker returned them.
    ///
    /// A single page is requested; there is no pagination beyond it.
    async fn fetch_issues(
        &self,
        project: &ProjectName,
        query_rest: &str,
        page_size: u32,
    ) -> Result<Vec<Issue>, FetchError>;
}

/// Generates text from a prompt.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarizes one issue's text. Returns an empty string when the endpoint
    /// answered but produced no text.
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError>;

    /// Summarizes a whole project from one line per issue.
    ///
    /// The default forwards the joined lines to [`Summarizer::summarize`].
    async fn summarize_project(
        &self,
        project: &ProjectName,
        issue_lines: &[String],
    ) -> Result<String, SummarizeError> {
        let _ = project;
        self.summarize(&issue_lines.join("\n")).await
    }

    /// Picks the deliverables among one project's issues.
    ///
    /// An empty list means the summarizer named none; the caller then falls
    /// back to [`crate::deliverables::by_issue_type`]. The default names none.
    async fn extract_deliverables(
        &self,
        project: &ProjectName,
        issues: &[Issue],
    ) -> Result<Vec<Deliverable>, SummarizeError> {
        let _ = (project, issues);
        Ok(Vec::new())
    }
}

/// Persists a finished [`Report`].
pub trait ReportWriter: Send + Sync {
    /// Writes `report` to `path`, replacing any existing file. Either the whole
    /// document is written or the destination is left untouched.
    fn serialize(&self, report: &Report, path: &Path) -> Result<(), SerializeError>;
}
