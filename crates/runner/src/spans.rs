//! Span builders for a run.
//!
//! ```text
//! digest.run                 (one per invocation)
//!   └─ digest.project        (one per configured project)
//!       └─ digest.issue      (one per fetched issue)
//! ```
//!
//! Result fields start empty and are filled through the `record_*` helpers.

use pipeline::{IssueKey, ProjectName, RunId};
use tracing::Span;

pub const FIELD_SUCCESS: &str = "digest.success";
pub const FIELD_ATTEMPTS: &str = "digest.attempts";
pub const FIELD_FETCHED: &str = "digest.fetched";
pub const FIELD_FAILED: &str = "digest.failed";

/// Root span for one run.
pub fn run_span(run_id: &RunId, project_count: usize) -> Span {
    tracing::info_span!(
        "digest.run",
        "run.id" = %run_id,
        "digest.project_count" = project_count as u64,
    )
}

/// Span around fetching and summarizing one project.
pub fn project_span(project: &ProjectName) -> Span {
    tracing::info_span!(
        "digest.project",
        project = %project,
        "digest.fetched" = tracing::field::Empty,
        "digest.failed" = tracing::field::Empty,
    )
}

pub fn record_project_result(span: &Span, fetched: usize, failed: usize) {
    span.record(FIELD_FETCHED, fetched as u64);
    span.record(FIELD_FAILED, failed as u64);
}

/// Span around summarizing one issue, retries included.
pub fn issue_span(issue: &IssueKey) -> Span {
    tracing::debug_span!(
        "digest.issue",
        issue = %issue,
        "digest.success" = tracing::field::Empty,
        "digest.attempts" = tracing::field::Empty,
    )
}

pub fn record_issue_result(span: &Span, success: bool, attempts: u32) {
    span.record(FIELD_SUCCESS, success);
    span.record(FIELD_ATTEMPTS, attempts);
}
