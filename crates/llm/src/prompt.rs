//! Prompt templates.

use pipeline::deliverables::NO_DUE_DATE;
use pipeline::{Issue, ProjectName, UNKNOWN_FIELD};
use serde_json::json;

/// Fixed instruction placed before every issue's text.
pub const SUMMARY_PREFIX: &str = "Summarize this issue:";

/// Prompt for summarizing one issue.
pub fn issue_prompt(text: &str) -> String {
    format!("{SUMMARY_PREFIX}\n\n{text}")
}

/// Prompt for a short overview of one project's issues.
pub fn project_prompt(project: &ProjectName, issue_lines: &[String]) -> String {
    format!(
        "You are a project manager assistant. Given the following issues of project \
         \"{project}\", write a concise, professional high-level summary of the work \
         completed and planned. Limit the summary to 150 words. Do not mention issue keys \
         and do not list individual issues. Reply with the summary only.\n\n{}",
        issue_lines.join("\n")
    )
}

/// Prompt asking which of a project's issues are deliverables. The reply is
/// expected to hold a JSON array; see [`crate::deliverables::parse_reply`].
pub fn deliverables_prompt(project: &ProjectName, issues: &[Issue]) -> String {
    let listed: Vec<serde_json::Value> = issues
        .iter()
        .map(|issue| {
            json!({
                "issue_type": issue.issue_type,
                "issue_key": issue.key.as_str(),
                "summary": issue.summary,
                "status": issue.status,
                "due_date": issue.due_date.as_deref().unwrap_or(NO_DUE_DATE),
                "updated": issue.updated.as_deref().unwrap_or(UNKNOWN_FIELD),
            })
        })
        .collect();

    format!(
        "You are a project management assistant. Analyze the following issues of project \
         \"{project}\" and identify which ones represent key deliverables of the project.\n\n\
         A deliverable is typically:\n\
         - a work item whose outcome can be shown,\n\
         - closed or done,\n\
         - a story, epic, task, or feature (not a bug or sub-task).\n\n\
         Issues:\n{:#}\n\n\
         Reply with ONLY a JSON array in this exact format:\n\
         [\n  {{\n    \"deliverable_name\": \"Brief description of the deliverable\",\n    \
         \"due_date\": \"YYYY-MM-DD\",\n    \"date_updated\": \"YYYY-MM-DD\",\n    \
         \"status\": \"Status from the tracker\"\n  }}\n]",
        serde_json::Value::Array(listed)
    )
}
