//! Deliverables: the issues a project's report calls out as shipped or due.
//!
//! Deliverables are picked per project, preferably by the summarizer (see
//! [`crate::Summarizer::extract_deliverables`]). When the summarizer fails or
//! names none, [`by_issue_type`] picks them from the issue types instead.

use serde::{Deserialize, Serialize};

use crate::{Issue, UNKNOWN_FIELD};

/// Shown when a deliverable has no due date.
pub const NO_DUE_DATE: &str = "No due date";

/// Issue type fragments that mark an issue as a deliverable, matched
/// case-insensitively anywhere in the type name.
pub const DELIVERABLE_TYPES: [&str; 5] = ["story", "epic", "task", "deliverable", "feature"];

/// One row of a project's deliverables table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deliverable {
    pub name: String,
    /// Calendar date (`YYYY-MM-DD`) or [`NO_DUE_DATE`].
    pub due_date: String,
    /// Calendar date (`YYYY-MM-DD`) or [`UNKNOWN_FIELD`].
    pub updated: String,
    pub status: String,
}

impl Deliverable {
    /// Builds a row, cutting both dates down to their calendar part. Blank
    /// values fall back to [`NO_DUE_DATE`] and [`UNKNOWN_FIELD`].
    pub fn new(
        name: impl Into<String>,
        due_date: Option<&str>,
        updated: Option<&str>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            due_date: date_or(due_date, NO_DUE_DATE),
            updated: date_or(updated, UNKNOWN_FIELD),
            status: status.into(),
        }
    }

    /// A row describing `issue` itself.
    pub fn from_issue(issue: &Issue) -> Self {
        Self::new(
            issue.summary.clone(),
            issue.due_date.as_deref(),
            issue.updated.as_deref(),
            issue.status.clone(),
        )
    }
}

/// Who picked a project's deliverables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliverableSource {
    /// The summarizer chose them.
    Summarizer,
    /// They were chosen by [`by_issue_type`].
    IssueType,
}

/// A project's deliverables and how they were chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deliverables {
    pub source: DeliverableSource,
    pub items: Vec<Deliverable>,
}

/// Picks the issues whose type names a unit of delivered work (stories,
/// epics, tasks, features), keeping fetch order.
pub fn by_issue_type(issues: &[Issue]) -> Vec<Deliverable> {
    issues
        .iter()
        .filter(|issue| {
            let issue_type = issue.issue_type.to_lowercase();
            DELIVERABLE_TYPES.iter().any(|t| issue_type.contains(*t))
        })
        .map(Deliverable::from_issue)
        .collect()
}

/// The date part of a tracker timestamp: `2025-07-01T09:30:00.000+0000`
/// becomes `2025-07-01`. Values without a time part are returned trimmed.
pub fn calendar_date(raw: &str) -> &str {
    let raw = raw.trim();
    raw.split_once('T').map_or(raw, |(date, _)| date)
}

fn date_or(raw: Option<&str>, fallback: &str) -> String {
    match raw.map(calendar_date) {
        Some(date) if !date.is_empty() => date.to_string(),
        _ => fallback.to_string(),
    }
}
