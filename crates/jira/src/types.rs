//! Tracker REST API wire types.
//!
//! Every field the tracker may omit is optional here and resolved exactly once,
//! in [`IssueRecord::into_issue`].

use pipeline::{Issue, IssueKey, ProjectName, UNKNOWN_FIELD};
use serde::{Deserialize, Serialize};

use crate::adf;

/// Body of `GET /rest/api/3/search`.
///
/// A response without an `issues` field decodes as zero issues.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Vec<IssueRecord>,
    /// Total matches on the server, which may exceed `issues.len()`.
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRecord {
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: Option<String>,
    /// Plain string (v2) or document tree (v3).
    #[serde(default)]
    pub description: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<NamedField>,
    #[serde(default)]
    pub issuetype: Option<NamedField>,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub duedate: Option<String>,
    /// Timestamp of the last change.
    #[serde(default)]
    pub updated: Option<String>,
}

/// Any `{ "name": ... }` object (status, issue type).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedField {
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `GET /rest/api/3/myself`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Myself {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
}

impl IssueRecord {
    /// Normalizes this record into a domain [`Issue`] belonging to `project`.
    ///
    /// Returns `None` for records without a usable key.
    pub fn into_issue(self, project: &ProjectName) -> Option<Issue> {
        let key = IssueKey::new(self.key)?;
        let fields = self.fields;
        let description = fields
            .description
            .as_ref()
            .map(adf::to_plain_text)
            .unwrap_or_default();
        let name_or_unknown = |field: Option<NamedField>| {
            field
                .and_then(|f| f.name)
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_FIELD.to_string())
        };
        let issue_type = name_or_unknown(fields.issuetype);
        let status = name_or_unknown(fields.status);

        Some(
            Issue::new(
                key,
                project.clone(),
                fields.summary.unwrap_or_default(),
                description,
            )
            .with_classification(issue_type, status)
            .with_dates(fields.duedate, fields.updated),
        )
    }
}
