//! In-memory report model.
//!
//! A [`Report`] is an ordered list of [`ProjectSection`]s, each holding the
//! issues of one project in fetch order together with their summaries. The
//! orchestrator is the only writer; it builds the report incrementally and hands
//! it to a [`crate::ReportWriter`] exactly once at the end of the run.
//!
//! Nothing here reorders entries. Sections appear in the order they were added
//! and issues in the order they were appended.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Deliverables, Issue, ProjectName, SummaryResult, Timestamp};

/// The report structure was asked to do something inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// An entry was added for a project that has no section.
    #[error("no section for project '{0}'")]
    UnknownProject(ProjectName),

    /// A summary was paired with an issue it does not describe.
    #[error("summary for '{summary}' does not belong to issue '{issue}'")]
    MismatchedSummary { issue: String, summary: String },
}

/// One issue and its summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueEntry {
    pub issue: Issue,
    pub summary: SummaryResult,
}

/// All entries belonging to one configured project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSection {
    pub project: ProjectName,
    /// Entries in fetch order.
    pub entries: Vec<IssueEntry>,
    /// Set when the project's issues could not be fetched.
    pub fetch_error: Option<String>,
    /// Optional overview paragraph covering the whole project.
    pub overview: Option<String>,
    /// Deliverables picked from the project's issues, when requested.
    pub deliverables: Option<Deliverables>,
}

impl ProjectSection {
    fn new(project: ProjectName) -> Self {
        Self {
            project,
            entries: Vec::new(),
            fetch_error: None,
            overview: None,
            deliverables: None,
        }
    }

    /// Number of entries whose summary succeeded.
    pub fn summarized_count(&self) -> usize {
        self.entries.iter().filter(|e| e.summary.is_ok()).count()
    }

    /// Number of entries carrying a placeholder summary.
    pub fn failed_count(&self) -> usize {
        self.entries.len() - self.summarized_count()
    }

    /// Number of deliverable rows; zero when none were picked.
    pub fn deliverable_count(&self) -> usize {
        self.deliverables.as_ref().map_or(0, |d| d.items.len())
    }
}

/// The document being assembled during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    /// When the run that produced this report started.
    pub generated_at: Timestamp,
    sections: Vec<ProjectSection>,
}

impl Report {
    /// Creates an empty report.
    pub fn new(title: impl Into<String>, generated_at: Timestamp) -> Self {
        Self {
            title: title.into(),
            generated_at,
            sections: Vec::new(),
        }
    }

    /// Appends a section for `project`. Adding a project twice keeps the first
    /// section and its position.
    pub fn add_project_section(&mut self, project: &ProjectName) {
        if self.section(project).is_none() {
            self.sections.push(ProjectSection::new(project.clone()));
        }
    }

    /// Appends `issue` and its `summary` to the end of `project`'s section.
    pub fn add_issue_summary(
        &mut self,
        project: &ProjectName,
        issue: Issue,
        summary: SummaryResult,
    ) -> Result<(), ReportError> {
        if summary.issue_key != issue.key {
            return Err(ReportError::MismatchedSummary {
                issue: issue.key.to_string(),
                summary: summary.issue_key.to_string(),
            });
        }
        self.section_mut(project)?
            .entries
            .push(IssueEntry { issue, summary });
        Ok(())
    }

    /// Records that `project`'s issues could not be fetched.
    pub fn mark_fetch_failed(
        &mut self,
        project: &ProjectName,
        reason: impl Into<String>,
    ) -> Result<(), ReportError> {
        self.section_mut(project)?.fetch_error = Some(reason.into());
        Ok(())
    }

    /// Sets the overview paragraph of `project`'s section.
    pub fn set_project_overview(
        &mut self,
        project: &ProjectName,
        overview: impl Into<String>,
    ) -> Result<(), ReportError> {
        self.section_mut(project)?.overview = Some(overview.into());
        Ok(())
    }

    /// Sets the deliverables of `project`'s section.
    pub fn set_project_deliverables(
        &mut self,
        project: &ProjectName,
        deliverables: Deliverables,
    ) -> Result<(), ReportError> {
        self.section_mut(project)?.deliverables = Some(deliverables);
        Ok(())
    }

    /// Sections in insertion order.
    pub fn sections(&self) -> &[ProjectSection] {
        &self.sections
    }

    /// The section for `project`, if one was added.
    pub fn section(&self, project: &ProjectName) -> Option<&ProjectSection> {
        self.sections.iter().find(|s| &s.project == project)
    }

    /// Total number of issue entries across all sections.
    pub fn issue_count(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }

    /// Total number of deliverable rows across all sections.
    pub fn deliverable_count(&self) -> usize {
        self.sections.iter().map(ProjectSection::deliverable_count).sum()
    }

    /// Returns `true` when no section holds any issue.
    pub fn is_empty(&self) -> bool {
        self.issue_count() == 0
    }

    fn section_mut(&mut self, project: &ProjectName) -> Result<&mut ProjectSection, ReportError> {
        self.sections
            .iter_mut()
            .find(|s| &s.project == project)
            .ok_or_else(|| ReportError::UnknownProject(project.clone()))
    }
}
