//! Per-run counts printed when a run finishes.

use std::fmt;
use std::path::PathBuf;

use pipeline::{DeliverableSource, ProjectName, Report, RunId, RunState};
use serde::Serialize;

/// What happened to one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectOutcome {
    pub project: ProjectName,
    /// Issues returned by the tracker.
    pub fetched: usize,
    /// Issues whose summary was generated.
    pub summarized: usize,
    /// Issues that received a placeholder summary.
    pub failed: usize,
    /// Set when the project's issues could not be fetched.
    pub fetch_error: Option<String>,
    /// Deliverable rows in the report; zero when none were picked.
    pub deliverables: usize,
    /// Who picked the deliverables, when the step ran.
    pub deliverable_source: Option<DeliverableSource>,
}

impl ProjectOutcome {
    pub fn is_fetch_failure(&self) -> bool {
        self.fetch_error.is_some()
    }
}

/// Result of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub projects: Vec<ProjectOutcome>,
    /// Where the report was written; `None` until serialization succeeds.
    pub output: Option<PathBuf>,
    pub final_state: RunState,
}

impl RunSummary {
    /// Counts taken from an assembled report.
    pub(crate) fn from_report(run_id: RunId, report: &Report) -> Self {
        let projects = report
            .sections()
            .iter()
            .map(|section| ProjectOutcome {
                project: section.project.clone(),
                fetched: section.entries.len(),
                summarized: section.summarized_count(),
                failed: section.failed_count(),
                fetch_error: section.fetch_error.clone(),
                deliverables: section.deliverable_count(),
                deliverable_source: section.deliverables.as_ref().map(|d| d.source),
            })
            .collect();

        Self {
            run_id,
            projects,
            output: None,
            final_state: RunState::Appended,
        }
    }

    pub fn total_fetched(&self) -> usize {
        self.projects.iter().map(|p| p.fetched).sum()
    }

    pub fn total_summarized(&self) -> usize {
        self.projects.iter().map(|p| p.summarized).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.projects.iter().map(|p| p.failed).sum()
    }

    pub fn total_deliverables(&self) -> usize {
        self.projects.iter().map(|p| p.deliverables).sum()
    }

    /// Number of projects whose fetch failed.
    pub fn failed_projects(&self) -> usize {
        self.projects.iter().filter(|p| p.is_fetch_failure()).count()
    }

    /// `true` when every project was fetched and every issue summarized.
    pub fn is_clean(&self) -> bool {
        self.failed_projects() == 0 && self.total_failed() == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run {} ({})", self.run_id, self.final_state)?;
        writeln!(
            f,
            "{:<24} {:>8} {:>11} {:>7} {:>13}",
            "Project", "Fetched", "Summarized", "Failed", "Deliverables"
        )?;
        for p in &self.projects {
            match &p.fetch_error {
                Some(reason) => writeln!(f, "{:<24} fetch failed: {reason}", p.project.as_str())?,
                None => writeln!(
                    f,
                    "{:<24} {:>8} {:>11} {:>7} {:>13}",
                    p.project.as_str(),
                    p.fetched,
                    p.summarized,
                    p.failed,
                    deliverable_cell(p)
                )?,
            }
        }
        writeln!(
            f,
            "{:<24} {:>8} {:>11} {:>7} {:>13}",
            "Total",
            self.total_fetched(),
            self.total_summarized(),
            self.total_failed(),
            self.total_deliverables()
        )?;
        match &self.output {
            Some(path) => write!(f, "Report: {}", path.display()),
            None => write!(f, "Report: not written"),
        }
    }
}

/// `3`, `3 (by type)` when the issue-type rule picked them, `-` when the step
/// did not run.
fn deliverable_cell(p: &ProjectOutcome) -> String {
    match p.deliverable_source {
        None => "-".to_string(),
        Some(DeliverableSource::Summarizer) => p.deliverables.to_string(),
        Some(DeliverableSource::IssueType) => format!("{} (by type)", p.deliverables),
    }
}
