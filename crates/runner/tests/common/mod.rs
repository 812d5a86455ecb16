//! In-memory port implementations shared by the run tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pipeline::{
    Deliverable, FetchError, Issue, IssueKey, IssueSource, ProjectName, Report, ReportWriter,
    SerializeError, SummarizeError, Summarizer,
};

pub fn issue(key: &str, project: &str, summary: &str, description: &str) -> Issue {
    Issue::new(
        IssueKey::new(key).unwrap(),
        ProjectName::new(project).unwrap(),
        summary,
        description,
    )
}

/// Minimal valid environment; `extra` entries override or add keys.
pub fn env(extra: &[(&str, &str)]) -> HashMap<String, String> {
    let mut vars: HashMap<String, String> = [
        ("JIRA_TOKEN", "t0ken"),
        ("JIRA_URL", "https://tracker.example.com"),
        ("JIRA_JQL", "AND updated >= -30d"),
        ("SUMMARIZE_RETRY_DELAY_MS", "0"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    vars
}

// ---------------------------------------------------------------------------
// Issue source
// ---------------------------------------------------------------------------

/// Serves canned issues per project and records every request.
#[derive(Default)]
pub struct FakeSource {
    issues: HashMap<String, Result<Vec<Issue>, FetchError>>,
    pub calls: Mutex<Vec<(String, String, u32)>>,
}

impl FakeSource {
    pub fn with(mut self, project: &str, issues: Vec<Issue>) -> Self {
        self.issues.insert(project.to_string(), Ok(issues));
        self
    }

    pub fn failing(mut self, project: &str, status: u16) -> Self {
        self.issues.insert(
            project.to_string(),
            Err(FetchError::Status {
                project: ProjectName::new(project).unwrap(),
                status,
                body: "unavailable".into(),
            }),
        );
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl IssueSource for FakeSource {
    async fn fetch_issues(
        &self,
        project: &ProjectName,
        query_rest: &str,
        page_size: u32,
    ) -> Result<Vec<Issue>, FetchError> {
        self.calls.lock().unwrap().push((
            project.to_string(),
            query_rest.to_string(),
            page_size,
        ));
        self.issues
            .get(project.as_str())
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

// ---------------------------------------------------------------------------
// Summarizers
// ---------------------------------------------------------------------------

/// Returns its input unchanged.
#[derive(Default)]
pub struct EchoSummarizer {
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl Summarizer for EchoSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        self.calls.lock().unwrap().push(text.to_string());
        Ok(text.to_string())
    }

    async fn summarize_project(
        &self,
        project: &ProjectName,
        issue_lines: &[String],
    ) -> Result<String, SummarizeError> {
        self.calls.lock().unwrap().push(format!("project:{project}"));
        Ok(format!("{project}: {} issues", issue_lines.len()))
    }
}

/// Plays back scripted results in order; echoes once the script runs out.
#[derive(Default)]
pub struct ScriptedSummarizer {
    script: Mutex<VecDeque<Result<String, SummarizeError>>>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedSummarizer {
    pub fn new(script: Vec<Result<String, SummarizeError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::default(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Summarizer for ScriptedSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        self.calls.lock().unwrap().push(text.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(text.to_string()))
    }
}

/// Echoes issue text and answers every deliverables request with `reply`.
pub struct DeliverableSummarizer {
    reply: Result<Vec<Deliverable>, SummarizeError>,
    pub projects: Mutex<Vec<(String, usize)>>,
}

impl DeliverableSummarizer {
    pub fn new(reply: Result<Vec<Deliverable>, SummarizeError>) -> Self {
        Self {
            reply,
            projects: Mutex::default(),
        }
    }
}

#[async_trait]
impl Summarizer for DeliverableSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        Ok(text.to_string())
    }

    async fn extract_deliverables(
        &self,
        project: &ProjectName,
        issues: &[Issue],
    ) -> Result<Vec<Deliverable>, SummarizeError> {
        self.projects
            .lock()
            .unwrap()
            .push((project.to_string(), issues.len()));
        self.reply.clone()
    }
}

pub fn unreachable() -> SummarizeError {
    SummarizeError::Unreachable {
        message: "connection refused".into(),
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Keeps every serialized report in memory.
#[derive(Default)]
pub struct MemoryWriter {
    pub written: Mutex<Vec<(Report, PathBuf)>>,
}

impl MemoryWriter {
    pub fn last(&self) -> Report {
        self.written.lock().unwrap().last().unwrap().0.clone()
    }

    pub fn count(&self) -> usize {
        self.written.lock().unwrap().len()
    }
}

impl ReportWriter for MemoryWriter {
    fn serialize(&self, report: &Report, path: &Path) -> Result<(), SerializeError> {
        self.written
            .lock()
            .unwrap()
            .push((report.clone(), path.to_path_buf()));
        Ok(())
    }
}

/// Always fails with an I/O error.
pub struct BrokenWriter;

impl ReportWriter for BrokenWriter {
    fn serialize(&self, _report: &Report, path: &Path) -> Result<(), SerializeError> {
        Err(SerializeError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
