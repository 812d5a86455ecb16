//! The run loop.

use std::future::Future;
use std::sync::Arc;

use pipeline::deliverables::by_issue_type;
use pipeline::{
    placeholder_summary, ConfigError, DeliverableSource, Deliverables, Issue, IssueSource,
    PipelineConfig, ProjectQuery, Report, ReportError, ReportWriter, RetryPolicy, RunId, RunState,
    SerializeError, SummarizeError, Summarizer, SummaryResult, Timestamp,
};
use tracing::{debug, error, info, warn, Instrument};

use crate::spans;
use crate::summary::RunSummary;

/// Drives one run over the configured projects.
///
/// Calls are strictly sequential: each fetch and each summarization is
/// awaited before the next starts. The executor owns the in-progress
/// [`Report`]; nothing else mutates it.
pub struct PipelineExecutor {
    config: PipelineConfig,
    source: Arc<dyn IssueSource>,
    summarizer: Arc<dyn Summarizer>,
    writer: Arc<dyn ReportWriter>,
}

impl PipelineExecutor {
    pub fn new(
        config: PipelineConfig,
        source: Arc<dyn IssueSource>,
        summarizer: Arc<dyn Summarizer>,
        writer: Arc<dyn ReportWriter>,
    ) -> Self {
        Self {
            config,
            source,
            summarizer,
            writer,
        }
    }

    /// Loads configuration through `lookup` and builds the executor.
    ///
    /// A configuration error ends the run in [`RunState::Failed`] before any
    /// port is called.
    pub fn from_lookup<F>(
        lookup: F,
        source: Arc<dyn IssueSource>,
        summarizer: Arc<dyn Summarizer>,
        writer: Arc<dyn ReportWriter>,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        enter(RunState::Init);
        enter(RunState::LoadingConfig);
        match PipelineConfig::from_lookup(lookup) {
            Ok(config) => {
                debug!(config = ?config, "Configuration loaded");
                Ok(Self::new(config, source, summarizer, writer))
            }
            Err(e) => {
                error!(error = %e, "Configuration invalid");
                enter(RunState::Failed);
                Err(e)
            }
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs every project, then writes the report exactly once.
    ///
    /// Fetch and summarize failures are recorded in the report and the
    /// returned summary; only a [`SerializeError`] fails the run.
    pub async fn run(&self) -> Result<RunSummary, SerializeError> {
        let run_id = RunId::new_random();
        let span = spans::run_span(&run_id, self.config.projects.len());

        async move {
            let (report, mut summary) = self.assemble(run_id).await;

            enter(RunState::Serializing);
            let path = &self.config.report.path;
            if let Err(e) = self.writer.serialize(&report, path) {
                error!(error = %e, "Report could not be written");
                return Err(e);
            }

            enter(RunState::Done);
            summary.output = Some(path.clone());
            summary.final_state = RunState::Done;
            info!(
                path = %path.display(),
                fetched = summary.total_fetched(),
                summarized = summary.total_summarized(),
                failed = summary.total_failed(),
                failed_projects = summary.failed_projects(),
                "Run complete"
            );
            Ok(summary)
        }
        .instrument(span)
        .await
    }

    /// Builds the report in memory without writing it.
    pub async fn assemble(&self, run_id: RunId) -> (Report, RunSummary) {
        let mut report = Report::new(self.config.report.title.clone(), Timestamp::now());

        if self.config.projects.is_empty() {
            warn!("No projects configured; the report will contain only its title");
        }

        for query in &self.config.projects {
            let span = spans::project_span(&query.name);
            self.process_project(&mut report, query)
                .instrument(span)
                .await;
        }

        let summary = RunSummary::from_report(run_id, &report);
        (report, summary)
    }

    async fn process_project(&self, report: &mut Report, query: &ProjectQuery) {
        let project = &query.name;
        report.add_project_section(project);

        enter(RunState::Fetching);
        let issues = match self
            .source
            .fetch_issues(project, &query.jql_suffix, self.config.max_results)
            .await
        {
            Ok(issues) => issues,
            Err(e) => {
                warn!(project = %project, error = %e, "Fetch failed; continuing with next project");
                log_report_error(report.mark_fetch_failed(project, e.to_string()));
                spans::record_project_result(&tracing::Span::current(), 0, 0);
                return;
            }
        };

        enter(RunState::Summarizing);
        let overview_lines: Vec<String> = issues.iter().map(Issue::overview_line).collect();
        let fetched = issues.len();
        let mut failed = 0;

        for issue in &issues {
            let span = spans::issue_span(&issue.key);
            let summary = self.summarize_issue(issue).instrument(span).await;
            if !summary.is_ok() {
                failed += 1;
            }
            log_report_error(report.add_issue_summary(project, issue.clone(), summary));
        }

        if self.config.report.project_overview && fetched > 0 {
            let overview = self.summarize_project(query, &overview_lines).await;
            log_report_error(report.set_project_overview(project, overview));
        }

        if self.config.report.deliverables && fetched > 0 {
            let deliverables = self.extract_deliverables(query, &issues).await;
            log_report_error(report.set_project_deliverables(project, deliverables));
        }

        enter(RunState::Appended);
        spans::record_project_result(&tracing::Span::current(), fetched, failed);
    }

    async fn summarize_issue(&self, issue: &Issue) -> SummaryResult {
        let text = issue.summarization_text();
        let (result, attempts) = self.with_retry(|| self.summarizer.summarize(&text)).await;
        spans::record_issue_result(&tracing::Span::current(), result.is_ok(), attempts);

        match result {
            Ok(summary) => {
                debug!(issue = %issue.key, attempts, "Summarized");
                SummaryResult::ok(issue, summary)
            }
            Err(e) => {
                warn!(issue = %issue.key, attempts, error = %e, "Summarization failed; using placeholder");
                SummaryResult::failed(issue, e.to_string())
            }
        }
    }

    async fn summarize_project(&self, query: &ProjectQuery, lines: &[String]) -> String {
        let (result, attempts) = self
            .with_retry(|| self.summarizer.summarize_project(&query.name, lines))
            .await;
        match result {
            Ok(overview) => overview,
            Err(e) => {
                warn!(project = %query.name, attempts, error = %e, "Project overview failed; using placeholder");
                placeholder_summary(&e.to_string())
            }
        }
    }

    /// Asks the summarizer for the project's deliverables and falls back to
    /// the issue-type rule when it fails or names none.
    async fn extract_deliverables(&self, query: &ProjectQuery, issues: &[Issue]) -> Deliverables {
        let (result, attempts) = self
            .with_retry(|| self.summarizer.extract_deliverables(&query.name, issues))
            .await;
        let items = match result {
            Ok(items) if !items.is_empty() => {
                info!(project = %query.name, count = items.len(), "Deliverables picked by summarizer");
                return Deliverables {
                    source: DeliverableSource::Summarizer,
                    items,
                };
            }
            Ok(_) => {
                info!(project = %query.name, "Summarizer named no deliverables; matching issue types");
                by_issue_type(issues)
            }
            Err(e) => {
                warn!(project = %query.name, attempts, error = %e, "Deliverable extraction failed; matching issue types");
                by_issue_type(issues)
            }
        };
        Deliverables {
            source: DeliverableSource::IssueType,
            items,
        }
    }

    /// Calls `op` until it succeeds, fails with a non-retryable error, or
    /// the configured number of extra attempts is used up. Returns the last
    /// result and the number of attempts made.
    async fn with_retry<T, F, Fut>(&self, mut op: F) -> (Result<T, SummarizeError>, u32)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SummarizeError>>,
    {
        let retries = self.config.summarizer.retries;
        let base_delay = self.config.summarizer.retry_delay();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let e = match op().await {
                Ok(value) => return (Ok(value), attempts),
                Err(e) => e,
            };

            let delay = match e.retry_policy() {
                RetryPolicy::Retryable { after } if attempts <= retries => {
                    after.map_or(base_delay, |after| after.max(base_delay))
                }
                _ => return (Err(e), attempts),
            };

            warn!(
                attempt = attempts,
                delay_ms = delay.as_millis() as u64,
                error = %e,
                "Summarizer call failed; retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

fn enter(state: RunState) {
    debug!(state = %state, "Run state");
}

/// Report mutations only fail when a section is missing, which the loop
/// rules out by adding the section first.
fn log_report_error(result: Result<(), ReportError>) {
    if let Err(e) = result {
        error!(error = %e, "Report update rejected");
    }
}
