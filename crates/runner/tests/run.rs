//! Run-level behaviour over fake ports.

mod common;

use std::sync::Arc;

use common::*;
use document::{read_paragraphs, read_part, DocxWriter, DOCUMENT_PART};
use pipeline::{
    ConfigError, Deliverable, DeliverableSource, ProjectName, ReportWriter, RunId, RunState,
    SerializeError, SummarizeError, SummaryStatus,
};
use pretty_assertions::assert_eq;
use runner::PipelineExecutor;

fn executor(
    vars: &std::collections::HashMap<String, String>,
    source: Arc<FakeSource>,
    summarizer: Arc<dyn pipeline::Summarizer>,
    writer: Arc<dyn ReportWriter>,
) -> PipelineExecutor {
    PipelineExecutor::from_lookup(|k| vars.get(k).cloned(), source, summarizer, writer).unwrap()
}

fn apollo() -> ProjectName {
    ProjectName::new("Apollo").unwrap()
}

#[tokio::test]
async fn every_fetched_issue_gets_exactly_one_summary() {
    let vars = env(&[("JIRA_PROJECTS", "Apollo,Gemini"), ("JIRA_MAX_RESULTS", "25")]);
    let source = shared(
        FakeSource::default()
            .with(
                "Apollo",
                vec![
                    issue("A-1", "Apollo", "S1", "D1"),
                    issue("A-2", "Apollo", "S2", ""),
                ],
            )
            .with("Gemini", vec![issue("G-1", "Gemini", "S3", "")]),
    );
    let summarizer = shared(EchoSummarizer::default());
    let writer = shared(MemoryWriter::default());

    let summary = executor(&vars, source.clone(), summarizer.clone(), writer.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(summary.total_fetched(), 3);
    assert_eq!(summary.total_summarized(), 3);
    assert_eq!(summary.final_state, RunState::Done);
    assert_eq!(summarizer.calls.lock().unwrap().len(), 3);
    assert_eq!(writer.count(), 1);

    let report = writer.last();
    assert_eq!(report.issue_count(), 3);
    for section in report.sections() {
        for entry in &section.entries {
            assert_eq!(entry.summary.issue_key, entry.issue.key);
            assert_eq!(entry.summary.status, SummaryStatus::Ok);
        }
    }

    let calls = source.calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            ("Apollo".to_string(), "AND updated >= -30d".to_string(), 25),
            ("Gemini".to_string(), "AND updated >= -30d".to_string(), 25),
        ]
    );
}

#[tokio::test]
async fn summarizer_failure_does_not_stop_later_issues() {
    let vars = env(&[("JIRA_PROJECTS", "Apollo")]);
    let source = shared(FakeSource::default().with(
        "Apollo",
        vec![
            issue("A-1", "Apollo", "S1", ""),
            issue("A-2", "Apollo", "S2", ""),
            issue("A-3", "Apollo", "S3", ""),
        ],
    ));
    let summarizer = shared(ScriptedSummarizer::new(vec![
        Ok("first".into()),
        Err(unreachable()),
        Ok("third".into()),
    ]));
    let writer = shared(MemoryWriter::default());

    let summary = executor(&vars, source, summarizer.clone(), writer.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(summarizer.call_count(), 3);
    assert_eq!(summary.projects[0].summarized, 2);
    assert_eq!(summary.projects[0].failed, 1);

    let report = writer.last();
    let texts: Vec<&str> = report.sections()[0]
        .entries
        .iter()
        .map(|e| e.summary.summary_text.as_str())
        .collect();
    assert_eq!(
        texts,
        vec![
            "first",
            "[Summary unavailable: summarizer unreachable: connection refused]",
            "third",
        ]
    );
}

#[tokio::test]
async fn fetch_failure_is_isolated_to_its_project() {
    let vars = env(&[("JIRA_PROJECTS", "Broken,Apollo")]);
    let source = shared(
        FakeSource::default()
            .failing("Broken", 503)
            .with("Apollo", vec![issue("A-1", "Apollo", "S1", "")]),
    );
    let writer = shared(MemoryWriter::default());

    let summary = executor(&vars, source, shared(EchoSummarizer::default()), writer.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(summary.failed_projects(), 1);
    assert_eq!(summary.final_state, RunState::Done);
    assert!(summary.projects[0]
        .fetch_error
        .as_deref()
        .unwrap()
        .contains("503"));

    let report = writer.last();
    let names: Vec<&str> = report.sections().iter().map(|s| s.project.as_str()).collect();
    assert_eq!(names, vec!["Broken", "Apollo"]);
    assert!(report.sections()[0].entries.is_empty());
    assert_eq!(report.section(&apollo()).unwrap().entries.len(), 1);
}

#[tokio::test]
async fn all_projects_failing_still_writes_a_report() {
    let vars = env(&[("JIRA_PROJECTS", "A,B")]);
    let source = shared(FakeSource::default().failing("A", 500).failing("B", 401));
    let writer = shared(MemoryWriter::default());

    let summary = executor(&vars, source, shared(EchoSummarizer::default()), writer.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(summary.failed_projects(), 2);
    assert_eq!(summary.final_state, RunState::Done);
    assert!(writer.last().is_empty());
}

#[tokio::test]
async fn no_fetched_issues_renders_a_title_only_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.docx");
    let vars = env(&[
        ("JIRA_PROJECTS", "A,B"),
        ("REPORT_PATH", path.to_str().unwrap()),
    ]);
    let source = shared(FakeSource::default().failing("A", 500).with("B", Vec::new()));

    let summary = executor(
        &vars,
        source,
        shared(EchoSummarizer::default()),
        shared(DocxWriter::new()),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(summary.final_state, RunState::Done);
    assert_eq!(summary.failed_projects(), 1);
    let texts: Vec<String> = read_paragraphs(&std::fs::read(&path).unwrap())
        .unwrap()
        .into_iter()
        .map(|p| p.text)
        .collect();
    assert_eq!(texts, vec!["Projects Monthly Status Report"]);
}

#[tokio::test]
async fn missing_token_fails_before_any_call() {
    let mut vars = env(&[("JIRA_PROJECTS", "Apollo")]);
    vars.remove("JIRA_TOKEN");
    let source = shared(FakeSource::default().with("Apollo", vec![issue("A-1", "Apollo", "S1", "")]));
    let summarizer = shared(EchoSummarizer::default());
    let writer = shared(MemoryWriter::default());

    let result = PipelineExecutor::from_lookup(
        |k| vars.get(k).cloned(),
        source.clone(),
        summarizer.clone(),
        writer.clone(),
    );

    assert_eq!(
        result.err(),
        Some(ConfigError::Missing {
            key: "JIRA_TOKEN".into()
        })
    );
    assert_eq!(source.call_count(), 0);
    assert!(summarizer.calls.lock().unwrap().is_empty());
    assert_eq!(writer.count(), 0);
}

#[tokio::test]
async fn no_projects_yields_title_only_report() {
    let vars = env(&[]);
    let source = shared(FakeSource::default());
    let writer = shared(MemoryWriter::default());

    let summary = executor(&vars, source.clone(), shared(EchoSummarizer::default()), writer.clone())
        .run()
        .await
        .unwrap();

    assert!(summary.projects.is_empty());
    assert_eq!(source.call_count(), 0);
    let report = writer.last();
    assert!(report.sections().is_empty());
    assert_eq!(report.title, "Projects Monthly Status Report");
}

#[tokio::test]
async fn serialize_failure_is_returned() {
    let vars = env(&[("JIRA_PROJECTS", "Apollo")]);
    let source = shared(FakeSource::default().with("Apollo", vec![issue("A-1", "Apollo", "S1", "")]));

    let err = executor(&vars, source, shared(EchoSummarizer::default()), Arc::new(BrokenWriter))
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, SerializeError::Io { .. }));
}

// ---------------------------------------------------------------------------
// Retry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn retryable_errors_are_retried_up_to_the_limit() {
    let vars = env(&[("JIRA_PROJECTS", "Apollo"), ("SUMMARIZE_RETRIES", "2")]);
    let source = shared(FakeSource::default().with("Apollo", vec![issue("A-1", "Apollo", "S1", "")]));
    let summarizer = shared(ScriptedSummarizer::new(vec![
        Err(unreachable()),
        Err(SummarizeError::Status {
            status: 503,
            body: "busy".into(),
        }),
        Ok("done".into()),
    ]));
    let writer = shared(MemoryWriter::default());

    let summary = executor(&vars, source, summarizer.clone(), writer.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(summarizer.call_count(), 3);
    assert_eq!(summary.total_failed(), 0);
    assert_eq!(writer.last().sections()[0].entries[0].summary.summary_text, "done");
}

#[tokio::test]
async fn exhausted_retries_fall_back_to_placeholder() {
    let vars = env(&[("JIRA_PROJECTS", "Apollo"), ("SUMMARIZE_RETRIES", "1")]);
    let source = shared(FakeSource::default().with("Apollo", vec![issue("A-1", "Apollo", "S1", "")]));
    let summarizer = shared(ScriptedSummarizer::new(vec![
        Err(unreachable()),
        Err(unreachable()),
        Ok("never reached".into()),
    ]));

    let summary = executor(&vars, source, summarizer.clone(), shared(MemoryWriter::default()))
        .run()
        .await
        .unwrap();

    assert_eq!(summarizer.call_count(), 2);
    assert_eq!(summary.total_failed(), 1);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let vars = env(&[("JIRA_PROJECTS", "Apollo"), ("SUMMARIZE_RETRIES", "3")]);
    let source = shared(FakeSource::default().with("Apollo", vec![issue("A-1", "Apollo", "S1", "")]));
    let summarizer = shared(ScriptedSummarizer::new(vec![Err(SummarizeError::Status {
        status: 404,
        body: "model not found".into(),
    })]));

    let summary = executor(&vars, source, summarizer.clone(), shared(MemoryWriter::default()))
        .run()
        .await
        .unwrap();

    assert_eq!(summarizer.call_count(), 1);
    assert_eq!(summary.total_failed(), 1);
}

#[tokio::test]
async fn without_retries_a_single_attempt_is_made() {
    let vars = env(&[("JIRA_PROJECTS", "Apollo")]);
    let source = shared(FakeSource::default().with("Apollo", vec![issue("A-1", "Apollo", "S1", "")]));
    let summarizer = shared(ScriptedSummarizer::new(vec![Err(unreachable())]));

    executor(&vars, source, summarizer.clone(), shared(MemoryWriter::default()))
        .run()
        .await
        .unwrap();

    assert_eq!(summarizer.call_count(), 1);
}

// ---------------------------------------------------------------------------
// Project overview
// ---------------------------------------------------------------------------

#[tokio::test]
async fn project_overview_is_added_when_enabled() {
    let vars = env(&[
        ("JIRA_PROJECTS", "Apollo,Quiet"),
        ("REPORT_PROJECT_OVERVIEW", "true"),
    ]);
    let source = shared(FakeSource::default().with(
        "Apollo",
        vec![
            issue("A-1", "Apollo", "S1", ""),
            issue("A-2", "Apollo", "S2", ""),
        ],
    ));
    let summarizer = shared(EchoSummarizer::default());
    let writer = shared(MemoryWriter::default());

    executor(&vars, source, summarizer.clone(), writer.clone())
        .run()
        .await
        .unwrap();

    let report = writer.last();
    assert_eq!(
        report.section(&apollo()).unwrap().overview.as_deref(),
        Some("Apollo: 2 issues")
    );
    let quiet = ProjectName::new("Quiet").unwrap();
    assert_eq!(report.section(&quiet).unwrap().overview, None);
    assert_eq!(summarizer.calls.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn project_overview_is_off_by_default() {
    let vars = env(&[("JIRA_PROJECTS", "Apollo")]);
    let source = shared(FakeSource::default().with("Apollo", vec![issue("A-1", "Apollo", "S1", "")]));
    let writer = shared(MemoryWriter::default());

    executor(&vars, source, shared(EchoSummarizer::default()), writer.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(writer.last().section(&apollo()).unwrap().overview, None);
}

// ---------------------------------------------------------------------------
// Deliverables
// ---------------------------------------------------------------------------

fn typed_source() -> Arc<FakeSource> {
    shared(FakeSource::default().with(
        "Apollo",
        vec![
            issue("A-1", "Apollo", "Login page", "").with_classification("Story", "Done"),
            issue("A-2", "Apollo", "Crash on start", "").with_classification("Bug", "Done"),
            issue("A-3", "Apollo", "Export", "")
                .with_classification("Task", "In Progress")
                .with_dates(Some("2025-08-15".into()), None),
        ],
    ))
}

fn deliverable_names(report: &pipeline::Report) -> Vec<String> {
    report
        .section(&apollo())
        .unwrap()
        .deliverables
        .as_ref()
        .unwrap()
        .items
        .iter()
        .map(|d| d.name.clone())
        .collect()
}

#[tokio::test]
async fn deliverables_come_from_the_summarizer_when_it_names_some() {
    let vars = env(&[
        ("JIRA_PROJECTS", "Apollo,Quiet"),
        ("REPORT_DELIVERABLES", "true"),
    ]);
    let summarizer = shared(DeliverableSummarizer::new(Ok(vec![Deliverable::new(
        "Login page shipped",
        None,
        Some("2025-07-20"),
        "Done",
    )])));
    let writer = shared(MemoryWriter::default());

    let summary = executor(&vars, typed_source(), summarizer.clone(), writer.clone())
        .run()
        .await
        .unwrap();

    let report = writer.last();
    assert_eq!(deliverable_names(&report), vec!["Login page shipped"]);
    assert_eq!(
        report.section(&apollo()).unwrap().deliverables.as_ref().unwrap().source,
        DeliverableSource::Summarizer
    );
    assert_eq!(
        summarizer.projects.lock().unwrap().clone(),
        vec![("Apollo".to_string(), 3)],
        "a project without issues is not sent"
    );
    let quiet = ProjectName::new("Quiet").unwrap();
    assert_eq!(report.section(&quiet).unwrap().deliverables, None);
    assert_eq!(summary.total_deliverables(), 1);
    assert_eq!(summary.projects[0].deliverable_source, Some(DeliverableSource::Summarizer));
}

#[tokio::test]
async fn unparseable_reply_falls_back_to_issue_types() {
    let vars = env(&[("JIRA_PROJECTS", "Apollo"), ("REPORT_DELIVERABLES", "true")]);
    let summarizer = shared(DeliverableSummarizer::new(Err(SummarizeError::Decode {
        message: "reply contains no JSON array".into(),
    })));
    let writer = shared(MemoryWriter::default());

    let summary = executor(&vars, typed_source(), summarizer, writer.clone())
        .run()
        .await
        .unwrap();

    let report = writer.last();
    assert_eq!(deliverable_names(&report), vec!["Login page", "Export"]);
    let deliverables = report.section(&apollo()).unwrap().deliverables.clone().unwrap();
    assert_eq!(deliverables.source, DeliverableSource::IssueType);
    assert_eq!(deliverables.items[1].due_date, "2025-08-15");
    assert_eq!(summary.projects[0].deliverables, 2);
    assert_eq!(summary.total_failed(), 0, "issue summaries are unaffected");
}

#[tokio::test]
async fn summarizer_naming_none_falls_back_to_issue_types() {
    let vars = env(&[("JIRA_PROJECTS", "Apollo"), ("REPORT_DELIVERABLES", "true")]);
    let writer = shared(MemoryWriter::default());

    executor(&vars, typed_source(), shared(EchoSummarizer::default()), writer.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(deliverable_names(&writer.last()), vec!["Login page", "Export"]);
}

#[tokio::test]
async fn deliverables_are_off_by_default() {
    let vars = env(&[("JIRA_PROJECTS", "Apollo")]);
    let summarizer = shared(DeliverableSummarizer::new(Ok(Vec::new())));
    let writer = shared(MemoryWriter::default());

    let summary = executor(&vars, typed_source(), summarizer.clone(), writer.clone())
        .run()
        .await
        .unwrap();

    assert!(summarizer.projects.lock().unwrap().is_empty());
    assert_eq!(writer.last().section(&apollo()).unwrap().deliverables, None);
    assert_eq!(summary.projects[0].deliverable_source, None);
}

#[tokio::test]
async fn deliverables_table_reaches_the_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.docx");
    let vars = env(&[
        ("JIRA_PROJECTS", "Apollo"),
        ("REPORT_DELIVERABLES", "true"),
        ("REPORT_PATH", path.to_str().unwrap()),
    ]);

    executor(
        &vars,
        typed_source(),
        shared(EchoSummarizer::default()),
        shared(DocxWriter::new()),
    )
    .run()
    .await
    .unwrap();

    let headings: Vec<String> = read_paragraphs(&std::fs::read(&path).unwrap())
        .unwrap()
        .into_iter()
        .filter(|p| p.style.as_deref().is_some_and(|s| s.starts_with("Heading")))
        .take(3)
        .map(|p| p.text)
        .collect();
    assert_eq!(
        headings,
        vec!["Deliverables Overview", "Apollo Deliverables", "Apollo"]
    );
}

// ---------------------------------------------------------------------------
// Document output
// ---------------------------------------------------------------------------

fn round_trip_source() -> Arc<FakeSource> {
    shared(FakeSource::default().with(
        "Apollo",
        vec![
            issue("A-1", "Apollo", "S1", "D1"),
            issue("A-2", "Apollo", "S2", ""),
        ],
    ))
}

#[tokio::test]
async fn echoed_summaries_reach_the_document_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.docx");
    let vars = env(&[
        ("JIRA_PROJECTS", "Apollo"),
        ("REPORT_PATH", path.to_str().unwrap()),
    ]);

    let summary = executor(
        &vars,
        round_trip_source(),
        shared(EchoSummarizer::default()),
        shared(DocxWriter::new()),
    )
    .run()
    .await
    .unwrap();
    assert_eq!(summary.output.as_deref(), Some(path.as_path()));

    let texts: Vec<String> = read_paragraphs(&std::fs::read(&path).unwrap())
        .unwrap()
        .into_iter()
        .filter(|p| !p.in_table)
        .map(|p| p.text)
        .collect();
    assert_eq!(
        texts,
        vec![
            "Projects Monthly Status Report",
            "Apollo",
            "A-1: S1",
            "S1",
            "D1",
            "A-2: S2",
            "S2",
        ]
    );
}

#[tokio::test]
async fn identical_runs_produce_identical_documents() {
    let dir = tempfile::tempdir().unwrap();
    let mut bodies = Vec::new();

    for name in ["first.docx", "second.docx"] {
        let path = dir.path().join(name);
        let vars = env(&[
            ("JIRA_PROJECTS", "Apollo"),
            ("REPORT_PATH", path.to_str().unwrap()),
        ]);
        executor(
            &vars,
            round_trip_source(),
            shared(EchoSummarizer::default()),
            shared(DocxWriter::new()),
        )
        .run()
        .await
        .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        bodies.push(read_part(&bytes, DOCUMENT_PART).unwrap());
    }

    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn assemble_does_not_write() {
    let vars = env(&[("JIRA_PROJECTS", "Apollo")]);
    let writer = shared(MemoryWriter::default());
    let run_id = RunId::new_random();

    let (report, summary) = executor(
        &vars,
        round_trip_source(),
        shared(EchoSummarizer::default()),
        writer.clone(),
    )
    .assemble(run_id)
    .await;

    assert_eq!(writer.count(), 0);
    assert_eq!(report.issue_count(), 2);
    assert_eq!(summary.run_id, run_id);
    assert_eq!(summary.output, None);
}
