//! jira-digest CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Wire observability**: configure `tracing-subscriber` with an env
//!    filter, a text or JSON layer, and, when `OTEL_EXPORTER_OTLP_ENDPOINT` is
//!    set, an OpenTelemetry OTLP exporter. Every span and event emitted by the
//!    workspace crates flows through it.
//! 2. **Load configuration**: read the environment once into a
//!    [`pipeline::PipelineConfig`] and apply command-line overrides.
//! 3. **Construct infrastructure**: build the [`jira::JiraClient`],
//!    [`llm::OllamaSummarizer`], and [`document::DocxWriter`] and inject them
//!    into a [`runner::PipelineExecutor`].
//! 4. **Select the command**: run the digest (default) or the `check` probes.
//!
//! ## Exit codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Run completed, possibly with recorded fetch or summary failures |
//! | 1 | Report could not be written, a client could not be built, or a probe failed |
//! | 2 | Configuration invalid |

mod check;
mod telemetry;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use document::DocxWriter;
use jira::JiraClient;
use llm::OllamaSummarizer;
use pipeline::{ConfigError, PipelineConfig, RunState};
use runner::PipelineExecutor;
use tracing::{error, info};

use crate::telemetry::{LogFormat, Telemetry};

const EXIT_CONFIG: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "jira-digest", version)]
#[command(about = "Summarize recent Jira issues per project into a Word report", long_about = None)]
struct Args {
    /// Report path (overrides REPORT_PATH)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Project to include; repeat for several (overrides JIRA_PROJECTS)
    #[arg(short, long = "project", value_name = "NAME", global = true)]
    projects: Vec<String>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate configuration and probe the tracker and the summarizer
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let telemetry = match Telemetry::init(args.log_format) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("jira-digest: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let code = match load_config(&args) {
        Err(e) => {
            error!(state = %RunState::Failed, error = %e, "Configuration invalid");
            eprintln!("jira-digest: configuration error: {e}");
            ExitCode::from(EXIT_CONFIG)
        }
        Ok(config) => match args.command {
            Some(Command::Check) => {
                if check::run(&config).await {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                }
            }
            None => digest(config, args.log_format).await,
        },
    };

    telemetry.shutdown();
    code
}

/// Environment first, then command-line overrides.
fn load_config(args: &Args) -> Result<PipelineConfig, ConfigError> {
    let mut config = PipelineConfig::from_env()?;
    if !args.projects.is_empty() {
        config = config.with_projects(args.projects.iter().cloned());
    }
    if let Some(path) = &args.output {
        config = config.with_report_path(path.clone());
    }
    Ok(config)
}

async fn digest(config: PipelineConfig, format: LogFormat) -> ExitCode {
    let executor = match build_executor(config) {
        Ok(executor) => executor,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Startup failed");
            eprintln!("jira-digest: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        projects = executor.config().projects.len(),
        output = %executor.config().report.path.display(),
        "Starting run"
    );

    match executor.run().await {
        Ok(summary) => {
            match format {
                LogFormat::Text => println!("{summary}"),
                LogFormat::Json => match serde_json::to_string_pretty(&summary) {
                    Ok(json) => println!("{json}"),
                    Err(e) => error!(error = %e, "Run summary could not be encoded"),
                },
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("jira-digest: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_executor(config: PipelineConfig) -> anyhow::Result<PipelineExecutor> {
    let source = JiraClient::new(&config.tracker).context("building the tracker client")?;
    let summarizer =
        OllamaSummarizer::new(&config.summarizer).context("building the summarizer client")?;

    Ok(PipelineExecutor::new(
        config,
        Arc::new(source),
        Arc::new(summarizer),
        Arc::new(DocxWriter::new()),
    ))
}
