//! `jira-digest check`: configuration and connectivity probes.
//!
//! Output is advisory. Each probe prints one line; the command fails when any
//! probe fails.

use jira::JiraClient;
use llm::OllamaSummarizer;
use pipeline::PipelineConfig;
use tracing::{info, warn};

/// Issues requested by the sample query.
const SAMPLE_SIZE: u32 = 5;

/// Runs every probe in order. Returns `true` when all of them passed.
pub async fn run(config: &PipelineConfig) -> bool {
    println!("[ok]   configuration");
    match serde_json::to_string_pretty(config) {
        Ok(json) => println!("{json}"),
        Err(e) => warn!(error = %e, "Configuration could not be displayed"),
    }

    let mut passed = true;

    match JiraClient::new(&config.tracker) {
        Ok(client) => {
            passed &= probe_identity(&client).await;
            passed &= probe_sample_query(&client, config).await;
        }
        Err(e) => passed &= fail("tracker client", &e),
    }

    match OllamaSummarizer::new(&config.summarizer) {
        Ok(summarizer) => passed &= probe_summarizer(&summarizer, config).await,
        Err(e) => passed &= fail("summarizer client", &e),
    }

    info!(passed, "Connectivity check finished");
    passed
}

async fn probe_identity(client: &JiraClient) -> bool {
    match client.myself().await {
        Ok(me) => {
            let name = me
                .display_name
                .or(me.email_address)
                .unwrap_or_else(|| "unknown user".to_string());
            println!("[ok]   tracker identity: {name}");
            true
        }
        Err(e) => fail("tracker identity", &e),
    }
}

async fn probe_sample_query(client: &JiraClient, config: &PipelineConfig) -> bool {
    let Some(first) = config.projects.first() else {
        println!("[skip] sample query: no projects configured");
        return true;
    };

    let jql = jira::jql::project_query(&first.name, &first.jql_suffix);
    match client.sample_search(&jql, SAMPLE_SIZE).await {
        Ok(page) => {
            let keys: Vec<&str> = page.issues.iter().map(|r| r.key.as_str()).collect();
            let total = page
                .total
                .map(|t| t.to_string())
                .unwrap_or_else(|| "?".to_string());
            println!(
                "[ok]   sample query for {}: {} of {total} issue(s) {}",
                first.name,
                keys.len(),
                keys.join(", ")
            );
            true
        }
        Err(e) => fail("sample query", &e),
    }
}

async fn probe_summarizer(summarizer: &OllamaSummarizer, config: &PipelineConfig) -> bool {
    match summarizer.ping().await {
        Ok(reply) => {
            println!(
                "[ok]   summarizer {} ({:?} API): {}",
                config.summarizer.model,
                summarizer.style(),
                reply.lines().next().unwrap_or_default()
            );
            true
        }
        Err(e) => fail("summarizer", &e),
    }
}

fn fail(probe: &str, error: &dyn std::fmt::Display) -> bool {
    println!("[fail] {probe}: {error}");
    warn!(probe, error = %error, "Probe failed");
    false
}
