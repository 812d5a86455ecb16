//! Ollama generation client.

use async_trait::async_trait;
use pipeline::{
    truncate_body, Deliverable, Issue, ProjectName, SummarizeError, Summarizer, SummarizerConfig,
};
use tracing::debug;

use crate::{deliverables, prompt};
use crate::wire::{ApiStyle, ChatMessage, ChatRequest, GenerateRequest, GenerationResponse};

/// Prompt used by [`OllamaSummarizer::ping`].
const PING_PROMPT: &str = "Reply with the single word: ready";

/// Summarizer backed by a local Ollama endpoint.
pub struct OllamaSummarizer {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    style: ApiStyle,
}

impl OllamaSummarizer {
    /// Builds the client. Performs no network I/O.
    pub fn new(config: &SummarizerConfig) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            style: ApiStyle::from_endpoint(&config.endpoint),
        })
    }

    /// The API style chosen from the endpoint path.
    pub fn style(&self) -> ApiStyle {
        self.style
    }

    /// Sends a trivial prompt and returns whatever the model answered.
    pub async fn ping(&self) -> Result<String, SummarizeError> {
        self.generate(PING_PROMPT).await
    }

    /// Sends `prompt` and returns the generated text; empty when the response
    /// carries none.
    pub async fn generate(&self, prompt: &str) -> Result<String, SummarizeError> {
        let request = self.http.post(&self.endpoint);
        let request = match self.style {
            ApiStyle::Generate => request.json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            }),
            ApiStyle::Chat => request.json(&ChatRequest {
                model: &self.model,
                messages: vec![ChatMessage {
                    role: "user",
                    content: prompt,
                }],
                stream: false,
            }),
        };

        debug!(endpoint = %self.endpoint, model = %self.model, prompt_len = prompt.len(), "Requesting generation");
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(SummarizeError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: GenerationResponse =
            serde_json::from_str(&body).map_err(|e| SummarizeError::Decode {
                message: e.to_string(),
            })?;
        Ok(parsed.into_text())
    }
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        self.generate(&prompt::issue_prompt(text)).await
    }

    async fn summarize_project(
        &self,
        project: &ProjectName,
        issue_lines: &[String],
    ) -> Result<String, SummarizeError> {
        self.generate(&prompt::project_prompt(project, issue_lines))
            .await
    }

    async fn extract_deliverables(
        &self,
        project: &ProjectName,
        issues: &[Issue],
    ) -> Result<Vec<Deliverable>, SummarizeError> {
        let reply = self
            .generate(&prompt::deliverables_prompt(project, issues))
            .await?;
        let found = deliverables::parse_reply(&reply)?;
        debug!(project = %project, count = found.len(), "Deliverables extracted");
        Ok(found)
    }
}

fn transport_error(e: reqwest::Error) -> SummarizeError {
    if e.is_timeout() {
        SummarizeError::Timeout {
            message: e.to_string(),
        }
    } else {
        SummarizeError::Unreachable {
            message: e.to_string(),
        }
    }
}
