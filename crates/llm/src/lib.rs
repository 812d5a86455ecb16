//! jira-digest summarizer adapter.
//!
//! Implements the [`pipeline::Summarizer`] trait for a locally hosted Ollama
//! instance. Both generation styles are supported and selected from the
//! configured endpoint path:
//!
//! | Endpoint | Request body | Generated text |
//! |----------|--------------|----------------|
//! | `/api/generate` | `{model, prompt, stream: false}` | `response` |
//! | `/api/chat` | `{model, messages, stream: false}` | `message.content` |
//!
//! Streaming is always disabled so each call yields one complete response.
//!
//! Besides per-issue summaries the adapter answers two project-level requests:
//! an overview paragraph and a deliverables list, the latter parsed from a
//! JSON array in the reply ([`deliverables::parse_reply`]).
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, prompt formatting, and response parsing
//! live here. The [`pipeline`] crate sees only [`pipeline::Summarizer`].
//! Retrying is the executor's decision, driven by
//! [`pipeline::SummarizeError::retry_policy`].

pub mod deliverables;
pub mod ollama;
pub mod prompt;
pub mod wire;

pub use ollama::OllamaSummarizer;
pub use wire::ApiStyle;
