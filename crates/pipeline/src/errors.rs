//! Error and retry-policy types for the jira-digest pipeline domain.
//!
//! Each pipeline component has its own error type so the orchestrator can
//! apply a different recovery policy to each:
//!
//! | Error | Scope | Recovery |
//! |-------|-------|----------|
//! | [`ConfigError`] | run | fatal, before any network call |
//! | [`FetchError`] | project | recorded, run continues |
//! | [`SummarizeError`] | issue | recorded, placeholder summary used |
//! | [`SerializeError`] | run | fatal, non-zero exit |
//!
//! Infrastructure crates convert their transport errors into these types at the
//! adapter boundary; this crate never sees `reqwest` or `zip` errors.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ProjectName;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// Returned by component error types to let the orchestrator decide whether to
/// re-invoke an operation.
///
/// - `Retryable` errors: timeouts, refused connections, rate limiting, 5xx.
/// - `NonRetryable` errors: client errors, undecodable responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt. `None` means apply the
        /// caller's own delay.
        after: Option<Duration>,
    },
    /// The operation must not be retried.
    NonRetryable,
}

impl RetryPolicy {
    /// Returns `true` for [`RetryPolicy::Retryable`].
    pub fn is_retryable(&self) -> bool {
        matches!(self, RetryPolicy::Retryable { .. })
    }

    fn for_status(status: u16) -> Self {
        if status == 429 || (500..600).contains(&status) {
            RetryPolicy::Retryable { after: None }
        } else {
            RetryPolicy::NonRetryable
        }
    }
}

/// Longest response body carried into an error message, in characters.
pub const MAX_ERROR_BODY: usize = 1024;

/// Trims an HTTP response body and cuts it to [`MAX_ERROR_BODY`] characters
/// so it can be embedded in an error.
pub fn truncate_body(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// The run configuration is missing or invalid.
///
/// Produced at load time; the pipeline never starts with an invalid config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required key is absent or empty.
    #[error("{key} must be set")]
    Missing {
        /// Configuration key.
        key: String,
    },

    /// A required key still holds the value from the configuration template.
    #[error("{key} still contains a template placeholder value")]
    Placeholder {
        /// Configuration key.
        key: String,
    },

    /// A key is present but its value cannot be used.
    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        /// Configuration key.
        key: String,
        /// The offending value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Issue source
// ---------------------------------------------------------------------------

/// Fetching the issues of one project failed.
///
/// Always names the project so the failure can be attributed in logs and in
/// the run summary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced an HTTP response (DNS, refused, timeout).
    #[error("fetching issues for '{project}' failed: {message}")]
    Transport {
        project: ProjectName,
        message: String,
        /// `true` when the request hit its timeout.
        timed_out: bool,
    },

    /// The tracker answered with a non-success status.
    #[error("tracker returned HTTP {status} for '{project}': {body}")]
    Status {
        project: ProjectName,
        status: u16,
        /// Response body, as returned by the tracker.
        body: String,
    },

    /// The response body was not the expected JSON.
    #[error("tracker response for '{project}' could not be decoded: {message}")]
    Decode { project: ProjectName, message: String },
}

impl FetchError {
    /// The project whose fetch failed.
    pub fn project(&self) -> &ProjectName {
        match self {
            FetchError::Transport { project, .. }
            | FetchError::Status { project, .. }
            | FetchError::Decode { project, .. } => project,
        }
    }

    /// Retry classification for this failure.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            FetchError::Transport { .. } => RetryPolicy::Retryable { after: None },
            FetchError::Status { status, .. } => RetryPolicy::for_status(*status),
            FetchError::Decode { .. } => RetryPolicy::NonRetryable,
        }
    }
}

// ---------------------------------------------------------------------------
// Summarizer
// ---------------------------------------------------------------------------

/// Generating a summary failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummarizeError {
    /// The endpoint could not be reached (refused, DNS, reset).
    #[error("summarizer unreachable: {message}")]
    Unreachable { message: String },

    /// The request hit its timeout before a response arrived.
    #[error("summarizer timed out: {message}")]
    Timeout { message: String },

    /// The generation endpoint answered with a non-success status.
    #[error("summarizer returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not JSON.
    #[error("summarizer response could not be decoded: {message}")]
    Decode { message: String },
}

impl SummarizeError {
    /// Retry classification for this failure.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            SummarizeError::Unreachable { .. } | SummarizeError::Timeout { .. } => {
                RetryPolicy::Retryable { after: None }
            }
            SummarizeError::Status { status, .. } => RetryPolicy::for_status(*status),
            SummarizeError::Decode { .. } => RetryPolicy::NonRetryable,
        }
    }
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

/// Writing the report failed. Always fatal for the run.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// The document could not be encoded.
    #[error("report could not be encoded: {message}")]
    Encode { message: String },

    /// The encoded document could not be written to disk.
    #[error("report could not be written to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
