//! Core orchestration domain for jira-digest.
//!
//! This crate contains every domain concept, newtype identifier, shared value
//! type, configuration value, and error type used throughout the pipeline.
//! Infrastructure crates implement the port traits defined here; they never add
//! domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`IssueKey`, `ProjectName`, `RunId`) |
//! | [`types`] | Shared value types (`Issue`, `SummaryResult`, `Timestamp`, etc.) |
//! | [`errors`] | Per-component error types and the retry policy |
//! | [`config`] | Environment-backed run configuration |
//! | [`report`] | In-memory report model |
//! | [`deliverables`] | Deliverable rows and the issue-type rule |
//! | [`ports`] | Traits implemented by infrastructure crates |

pub mod config;
pub mod deliverables;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod report;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use deliverables::{Deliverable, DeliverableSource, Deliverables};
pub use config::{PipelineConfig, ReportConfig, Secret, SummarizerConfig, TrackerConfig};
pub use errors::{
    truncate_body, ConfigError, FetchError, RetryPolicy, SerializeError, SummarizeError,
    MAX_ERROR_BODY,
};
pub use identifiers::{IssueKey, ProjectName, RunId};
pub use ports::{IssueSource, ReportWriter, Summarizer};
pub use report::{IssueEntry, ProjectSection, Report, ReportError};
pub use types::{
    placeholder_summary, Issue, ProjectQuery, RunState, SummaryResult, SummaryStatus, Timestamp,
    UNKNOWN_FIELD,
};
