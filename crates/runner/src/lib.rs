//! jira-digest run orchestration.
//!
//! This crate provides the [`PipelineExecutor`], which walks the configured
//! projects in order, fetches each project's issues through an
//! [`pipeline::IssueSource`], summarizes every issue through a
//! [`pipeline::Summarizer`], and hands the finished [`pipeline::Report`] to a
//! [`pipeline::ReportWriter`] exactly once.
//!
//! ```text
//! Init → LoadingConfig ─┬─→ { Fetching → Summarizing → Appended } per project → Serializing → Done
//!                       └─→ Failed
//! ```
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The executor sequences calls between the domain
//! model in [`pipeline`] and the infrastructure adapters behind its port
//! traits. It contains no transport or encoding code.
//!
//! ## Failure handling
//!
//! Only configuration errors stop a run before it starts, and only a
//! serialization error fails it at the end. A project whose fetch fails is
//! recorded as such; an issue whose summary fails receives a placeholder. The
//! returned [`RunSummary`] counts both.
//!
//! ## Project-level extras
//!
//! When enabled in [`pipeline::ReportConfig`], each project with issues also
//! gets an overview paragraph and a deliverables list. Deliverables come from
//! [`pipeline::Summarizer::extract_deliverables`]; if that fails or names none,
//! [`pipeline::deliverables::by_issue_type`] picks them instead.

mod executor;
mod spans;
mod summary;

pub use executor::PipelineExecutor;
pub use summary::{ProjectOutcome, RunSummary};
