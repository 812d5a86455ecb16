//! jira-digest issue tracker adapter.
//!
//! Implements the [`pipeline::IssueSource`] trait over the tracker's REST search
//! endpoint (`GET /rest/api/3/search`), and exposes the identity and sample-query
//! probes used by the `check` command.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. HTTP transport,
//! query construction, response decoding, and the normalization of optional
//! fields (descriptions in either plain-text or document-tree form, missing
//! status or type) are handled here; the [`pipeline`] crate only ever sees
//! normalized [`pipeline::Issue`] values.
//!
//! ## Limits
//!
//! A single page of at most `maxResults` issues is requested per project. Issues
//! beyond that cap are not fetched.

pub mod adf;
pub mod client;
pub mod error;
pub mod jql;
pub mod types;

pub use client::JiraClient;
pub use error::{Error, Result};
pub use types::{IssueFields, IssueRecord, Myself, NamedField, SearchResponse};
