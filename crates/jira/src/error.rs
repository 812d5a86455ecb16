//! Error types for the tracker probes.
//!
//! The search path used by the pipeline reports [`pipeline::FetchError`]
//! instead; these errors only surface from client construction and from the
//! connectivity probes.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP client could not be built: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tracker API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, Error>;
