//! [`ReportWriter`] implementation.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use pipeline::{Report, ReportWriter, SerializeError};
use tracing::{debug, info, warn};

use crate::{body, package};

/// Writes reports as `.docx` packages.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxWriter;

impl DocxWriter {
    pub fn new() -> Self {
        Self
    }

    /// Encodes `report` as a complete package without touching the
    /// filesystem.
    pub fn render(&self, report: &Report) -> Result<Vec<u8>, SerializeError> {
        let document = body::document(report)?;
        let core = package::core_properties(report)?;
        package::assemble(&document, &core)
    }
}

impl ReportWriter for DocxWriter {
    /// Renders, writes to a sibling temp file, then renames over `path`. An
    /// existing file at `path` is replaced only once the new one is complete.
    fn serialize(&self, report: &Report, path: &Path) -> Result<(), SerializeError> {
        let bytes = self.render(report)?;
        let partial = partial_path(path);
        debug!(path = %partial.display(), bytes = bytes.len(), "Writing report");

        fs::write(&partial, &bytes).map_err(|source| SerializeError::Io {
            path: partial.clone(),
            source,
        })?;

        if let Err(source) = fs::rename(&partial, path) {
            if let Err(e) = fs::remove_file(&partial) {
                warn!(path = %partial.display(), error = %e, "Could not remove partial report");
            }
            return Err(SerializeError::Io {
                path: path.to_path_buf(),
                source,
            });
        }

        info!(
            path = %path.display(),
            projects = report.sections().len(),
            issues = report.issue_count(),
            "Report written"
        );
        Ok(())
    }
}

/// `<path>.partial`, next to the target so the rename stays on one filesystem.
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("report"));
    name.push(".partial");
    path.with_file_name(name)
}
