//! jira-digest report serializer.
//!
//! Implements the [`pipeline::ReportWriter`] trait by rendering a
//! [`pipeline::Report`] as a WordprocessingML (`.docx`) package:
//!
//! ```text
//! Title
//! ├─ Heading 1: "Deliverables Overview" (when any project has deliverables)
//! │   └─ Heading 2: "<project> Deliverables" + table, per project
//! ├─ Heading 1: project (only projects with fetched issues)
//! │   ├─ issue overview table (key, type, status, title)
//! │   ├─ Heading 2: "<key>: <title>"
//! │   │   └─ summary paragraph(s)
//! │   └─ Heading 2: "Project Summary" (optional)
//! └─ ...
//! ```
//!
//! A report without issues renders as the title alone.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Package layout, XML encoding, and file replacement live
//! here. The [`pipeline`] crate sees only [`pipeline::ReportWriter`].
//!
//! ## Determinism
//!
//! The generation timestamp is written only to `docProps/core.xml`. All other
//! parts, and every zip entry's metadata, depend solely on the report content,
//! so two runs over identical input differ in that one part.

mod body;
mod package;
pub mod read;
mod writer;
mod xml;

pub use read::{read_paragraphs, read_part, Paragraph};
pub use writer::DocxWriter;

/// Zip entry holding the document body.
pub const DOCUMENT_PART: &str = "word/document.xml";
/// Zip entry holding the package core properties (title, timestamps).
pub const CORE_PART: &str = "docProps/core.xml";
