//! `word/document.xml`: title, deliverables overview, one block per project
//! with fetched issues, issue table, summaries.
//!
//! Projects without issues (fetch failed or nothing matched) get no block, so
//! a report without issues is its title alone. Those projects are reported in
//! the run summary instead.

use pipeline::{Deliverable, IssueEntry, ProjectSection, Report, SerializeError};

use crate::xml::{xml_safe, XmlPart};

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const STYLE_TITLE: &str = "Title";
const STYLE_HEADING1: &str = "Heading1";
const STYLE_HEADING2: &str = "Heading2";

const TABLE_HEADER: [&str; 4] = ["Issue Key", "Type", "Status", "Title"];
/// Column widths in twentieths of a point; the page body is 9360 wide.
const TABLE_WIDTHS: [&str; 4] = ["1400", "1400", "1600", "4960"];

const DELIVERABLES_HEADING: &str = "Deliverables Overview";
const DELIVERABLE_HEADER: [&str; 5] = [
    "Subproject",
    "Deliverable Name",
    "Due Date",
    "Date Updated",
    "Status",
];
const DELIVERABLE_WIDTHS: [&str; 5] = ["1500", "3660", "1400", "1400", "1400"];

/// Heading placed above a project's overview.
const OVERVIEW_HEADING: &str = "Project Summary";

/// Renders the body part.
pub(crate) fn document(report: &Report) -> Result<Vec<u8>, SerializeError> {
    let mut xml = XmlPart::new()?;
    xml.open("w:document", &[("xmlns:w", W_NS)])?;
    xml.open("w:body", &[])?;

    paragraph(&mut xml, Some(STYLE_TITLE), &report.title, false)?;
    if report.deliverable_count() > 0 {
        deliverables_overview(&mut xml, report.sections())?;
    }
    for section in report.sections().iter().filter(|s| !s.entries.is_empty()) {
        project_block(&mut xml, section)?;
    }

    section_properties(&mut xml)?;
    xml.close("w:body")?;
    xml.close("w:document")?;
    Ok(xml.finish())
}

fn project_block(xml: &mut XmlPart, section: &ProjectSection) -> Result<(), SerializeError> {
    paragraph(xml, Some(STYLE_HEADING1), section.project.as_str(), false)?;

    issue_table(xml, &section.entries)?;
    for entry in &section.entries {
        issue_block(xml, entry)?;
    }

    if let Some(overview) = &section.overview {
        paragraph(xml, Some(STYLE_HEADING2), OVERVIEW_HEADING, false)?;
        multiline(xml, overview)?;
    }
    Ok(())
}

/// One table per project that has deliverables, under a shared heading.
fn deliverables_overview(
    xml: &mut XmlPart,
    sections: &[ProjectSection],
) -> Result<(), SerializeError> {
    paragraph(xml, Some(STYLE_HEADING1), DELIVERABLES_HEADING, false)?;
    for section in sections {
        let Some(deliverables) = section.deliverables.as_ref().filter(|d| !d.items.is_empty())
        else {
            continue;
        };
        let heading = format!("{} Deliverables", section.project);
        paragraph(xml, Some(STYLE_HEADING2), &heading, false)?;
        deliverable_table(xml, section.project.as_str(), &deliverables.items)?;
    }
    Ok(())
}

fn deliverable_table(
    xml: &mut XmlPart,
    project: &str,
    items: &[Deliverable],
) -> Result<(), SerializeError> {
    table_start(xml, &DELIVERABLE_WIDTHS)?;
    table_row(xml, &DELIVERABLE_HEADER, &DELIVERABLE_WIDTHS, true)?;
    for item in items {
        table_row(
            xml,
            &[
                project,
                item.name.as_str(),
                item.due_date.as_str(),
                item.updated.as_str(),
                item.status.as_str(),
            ],
            &DELIVERABLE_WIDTHS,
            false,
        )?;
    }
    xml.close("w:tbl")
}

fn issue_block(xml: &mut XmlPart, entry: &IssueEntry) -> Result<(), SerializeError> {
    let heading = format!("{}: {}", entry.issue.key, entry.issue.summary);
    paragraph(xml, Some(STYLE_HEADING2), &heading, false)?;
    multiline(xml, &entry.summary.summary_text)
}

/// One paragraph per non-blank line. Blank text still yields one empty
/// paragraph so every issue has a body.
fn multiline(xml: &mut XmlPart, text: &str) -> Result<(), SerializeError> {
    let mut written = false;
    for line in text.lines().map(str::trim_end).filter(|l| !l.trim().is_empty()) {
        paragraph(xml, None, line, false)?;
        written = true;
    }
    if !written {
        paragraph(xml, None, "", false)?;
    }
    Ok(())
}

fn issue_table(xml: &mut XmlPart, entries: &[IssueEntry]) -> Result<(), SerializeError> {
    table_start(xml, &TABLE_WIDTHS)?;
    table_row(xml, &TABLE_HEADER, &TABLE_WIDTHS, true)?;
    for entry in entries {
        let issue = &entry.issue;
        table_row(
            xml,
            &[
                issue.key.as_str(),
                issue.issue_type.as_str(),
                issue.status.as_str(),
                issue.summary.as_str(),
            ],
            &TABLE_WIDTHS,
            false,
        )?;
    }
    xml.close("w:tbl")
}

/// Opens a full-width grid table; the caller closes `w:tbl`.
fn table_start(xml: &mut XmlPart, widths: &[&str]) -> Result<(), SerializeError> {
    xml.open("w:tbl", &[])?;
    xml.open("w:tblPr", &[])?;
    xml.empty("w:tblStyle", &[("w:val", "TableGrid")])?;
    xml.empty("w:tblW", &[("w:w", "5000"), ("w:type", "pct")])?;
    xml.close("w:tblPr")?;

    xml.open("w:tblGrid", &[])?;
    for &width in widths {
        xml.empty("w:gridCol", &[("w:w", width)])?;
    }
    xml.close("w:tblGrid")
}

/// A header row is bold and repeats on every page.
fn table_row(
    xml: &mut XmlPart,
    cells: &[&str],
    widths: &[&str],
    header: bool,
) -> Result<(), SerializeError> {
    xml.open("w:tr", &[])?;
    if header {
        xml.open("w:trPr", &[])?;
        xml.empty("w:tblHeader", &[])?;
        xml.close("w:trPr")?;
    }
    for (&cell, &width) in cells.iter().zip(widths) {
        xml.open("w:tc", &[])?;
        xml.open("w:tcPr", &[])?;
        xml.empty("w:tcW", &[("w:w", width), ("w:type", "dxa")])?;
        xml.close("w:tcPr")?;
        paragraph(xml, None, cell, header)?;
        xml.close("w:tc")?;
    }
    xml.close("w:tr")
}

fn paragraph(
    xml: &mut XmlPart,
    style: Option<&str>,
    text: &str,
    bold: bool,
) -> Result<(), SerializeError> {
    xml.open("w:p", &[])?;
    if let Some(style) = style {
        xml.open("w:pPr", &[])?;
        xml.empty("w:pStyle", &[("w:val", style)])?;
        xml.close("w:pPr")?;
    }
    let text = xml_safe(text);
    if !text.is_empty() {
        xml.open("w:r", &[])?;
        if bold {
            xml.open("w:rPr", &[])?;
            xml.empty("w:b", &[])?;
            xml.close("w:rPr")?;
        }
        xml.open("w:t", &[("xml:space", "preserve")])?;
        xml.text(&text)?;
        xml.close("w:t")?;
        xml.close("w:r")?;
    }
    xml.close("w:p")
}

/// US Letter, one-inch margins.
fn section_properties(xml: &mut XmlPart) -> Result<(), SerializeError> {
    xml.open("w:sectPr", &[])?;
    xml.empty("w:pgSz", &[("w:w", "12240"), ("w:h", "15840")])?;
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", "1440"),
            ("w:right", "1440"),
            ("w:bottom", "1440"),
            ("w:left", "1440"),
            ("w:header", "720"),
            ("w:footer", "720"),
            ("w:gutter", "0"),
        ],
    )?;
    xml.close("w:sectPr")
}
