//! Minimal `.docx` reader: paragraph text and style, in document order.
//!
//! Used by tests to inspect written reports. Not a general
//! WordprocessingML parser: runs are concatenated and anything other than
//! `w:t` text is ignored.

use std::io::{Cursor, Read};

use pipeline::SerializeError;
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::xml::encode_error;
use crate::DOCUMENT_PART;

/// Upper bound on a single part read back from a package.
const MAX_PART_BYTES: u64 = 64 * 1024 * 1024;

/// One `w:p` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// `w:pStyle` value, if any.
    pub style: Option<String>,
    pub text: String,
    /// Whether the paragraph sits inside a table cell.
    pub in_table: bool,
}

/// Reads one part of a package as raw bytes.
pub fn read_part(package: &[u8], name: &str) -> Result<Vec<u8>, SerializeError> {
    let mut archive = ZipArchive::new(Cursor::new(package)).map_err(encode_error)?;
    let entry = archive.by_name(name).map_err(encode_error)?;
    let mut out = Vec::new();
    entry
        .take(MAX_PART_BYTES)
        .read_to_end(&mut out)
        .map_err(encode_error)?;
    Ok(out)
}

/// Lists every paragraph of the document body.
pub fn read_paragraphs(package: &[u8]) -> Result<Vec<Paragraph>, SerializeError> {
    let xml = read_part(package, DOCUMENT_PART)?;
    let mut reader = Reader::from_reader(xml.as_slice());

    let mut paragraphs = Vec::new();
    let mut current: Option<Paragraph> = None;
    let mut table_depth = 0usize;
    let mut in_text = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(encode_error)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"tbl" => table_depth += 1,
                b"p" => {
                    current = Some(Paragraph {
                        style: None,
                        text: String::new(),
                        in_table: table_depth > 0,
                    })
                }
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"pStyle" => {
                    if let (Some(p), Some(attr)) = (
                        current.as_mut(),
                        e.try_get_attribute("w:val").map_err(encode_error)?,
                    ) {
                        let value = attr.unescape_value().map_err(encode_error)?;
                        p.style = Some(value.into_owned());
                    }
                }
                b"p" => paragraphs.push(Paragraph {
                    style: None,
                    text: String::new(),
                    in_table: table_depth > 0,
                }),
                _ => {}
            },
            Event::Text(t) if in_text => {
                if let Some(p) = current.as_mut() {
                    p.text.push_str(&t.unescape().map_err(encode_error)?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                b"t" => in_text = false,
                b"p" => paragraphs.extend(current.take()),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}
