//! Thin event-writer over `quick_xml` used by every package part.

use std::fmt::Display;

use pipeline::SerializeError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

pub(crate) struct XmlPart {
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    /// Starts a standalone UTF-8 part.
    pub fn new() -> Result<Self, SerializeError> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(encode_error)?;
        Ok(Self { writer })
    }

    pub fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), SerializeError> {
        let mut start = BytesStart::new(name);
        for attr in attrs {
            start.push_attribute(*attr);
        }
        self.writer
            .write_event(Event::Start(start))
            .map_err(encode_error)
    }

    pub fn close(&mut self, name: &str) -> Result<(), SerializeError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(encode_error)
    }

    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), SerializeError> {
        let mut start = BytesStart::new(name);
        for attr in attrs {
            start.push_attribute(*attr);
        }
        self.writer
            .write_event(Event::Empty(start))
            .map_err(encode_error)
    }

    /// Writes escaped character data.
    pub fn text(&mut self, text: &str) -> Result<(), SerializeError> {
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(encode_error)
    }

    /// `<name>text</name>`
    pub fn element(&mut self, name: &str, text: &str) -> Result<(), SerializeError> {
        self.open(name, &[])?;
        self.text(text)?;
        self.close(name)
    }

    pub fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

pub(crate) fn encode_error<E: Display>(e: E) -> SerializeError {
    SerializeError::Encode {
        message: e.to_string(),
    }
}

/// Removes characters XML 1.0 cannot carry: C0 controls other than tab and
/// line breaks, and the noncharacters U+FFFE and U+FFFF. C1 controls go too.
pub(crate) fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|c| match c {
            '\t' | '\n' | '\r' => true,
            '\u{FFFE}' | '\u{FFFF}' => false,
            c => !c.is_control(),
        })
        .collect()
}
