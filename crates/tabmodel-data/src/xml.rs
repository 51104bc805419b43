//! XML data input
//!
//! Rows are elements below the document root, their attributes the
//! columns: `<rows><row NAME="Ann" AGE="31"/></rows>`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader as XmlReader;
use std::path::PathBuf;

use tabmodel_core::{encode_field_name, Row, DEFAULT_SPECIAL_CHARS};

use crate::input::{DataInput, InputError, InputSource};

#[derive(Debug, Clone)]
pub struct XmlInput {
    source: InputSource,
    row_element: Option<String>,
    special_chars: Vec<char>,
}

impl XmlInput {
    pub fn from_xml(text: impl Into<String>) -> Self {
        Self::new(InputSource::Text(text.into()))
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(InputSource::File(path.into()))
    }

    fn new(source: InputSource) -> Self {
        Self {
            source,
            row_element: None,
            special_chars: DEFAULT_SPECIAL_CHARS.to_vec(),
        }
    }

    /// Only elements with this name become rows
    pub fn with_row_element(mut self, name: impl Into<String>) -> Self {
        self.row_element = Some(name.into());
        self
    }

    pub fn with_special_chars(mut self, chars: Vec<char>) -> Self {
        self.special_chars = chars;
        self
    }

    fn is_row(&self, element: &BytesStart<'_>, depth: usize) -> bool {
        match &self.row_element {
            Some(name) => element.name().as_ref() == name.as_bytes(),
            None => depth > 0 && element.attributes().next().is_some(),
        }
    }

    fn to_row(&self, element: &BytesStart<'_>) -> Result<Row, InputError> {
        let mut row = Row::new();
        for attr in element.attributes() {
            let attr = attr.map_err(|e| InputError::Parse(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr.unescape_value().map_err(|e| InputError::Parse(e.to_string()))?;
            row.insert(encode_field_name(&key, &self.special_chars), value.to_string());
        }
        Ok(row)
    }
}

impl DataInput for XmlInput {
    fn name(&self) -> &str {
        "XmlInput"
    }

    fn special_chars(&self) -> &[char] {
        &self.special_chars
    }

    fn rows(&self) -> Result<Vec<Row>, InputError> {
        let text = self.source.read()?;
        let mut reader = XmlReader::from_str(&text);
        reader.config_mut().trim_text(true);

        let mut buf: Vec<u8> = Vec::new();
        let mut rows = Vec::new();
        let mut depth = 0usize;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    if self.is_row(&e, depth) {
                        rows.push(self.to_row(&e)?);
                    }
                    depth += 1;
                }
                Ok(Event::Empty(e)) => {
                    if self.is_row(&e, depth) {
                        rows.push(self.to_row(&e)?);
                    }
                }
                Ok(Event::End(_)) => depth = depth.saturating_sub(1),
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(InputError::Parse(format!(
                        "XML error at position {}: {e}",
                        reader.error_position()
                    )))
                }
                _ => {}
            }
            buf.clear();
        }

        tracing::debug!(rows = rows.len(), "read XML input");
        Ok(rows)
    }
}
