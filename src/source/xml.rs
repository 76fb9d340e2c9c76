//! XML reading utilities for the SpreadsheetML parts of an xlsx archive:
//! a configured reader wrapper plus helper traits for attribute access and
//! text accumulation.

use crate::error::ContourGridError;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::BufRead;
use thiserror::Error;

/// Errors specific to XML content handling.
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("cannot resolve XML entity '{0}'")]
    UnknownEntity(String),
}

/// Streaming XML reader configured for worksheet parsing: empty elements are
/// expanded so `<c r="A1"/>` produces matching start/end events.
pub(crate) struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
}

impl<R: BufRead> XmlReader<R> {
    pub(crate) fn new(buf_reader: R) -> XmlReader<R> {
        let mut reader = Reader::from_reader(buf_reader);
        let config = reader.config_mut();
        config.check_comments = false;
        config.check_end_names = false;
        config.expand_empty_elements = true;
        config.trim_text(false);
        XmlReader {
            reader,
            buffer: Vec::with_capacity(1024),
        }
    }

    /// Next event, or None at end of input.
    pub(crate) fn next(&'_ mut self) -> Result<Option<Event<'_>>, ContourGridError> {
        self.buffer.clear();
        match self.reader.read_event_into(&mut self.buffer) {
            Ok(Event::Eof) => Ok(None),
            Ok(event) => Ok(Some(event)),
            Err(error) => Err(ContourGridError::Xml(error)),
        }
    }
}

/// Attribute access on start tags without spelling out the quick-xml types.
pub(crate) trait XmlNodeHelper<'a> {
    /// Unescaped value of a named attribute, if present.
    fn attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, ContourGridError>;
}

impl<'a> XmlNodeHelper<'a> for BytesStart<'a> {
    fn attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, ContourGridError> {
        self.try_get_attribute(name)?
            .map(|attribute: Attribute<'a>| Ok(attribute.unescape_value()?))
            .transpose()
    }
}

/// Appends the content of an entity or character reference event.
/// Numeric references are decoded, named entities resolved.
pub(crate) fn push_entity(text: &mut String, bytes: &BytesRef) -> Result<(), ContourGridError> {
    let raw = bytes.xml_content()?;
    if let Some(number) = raw.strip_prefix('#') {
        let code = if let Some(hex) = number.strip_prefix('x') {
            u32::from_str_radix(hex, 16)?
        } else {
            number.parse::<u32>()?
        };
        if let Some(character) = std::char::from_u32(code) {
            text.push(character);
        }
    } else if let Some(entity) = resolve_xml_entity(&raw) {
        text.push_str(entity);
    } else {
        Err(XmlError::UnknownEntity(raw.to_string()))?;
    }
    Ok(())
}

/// Drives an [`XmlReader`] to end of input, dispatching each event against
/// the given match arms; unmatched events are skipped.
#[macro_export]
macro_rules! for_each_xml_event {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(event) = $reader.next()? {
            match event {
                Event::Eof => break,
                $($arms)*
                _ => (),
            }
        }
    };
}
