//! XML text adapter
//!
//! Converts XSD source text into the parse-event contract the builder
//! consumes, using quick-xml as the tokenizer. Prefix-mapping events are
//! synthesized from `xmlns`/`xmlns:p` pseudo-attributes and every closing
//! tag carries its 1-based line/column position.

use std::path::Path;

use quick_xml::events::Event as XmlEvent;
use quick_xml::name::QName as XmlName;
use quick_xml::Reader;

use crate::builder::SchemaBuilder;
use crate::error::{Error, Position, Result};
use crate::events::Event;
use crate::schema::XmlSchema;

/// Parse an XSD document from a string
pub fn parse_str(xml: &str) -> Result<XmlSchema> {
    SchemaBuilder::build(read_events(xml)?)
}

/// Parse an XSD document from a file path
pub fn parse_file(path: impl AsRef<Path>) -> Result<XmlSchema> {
    let content = std::fs::read_to_string(path)?;
    parse_str(&content)
}

/// Tokenize XSD source text into the upstream event contract
pub fn read_events(xml: &str) -> Result<Vec<Event>> {
    let index = LineIndex::new(xml);
    let mut reader = Reader::from_str(xml);
    let mut events = Vec::new();
    // Prefixes declared per open element, for scoped unbinding
    let mut scopes: Vec<Vec<String>> = Vec::new();
    // Active prefix bindings, innermost last
    let mut bindings: Vec<(String, String)> = Vec::new();

    loop {
        let tag_offset = reader.buffer_position();
        match reader.read_event() {
            Err(e) => {
                return Err(Error::Xml(format!(
                    "{} at {}",
                    e,
                    index.position(reader.buffer_position())
                )))
            }
            Ok(XmlEvent::Eof) => break,
            Ok(XmlEvent::Start(start)) => {
                open_element(&start, &mut events, &mut scopes, &mut bindings)?;
            }
            Ok(XmlEvent::Empty(start)) => {
                open_element(&start, &mut events, &mut scopes, &mut bindings)?;
                close_element(
                    start.name(),
                    index.position(tag_offset),
                    &mut events,
                    &mut scopes,
                    &mut bindings,
                )?;
            }
            Ok(XmlEvent::End(end)) => {
                close_element(
                    end.name(),
                    index.position(tag_offset),
                    &mut events,
                    &mut scopes,
                    &mut bindings,
                )?;
            }
            // Character data, comments, PIs and the declaration carry no
            // schema structure
            Ok(_) => {}
        }
    }

    Ok(events)
}

fn open_element(
    start: &quick_xml::events::BytesStart<'_>,
    events: &mut Vec<Event>,
    scopes: &mut Vec<Vec<String>>,
    bindings: &mut Vec<(String, String)>,
) -> Result<()> {
    let mut declared: Vec<String> = Vec::new();
    let mut attributes: Vec<(String, String)> = Vec::new();

    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Xml(e.to_string()))?
            .into_owned();

        if attr.key.as_ref() == b"xmlns" {
            // Default namespace, bound to the empty prefix
            bindings.push((String::new(), value.clone()));
            declared.push(String::new());
            events.push(Event::StartPrefixMapping {
                prefix: String::new(),
                uri: value,
            });
        } else if attr.key.prefix().is_some_and(|p| p.as_ref() == b"xmlns") {
            let prefix = utf8(attr.key.local_name().as_ref())?.to_string();
            bindings.push((prefix.clone(), value.clone()));
            declared.push(prefix.clone());
            events.push(Event::StartPrefixMapping { prefix, uri: value });
        } else {
            let name = utf8(attr.key.local_name().as_ref())?.to_string();
            attributes.push((name, value));
        }
    }

    let local_name = utf8(start.name().local_name().as_ref())?.to_string();
    let uri = element_uri(bindings, start.name())?;
    events.push(Event::StartElement {
        uri,
        local_name,
        attributes,
    });
    scopes.push(declared);
    Ok(())
}

fn close_element(
    name: XmlName<'_>,
    position: Position,
    events: &mut Vec<Event>,
    scopes: &mut Vec<Vec<String>>,
    bindings: &mut Vec<(String, String)>,
) -> Result<()> {
    let local_name = utf8(name.local_name().as_ref())?.to_string();
    let uri = element_uri(bindings, name)?;
    events.push(Event::EndElement {
        uri,
        local_name,
        position,
    });

    if let Some(declared) = scopes.pop() {
        for prefix in declared.into_iter().rev() {
            if let Some(idx) = bindings.iter().rposition(|(p, _)| *p == prefix) {
                bindings.remove(idx);
            }
            events.push(Event::EndPrefixMapping { prefix });
        }
    }
    Ok(())
}

/// Resolve the element's own namespace URI from the active bindings.
/// Unlike reference attributes, unprefixed element names do take the
/// default namespace.
fn element_uri(bindings: &[(String, String)], name: XmlName<'_>) -> Result<Option<String>> {
    let prefix = match name.prefix() {
        Some(p) => utf8(p.as_ref())?.to_string(),
        None => String::new(),
    };
    Ok(bindings
        .iter()
        .rev()
        .find(|(p, _)| *p == prefix)
        .map(|(_, uri)| uri.clone()))
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| Error::Xml(e.to_string()))
}

/// Byte-offset to line/column mapping over the source text
struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(idx + 1);
            }
        }
        Self { line_starts }
    }

    fn position(&self, offset: usize) -> Position {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let column = offset - self.line_starts[line - 1] + 1;
        Position::new(line as u64, column as u64)
    }
}
