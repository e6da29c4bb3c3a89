//! The upstream parse-event contract
//!
//! The schema builder is driven by a flat, single-pass stream of these
//! events. Any tokenizer that can produce them can drive the builder; the
//! bundled quick-xml adapter lives in [`crate::reader`].

use crate::error::Position;

/// One XML parse event
///
/// Attribute values are owned snapshots: the builder may hold on to them
/// past the event, so sources that reuse buffers must copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A namespace prefix binding opens (`xmlns:p="uri"`)
    StartPrefixMapping {
        /// Prefix being bound (empty string for the default namespace)
        prefix: String,
        /// Namespace URI
        uri: String,
    },
    /// A namespace prefix binding closes
    EndPrefixMapping {
        /// Prefix going out of scope
        prefix: String,
    },
    /// An element opens
    StartElement {
        /// Namespace URI of the element, if any
        uri: Option<String>,
        /// Local (unprefixed) element name
        local_name: String,
        /// Attribute snapshot as (local name, value) pairs in document order
        attributes: Vec<(String, String)>,
    },
    /// An element closes
    EndElement {
        /// Namespace URI of the element, if any
        uri: Option<String>,
        /// Local (unprefixed) element name
        local_name: String,
        /// Position of the closing tag, used for error reporting
        position: Position,
    },
}

impl Event {
    /// Convenience constructor for a start-element event
    pub fn start(local_name: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        Event::StartElement {
            uri: None,
            local_name: local_name.into(),
            attributes,
        }
    }

    /// Convenience constructor for an end-element event
    pub fn end(local_name: impl Into<String>, position: Position) -> Self {
        Event::EndElement {
            uri: None,
            local_name: local_name.into(),
            position,
        }
    }
}
