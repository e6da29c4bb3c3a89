//! # xsd-frontend
//!
//! An event-driven XML Schema (XSD) front end: it consumes a flat stream
//! of XML parse events and compiles it into a fully-resolved, strongly
//! typed schema model (elements, types, attributes, attribute groups and
//! model groups, with deprecated/final/nullability metadata).
//!
//! This is a compiler front end, not a validator: only the XSD subset
//! that real-world schemas reach in practice is supported, and anything
//! outside it (abstract elements/types, mixed content, substitution
//! groups, element defaults) is rejected as an error rather than
//! approximated. A schema either compiles completely or the parse aborts
//! with a single positioned error.
//!
//! ## Example
//!
//! ```rust,ignore
//! use xsd_frontend::reader;
//!
//! let schema = reader::parse_file("path/to/schema.xsd")?;
//! for (name, element) in schema.elements() {
//!     println!("top-level element: {}", name);
//! }
//! ```
//!
//! Any tokenizer that can produce [`events::Event`] values can drive
//! [`builder::SchemaBuilder`] directly; [`reader`] is the bundled
//! quick-xml adapter.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod names;

// Utilities
pub mod events;
pub mod namespaces;

// The tag and schema models
pub mod schema;
pub mod tags;

// The event-driven core
pub mod builder;

// XML text adapter
pub mod reader;

// Re-exports for convenience
pub use builder::SchemaBuilder;
pub use error::{Error, ParseError, ParseErrorKind, Position, Result};
pub use namespaces::QName;
pub use schema::XmlSchema;

/// Version of the xsd-frontend library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XSD namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
