//! Model group tags

use serde::Serialize;

use super::elements::ElementTag;
use super::Metadata;
use crate::namespaces::QName;

/// Model group definition or reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTag {
    /// Definition name (absent when this is a reference)
    pub name: Option<String>,
    /// Reference to a top-level group
    pub reference: Option<QName>,
    /// Member elements
    pub elements: Vec<ElementTag>,
    /// Annotation metadata
    pub meta: Metadata,
}

impl GroupTag {
    /// Create a model group
    pub fn new(name: Option<String>, reference: Option<QName>) -> Self {
        Self {
            name,
            reference,
            elements: Vec::new(),
            meta: Metadata::default(),
        }
    }
}
