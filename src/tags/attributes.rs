//! Attribute and attribute-group tags
//!
//! Prohibited attributes (`use="prohibited"`) are dropped during
//! reduction and never constructed, so no use mode is modeled here.

use serde::Serialize;

use super::types::TypeRef;
use super::Metadata;
use crate::namespaces::QName;

/// Attribute declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeTag {
    /// Declaration name (absent when the attribute is a reference)
    pub name: Option<String>,
    /// Reference to a top-level attribute
    pub reference: Option<QName>,
    /// Attribute type: a named placeholder or an inline simple type
    pub attr_type: Option<TypeRef>,
    /// Annotation metadata
    pub meta: Metadata,
}

impl AttributeTag {
    /// Create an attribute declaration
    pub fn new(name: Option<String>, reference: Option<QName>, attr_type: Option<TypeRef>) -> Self {
        Self {
            name,
            reference,
            attr_type,
            meta: Metadata::default(),
        }
    }
}

/// Attribute group definition or reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeGroupTag {
    /// Definition name (absent when this is a reference)
    pub name: Option<String>,
    /// Reference to a top-level attribute group
    pub reference: Option<QName>,
    /// Member attributes
    pub attributes: Vec<AttributeTag>,
    /// Nested attribute group members
    pub attribute_groups: Vec<AttributeGroupTag>,
    /// Annotation metadata
    pub meta: Metadata,
}

impl AttributeGroupTag {
    /// Create an attribute group
    pub fn new(name: Option<String>, reference: Option<QName>) -> Self {
        Self {
            name,
            reference,
            attributes: Vec::new(),
            attribute_groups: Vec::new(),
            meta: Metadata::default(),
        }
    }
}
