//! Type tags
//!
//! The [`TypeTag`] variants are the only type representations that reach
//! the final schema model; [`DerivationBody`] is a transient intermediate
//! produced by `restriction`/`extension` and consumed while reducing
//! `complexContent`/`simpleContent`/`simpleType`.

use serde::Serialize;

use super::attributes::{AttributeGroupTag, AttributeTag};
use super::elements::ElementTag;
use super::groups::GroupTag;
use super::Metadata;
use crate::namespaces::QName;

/// A type position: unresolved named placeholder or inline definition
///
/// A `type` attribute produces a named placeholder; a nested type tag
/// overrides it with the inline definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeRef {
    /// Unresolved reference to a type by qualified name
    Named(QName),
    /// Inline (anonymous or locally named) type definition
    Inline(Box<TypeTag>),
}

/// A fully reduced type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeTag {
    /// Complex type with structural content
    ComplexContent(ComplexContentType),
    /// Complex type with simple content
    SimpleContent(SimpleContentType),
    /// Simple type restriction (enumerated or nominal)
    Restriction(RestrictionType),
    /// Simple type list
    List(ListType),
    /// Simple type union
    Union(UnionType),
}

impl TypeTag {
    /// The type name, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeTag::ComplexContent(t) => t.name.as_deref(),
            TypeTag::SimpleContent(t) => t.name.as_deref(),
            TypeTag::Restriction(t) => t.name.as_deref(),
            TypeTag::List(t) => t.name.as_deref(),
            TypeTag::Union(t) => t.name.as_deref(),
        }
    }

    /// Re-key the type with a new name (used when an enclosing
    /// `complexType`/`simpleType` supplies the name)
    pub fn set_name(&mut self, name: Option<String>) {
        match self {
            TypeTag::ComplexContent(t) => t.name = name,
            TypeTag::SimpleContent(t) => t.name = name,
            TypeTag::Restriction(t) => t.name = name,
            TypeTag::List(t) => t.name = name,
            TypeTag::Union(t) => t.name = name,
        }
    }

    /// Fold annotation metadata from the enclosing declaration in
    pub fn merge_meta(&mut self, meta: &Metadata) {
        match self {
            TypeTag::ComplexContent(t) => t.meta.merge_from(meta),
            TypeTag::SimpleContent(t) => t.meta.merge_from(meta),
            TypeTag::Restriction(t) => t.meta.merge_from(meta),
            TypeTag::List(t) => t.meta.merge_from(meta),
            TypeTag::Union(t) => t.meta.merge_from(meta),
        }
    }
}

/// Complex type with structural content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexContentType {
    /// Type name (absent for inline types)
    pub name: Option<String>,
    /// Base type being extended or nominally restricted
    pub base: Option<QName>,
    /// Declared attributes
    pub attributes: Vec<AttributeTag>,
    /// Referenced attribute groups
    pub attribute_groups: Vec<AttributeGroupTag>,
    /// Child elements
    pub elements: Vec<ElementTag>,
    /// At most one model group
    pub group: Option<GroupTag>,
    /// Annotation metadata
    pub meta: Metadata,
}

impl ComplexContentType {
    /// Create an empty complex content type
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            base: None,
            attributes: Vec::new(),
            attribute_groups: Vec::new(),
            elements: Vec::new(),
            group: None,
            meta: Metadata::default(),
        }
    }
}

/// Complex type with simple content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleContentType {
    /// Type name (absent for inline types)
    pub name: Option<String>,
    /// Base simple type
    pub base: Option<QName>,
    /// Declared attributes
    pub attributes: Vec<AttributeTag>,
    /// Annotation metadata
    pub meta: Metadata,
}

/// Simple type restriction
///
/// `enumerations: None` means a non-enumerated (nominal) restriction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestrictionType {
    /// Type name, supplied by the enclosing simpleType
    pub name: Option<String>,
    /// Base type being restricted
    pub base: QName,
    /// Ordered enumeration literals, if this is an enumerated restriction
    pub enumerations: Option<Vec<String>>,
    /// Annotation metadata
    pub meta: Metadata,
}

impl RestrictionType {
    /// True when this restriction enumerates literal values
    pub fn is_enumeration(&self) -> bool {
        self.enumerations.is_some()
    }
}

/// Simple type list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListType {
    /// Type name, supplied by the enclosing simpleType
    pub name: Option<String>,
    /// Item type
    pub item_type: QName,
    /// Annotation metadata
    pub meta: Metadata,
}

/// Simple type union
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnionType {
    /// Type name, supplied by the enclosing simpleType
    pub name: Option<String>,
    /// Ordered member types
    pub member_types: Vec<QName>,
    /// Annotation metadata
    pub meta: Metadata,
}

/// Transient body of a `restriction`/`extension` under complex or simple
/// content; never appears in the final schema model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivationBody {
    /// Base type
    pub base: QName,
    /// Declared attributes
    pub attributes: Vec<AttributeTag>,
    /// Referenced attribute groups
    pub attribute_groups: Vec<AttributeGroupTag>,
    /// Child elements
    pub elements: Vec<ElementTag>,
    /// At most one model group
    pub group: Option<GroupTag>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_name_rekeys_every_variant() {
        let mut tag = TypeTag::Restriction(RestrictionType {
            name: None,
            base: QName::local("string"),
            enumerations: Some(vec!["A".to_string()]),
            meta: Metadata::default(),
        });
        assert_eq!(tag.name(), None);

        tag.set_name(Some("Color".to_string()));
        assert_eq!(tag.name(), Some("Color"));
    }

    #[test]
    fn test_is_enumeration() {
        let nominal = RestrictionType {
            name: Some("Token".to_string()),
            base: QName::local("string"),
            enumerations: None,
            meta: Metadata::default(),
        };
        assert!(!nominal.is_enumeration());
    }
}
