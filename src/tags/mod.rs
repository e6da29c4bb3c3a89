//! The tag model
//!
//! A [`Tag`] is one fully reduced schema construct. Tags are built
//! bottom-up as immutable values at the closing event of their element;
//! there is no mutation after construction. The closed vocabulary is a
//! sum type: new constructs are new variants, never subclasses.

pub mod attributes;
pub mod elements;
pub mod groups;
pub mod types;

pub use attributes::{AttributeGroupTag, AttributeTag};
pub use elements::{ElementKind, ElementTag};
pub use groups::GroupTag;
pub use types::{
    ComplexContentType, DerivationBody, ListType, RestrictionType, SimpleContentType, TypeRef,
    TypeTag, UnionType,
};

use serde::Serialize;

/// Nullability recorded from annotation sentinels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Nullability {
    /// No annotation seen
    #[default]
    Unknown,
    /// Annotated `nullable`
    Nullable,
    /// Annotated `nonnull`
    NonNull,
}

/// Deprecated/final/nullability metadata inherited from enclosing
/// annotation blocks
///
/// Each category is write-once: the first annotation to set it wins and a
/// later sibling annotation at the same scope never unsets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Metadata {
    /// Declaration is annotated as deprecated
    pub deprecated: bool,
    /// Declaration is annotated as final
    pub final_value: bool,
    /// Annotated nullability
    pub nullability: Nullability,
}

impl Metadata {
    /// Mark the declaration deprecated
    pub fn mark_deprecated(&mut self) {
        self.deprecated = true;
    }

    /// Mark the declaration final
    pub fn mark_final(&mut self) {
        self.final_value = true;
    }

    /// Set nullability, first writer wins
    pub fn set_nullability(&mut self, nullability: Nullability) {
        if self.nullability == Nullability::Unknown {
            self.nullability = nullability;
        }
    }

    /// Fold another metadata record in, category by category, without
    /// unsetting anything already set
    pub fn merge_from(&mut self, other: &Metadata) {
        if other.deprecated {
            self.deprecated = true;
        }
        if other.final_value {
            self.final_value = true;
        }
        self.set_nullability(other.nullability);
    }
}

/// One fully reduced schema construct
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Tag {
    /// Element declaration (plain, choice-flavored or all-flavored)
    Element(ElementTag),
    /// Attribute declaration
    Attribute(AttributeTag),
    /// Attribute group definition or reference
    AttributeGroup(AttributeGroupTag),
    /// Model group definition or reference
    Group(GroupTag),
    /// A named or inline type
    Type(TypeTag),
    /// Transient restriction body, consumed by the enclosing content tag
    GeneralRestriction(DerivationBody),
    /// Transient extension body, consumed by the enclosing content tag
    GeneralExtension(DerivationBody),
    /// A single enumeration literal
    Enumeration(String),
}

impl Tag {
    /// The declaration name, if this tag kind carries one
    pub fn name(&self) -> Option<&str> {
        match self {
            Tag::Element(e) => e.name.as_deref(),
            Tag::Attribute(a) => a.name.as_deref(),
            Tag::AttributeGroup(g) => g.name.as_deref(),
            Tag::Group(g) => g.name.as_deref(),
            Tag::Type(t) => t.name(),
            Tag::GeneralRestriction(_) | Tag::GeneralExtension(_) | Tag::Enumeration(_) => None,
        }
    }

    /// Short label for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Tag::Element(_) => "element",
            Tag::Attribute(_) => "attribute",
            Tag::AttributeGroup(_) => "attributeGroup",
            Tag::Group(_) => "group",
            Tag::Type(_) => "type",
            Tag::GeneralRestriction(_) => "restriction body",
            Tag::GeneralExtension(_) => "extension body",
            Tag::Enumeration(_) => "enumeration",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_write_once_nullability() {
        let mut meta = Metadata::default();
        meta.set_nullability(Nullability::Nullable);
        meta.set_nullability(Nullability::NonNull);
        assert_eq!(meta.nullability, Nullability::Nullable);
    }

    #[test]
    fn test_metadata_merge_never_unsets() {
        let mut meta = Metadata {
            deprecated: true,
            final_value: false,
            nullability: Nullability::NonNull,
        };
        meta.merge_from(&Metadata {
            deprecated: false,
            final_value: true,
            nullability: Nullability::Nullable,
        });
        assert!(meta.deprecated);
        assert!(meta.final_value);
        assert_eq!(meta.nullability, Nullability::NonNull);
    }

    #[test]
    fn test_tag_name() {
        let tag = Tag::Element(ElementTag::named("item"));
        assert_eq!(tag.name(), Some("item"));
        assert_eq!(Tag::Enumeration("A".to_string()).name(), None);
    }
}
