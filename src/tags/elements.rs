//! Element tags
//!
//! An element declaration, possibly re-wrapped with its containment
//! context: members of a `choice` become independently repeatable
//! choice-flavored elements, members of an `all` group become
//! all-flavored (singular-or-absent) elements.

use serde::Serialize;

use super::types::TypeRef;
use super::Metadata;
use crate::namespaces::QName;

/// Containment context of an element declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ElementKind {
    /// Declared directly or inside a sequence
    #[default]
    Plain,
    /// Member of a choice group
    Choice,
    /// Member of an all group
    All,
}

/// Element declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementTag {
    /// Declaration name (absent when the element is a reference)
    pub name: Option<String>,
    /// Reference to a top-level element
    pub reference: Option<QName>,
    /// Resolved type: a named placeholder or an inline type definition
    pub element_type: Option<TypeRef>,
    /// True when the element may occur more than once
    pub repeated: bool,
    /// Containment context
    pub kind: ElementKind,
    /// Annotation metadata
    pub meta: Metadata,
}

impl ElementTag {
    /// Create an element declaration
    pub fn new(
        name: Option<String>,
        reference: Option<QName>,
        element_type: Option<TypeRef>,
    ) -> Self {
        Self {
            name,
            reference,
            element_type,
            repeated: false,
            kind: ElementKind::Plain,
            meta: Metadata::default(),
        }
    }

    /// Create a named element with no type, for tests and synthesis
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(Some(name.into()), None, None)
    }

    /// Mark the element as repeatable
    ///
    /// Monotonic: once repeated, an element is never reset to singular.
    pub fn mark_repeated(&mut self) {
        self.repeated = true;
    }

    /// Re-wrap with a containment context, preserving everything else
    pub fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_repeated_is_monotonic() {
        let mut elem = ElementTag::named("item");
        assert!(!elem.repeated);
        elem.mark_repeated();
        elem.mark_repeated();
        assert!(elem.repeated);
    }

    #[test]
    fn test_with_kind_preserves_fields() {
        let mut elem = ElementTag::named("option");
        elem.meta.mark_deprecated();
        elem.mark_repeated();

        let wrapped = elem.with_kind(ElementKind::Choice);
        assert_eq!(wrapped.kind, ElementKind::Choice);
        assert!(wrapped.repeated);
        assert!(wrapped.meta.deprecated);
    }
}
