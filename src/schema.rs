//! The schema model
//!
//! The immutable product of a successful parse: five name-keyed maps
//! holding the top-level elements, types, attributes, attribute groups
//! and model groups of one schema document. Constructed exactly once, at
//! the closing event of the root `schema` element.

use indexmap::IndexMap;
use serde::Serialize;

use crate::tags::{AttributeGroupTag, AttributeTag, ElementTag, GroupTag, TypeTag};

/// Fully parsed schema
///
/// Maps preserve first-declaration order; re-declaring a name replaces
/// the earlier entry in place (last declaration wins).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct XmlSchema {
    /// The schema's target namespace, if declared
    pub target_namespace: Option<String>,
    elements: IndexMap<String, ElementTag>,
    types: IndexMap<String, TypeTag>,
    attributes: IndexMap<String, AttributeTag>,
    attribute_groups: IndexMap<String, AttributeGroupTag>,
    groups: IndexMap<String, GroupTag>,
}

impl XmlSchema {
    /// Create an empty schema
    pub fn new(target_namespace: Option<String>) -> Self {
        Self {
            target_namespace,
            ..Self::default()
        }
    }

    /// Top-level elements, keyed by name
    pub fn elements(&self) -> &IndexMap<String, ElementTag> {
        &self.elements
    }

    /// Top-level types, keyed by name
    pub fn types(&self) -> &IndexMap<String, TypeTag> {
        &self.types
    }

    /// Top-level attributes, keyed by name
    pub fn attributes(&self) -> &IndexMap<String, AttributeTag> {
        &self.attributes
    }

    /// Top-level attribute groups, keyed by name
    pub fn attribute_groups(&self) -> &IndexMap<String, AttributeGroupTag> {
        &self.attribute_groups
    }

    /// Top-level model groups, keyed by name
    pub fn groups(&self) -> &IndexMap<String, GroupTag> {
        &self.groups
    }

    /// Look up a top-level element by name
    pub fn element(&self, name: &str) -> Option<&ElementTag> {
        self.elements.get(name)
    }

    /// Look up a top-level type by name
    pub fn get_type(&self, name: &str) -> Option<&TypeTag> {
        self.types.get(name)
    }

    /// Look up a top-level attribute by name
    pub fn attribute(&self, name: &str) -> Option<&AttributeTag> {
        self.attributes.get(name)
    }

    /// Look up a top-level attribute group by name
    pub fn attribute_group(&self, name: &str) -> Option<&AttributeGroupTag> {
        self.attribute_groups.get(name)
    }

    /// Look up a top-level model group by name
    pub fn group(&self, name: &str) -> Option<&GroupTag> {
        self.groups.get(name)
    }

    pub(crate) fn insert_element(&mut self, name: String, tag: ElementTag) {
        self.elements.insert(name, tag);
    }

    pub(crate) fn insert_type(&mut self, name: String, tag: TypeTag) {
        self.types.insert(name, tag);
    }

    pub(crate) fn insert_attribute(&mut self, name: String, tag: AttributeTag) {
        self.attributes.insert(name, tag);
    }

    pub(crate) fn insert_attribute_group(&mut self, name: String, tag: AttributeGroupTag) {
        self.attribute_groups.insert(name, tag);
    }

    pub(crate) fn insert_group(&mut self, name: String, tag: GroupTag) {
        self.groups.insert(name, tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_declaration_wins() {
        let mut schema = XmlSchema::new(None);
        let mut first = ElementTag::named("config");
        first.mark_repeated();
        let second = ElementTag::named("config");

        schema.insert_element("config".to_string(), first);
        schema.insert_element("config".to_string(), second);

        assert_eq!(schema.elements().len(), 1);
        assert!(!schema.element("config").unwrap().repeated);
    }

    #[test]
    fn test_lookup_missing() {
        let schema = XmlSchema::new(Some("urn:example".to_string()));
        assert!(schema.element("nope").is_none());
        assert!(schema.get_type("nope").is_none());
        assert_eq!(schema.target_namespace.as_deref(), Some("urn:example"));
    }
}
