//! Event-driven schema builder
//!
//! The core state machine: it consumes a flat stream of parse events and
//! reconstructs the nested schema grammar with a stack of per-element
//! parse states. Closing an element *reduces* its accumulated attributes
//! and already-reduced children into zero or more [`Tag`] values, which
//! are spliced into the parent's child list; closing the root `schema`
//! element instead produces the final [`XmlSchema`].
//!
//! Any rule violation aborts the whole parse: there is no partial result
//! and no recovery.

use std::collections::HashMap;

use crate::error::{Error, ParseError, ParseErrorKind, Position, Result};
use crate::events::Event;
use crate::namespaces::{NamespaceStack, QName};
use crate::schema::XmlSchema;
use crate::tags::{
    AttributeGroupTag, AttributeTag, ComplexContentType, DerivationBody, ElementKind, ElementTag,
    GroupTag, ListType, Metadata, Nullability, RestrictionType, SimpleContentType, Tag, TypeRef,
    TypeTag, UnionType,
};
use crate::XSD_NAMESPACE;

/// XSD element local names
mod xsd_tags {
    pub const SCHEMA: &str = "schema";
    pub const ELEMENT: &str = "element";
    pub const ATTRIBUTE: &str = "attribute";
    pub const ATTRIBUTE_GROUP: &str = "attributeGroup";
    pub const GROUP: &str = "group";
    pub const COMPLEX_TYPE: &str = "complexType";
    pub const COMPLEX_CONTENT: &str = "complexContent";
    pub const SIMPLE_CONTENT: &str = "simpleContent";
    pub const SIMPLE_TYPE: &str = "simpleType";
    pub const RESTRICTION: &str = "restriction";
    pub const EXTENSION: &str = "extension";
    pub const LIST: &str = "list";
    pub const UNION: &str = "union";
    pub const ENUMERATION: &str = "enumeration";
    pub const SEQUENCE: &str = "sequence";
    pub const CHOICE: &str = "choice";
    pub const ALL: &str = "all";
    pub const ANNOTATION: &str = "annotation";
    pub const APPINFO: &str = "appinfo";
    pub const DOCUMENTATION: &str = "documentation";

    /// Facet and identity-constraint tags: recognized but reduced to
    /// nothing
    pub const IGNORED: &[&str] = &[
        "pattern",
        "whiteSpace",
        "length",
        "minLength",
        "maxLength",
        "minInclusive",
        "maxInclusive",
        "minExclusive",
        "maxExclusive",
        "totalDigits",
        "fractionDigits",
        "key",
        "keyref",
        "unique",
        "selector",
        "field",
    ];

    /// Annotation sentinel identifiers
    pub const DEPRECATED: &str = "Deprecated";
    pub const FINAL: &str = "final";
    pub const NULLABLE: &str = "nullable";
    pub const NONNULL: &str = "nonnull";
}

/// XSD attribute names
mod xsd_attrs {
    pub const NAME: &str = "name";
    pub const REF: &str = "ref";
    pub const TYPE: &str = "type";
    pub const BASE: &str = "base";
    pub const VALUE: &str = "value";
    pub const ITEM_TYPE: &str = "itemType";
    pub const MEMBER_TYPES: &str = "memberTypes";
    pub const TARGET_NAMESPACE: &str = "targetNamespace";
    pub const MIN_OCCURS: &str = "minOccurs";
    pub const MAX_OCCURS: &str = "maxOccurs";
    pub const USE: &str = "use";
    pub const ABSTRACT: &str = "abstract";
    pub const MIXED: &str = "mixed";
    pub const DEFAULT: &str = "default";
    pub const SUBSTITUTION_GROUP: &str = "substitutionGroup";
}

/// Effective multiplicity of a `maxOccurs` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaxOccurs {
    /// `maxOccurs="0"`: the declaration contributes nothing
    Drop,
    /// At most one occurrence
    Single,
    /// `unbounded` or any integer greater than one
    Repeated,
}

fn parse_max_occurs(value: &str) -> Option<MaxOccurs> {
    match value {
        "unbounded" => Some(MaxOccurs::Repeated),
        "0" => Some(MaxOccurs::Drop),
        "1" => Some(MaxOccurs::Single),
        other => match other.parse::<u64>() {
            Ok(n) if n > 1 => Some(MaxOccurs::Repeated),
            _ => None,
        },
    }
}

/// Per-element parse state
///
/// Attributes are snapshotted eagerly because the event source may reuse
/// its buffers.
#[derive(Debug)]
struct ParseState {
    name: String,
    attributes: HashMap<String, String>,
    children: Vec<Tag>,
    meta: Metadata,
}

impl ParseState {
    fn new(name: String, attributes: Vec<(String, String)>) -> Self {
        Self {
            name,
            attributes: attributes.into_iter().collect(),
            children: Vec::new(),
            meta: Metadata::default(),
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }
}

/// Event-driven schema builder
///
/// Single-threaded and fully synchronous: one event in, zero or more
/// state mutations out. Independent builder instances are fully
/// independent; one instance must not be shared across threads mid-parse.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    stack: Vec<ParseState>,
    namespaces: NamespaceStack,
    /// Enumeration-bearing restrictions registered globally regardless of
    /// nesting depth, keyed by their (mandatory) name and merged into the
    /// type map at schema close
    floating_enums: Vec<(String, RestrictionType)>,
    /// Depth inside a `documentation` block; its content is opaque free
    /// text and nested markup is never pushed as parse state
    documentation_depth: usize,
    schema: Option<XmlSchema>,
}

impl SchemaBuilder {
    /// Create a fresh builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive the builder over a complete event sequence
    pub fn build<I>(events: I) -> Result<XmlSchema>
    where
        I: IntoIterator<Item = Event>,
    {
        let mut builder = SchemaBuilder::new();
        for event in events {
            builder.handle(event)?;
        }
        builder.finish()
    }

    /// Feed one event into the state machine
    pub fn handle(&mut self, event: Event) -> Result<()> {
        match event {
            Event::StartPrefixMapping { prefix, uri } => {
                self.namespaces.push(prefix, uri);
                Ok(())
            }
            Event::EndPrefixMapping { prefix } => {
                self.namespaces.pop(&prefix);
                Ok(())
            }
            Event::StartElement {
                local_name,
                attributes,
                ..
            } => self.start_element(local_name, attributes),
            Event::EndElement {
                local_name,
                position,
                ..
            } => self.end_element(&local_name, position),
        }
    }

    /// Consume the builder, yielding the schema produced at the closing
    /// event of the root `schema` element
    pub fn finish(self) -> Result<XmlSchema> {
        self.schema
            .ok_or_else(|| Error::Xml("event stream ended before the schema element closed".into()))
    }

    fn start_element(&mut self, local_name: String, attributes: Vec<(String, String)>) -> Result<()> {
        if self.documentation_depth > 0 {
            // Opaque free text; nested markup is ignored verbatim
            self.documentation_depth += 1;
            return Ok(());
        }
        if local_name == xsd_tags::DOCUMENTATION {
            self.documentation_depth = 1;
            return Ok(());
        }
        self.stack.push(ParseState::new(local_name, attributes));
        Ok(())
    }

    fn end_element(&mut self, local_name: &str, position: Position) -> Result<()> {
        if self.documentation_depth > 0 {
            self.documentation_depth -= 1;
            return Ok(());
        }

        let state = self
            .stack
            .pop()
            .ok_or_else(|| Error::Xml(format!("unbalanced end event for '{}'", local_name)))?;
        if state.name != local_name {
            return Err(Error::Xml(format!(
                "end event for '{}' does not match open element '{}'",
                local_name, state.name
            )));
        }

        // The root schema reduces to the final model, not to a tag
        if state.name == xsd_tags::SCHEMA && self.stack.is_empty() {
            let schema = self.reduce_schema(state, position)?;
            self.schema = Some(schema);
            return Ok(());
        }

        if state.name == xsd_tags::ANNOTATION {
            // Annotations produce no tag; they write their collected
            // metadata into the enclosing declaration's state
            if let Some(parent) = self.stack.last_mut() {
                parent.meta.merge_from(&state.meta);
            }
            return Ok(());
        }

        let tags = if self.inside_annotation() {
            self.record_sentinel(&state.name);
            Vec::new()
        } else {
            self.reduce(state, position)?
        };

        match self.stack.last_mut() {
            Some(parent) => {
                parent.children.extend(tags);
                Ok(())
            }
            None if tags.is_empty() => Ok(()),
            None => Err(ParseError::new(
                ParseErrorKind::UnknownTag,
                local_name,
                "the document root must be a 'schema' element",
                position,
            )
            .into()),
        }
    }

    fn inside_annotation(&self) -> bool {
        self.stack.iter().any(|s| s.name == xsd_tags::ANNOTATION)
    }

    /// Record a sentinel tag name on the nearest open annotation.
    /// First match wins per category; non-sentinel names are free text.
    fn record_sentinel(&mut self, name: &str) {
        let annotation = match self
            .stack
            .iter_mut()
            .rev()
            .find(|s| s.name == xsd_tags::ANNOTATION)
        {
            Some(state) => state,
            None => return,
        };
        match name {
            xsd_tags::DEPRECATED => annotation.meta.mark_deprecated(),
            xsd_tags::FINAL => annotation.meta.mark_final(),
            xsd_tags::NULLABLE => annotation.meta.set_nullability(Nullability::Nullable),
            xsd_tags::NONNULL => annotation.meta.set_nullability(Nullability::NonNull),
            _ => {}
        }
    }

    /// Reduce a closed element into zero or more tags
    fn reduce(&mut self, state: ParseState, pos: Position) -> Result<Vec<Tag>> {
        match state.name.as_str() {
            xsd_tags::ELEMENT => self.reduce_element(state, pos),
            xsd_tags::ATTRIBUTE => self.reduce_attribute(state, pos),
            xsd_tags::ATTRIBUTE_GROUP => self.reduce_attribute_group(state, pos),
            xsd_tags::GROUP => self.reduce_group(state, pos),
            xsd_tags::COMPLEX_TYPE => self.reduce_complex_type(state, pos),
            xsd_tags::COMPLEX_CONTENT => self.reduce_complex_content(state, pos),
            xsd_tags::SIMPLE_CONTENT => self.reduce_simple_content(state, pos),
            xsd_tags::RESTRICTION => self.reduce_restriction(state, pos),
            xsd_tags::EXTENSION => self.reduce_extension(state, pos),
            xsd_tags::SIMPLE_TYPE => self.reduce_simple_type(state, pos),
            xsd_tags::LIST => self.reduce_list(state, pos),
            xsd_tags::UNION => self.reduce_union(state, pos),
            xsd_tags::ENUMERATION => self.reduce_enumeration(state, pos),
            xsd_tags::SEQUENCE => self.reduce_sequence(state, pos),
            xsd_tags::CHOICE => self.reduce_choice(state, pos),
            xsd_tags::ALL => Ok(Self::reduce_all(state)),
            xsd_tags::APPINFO => Ok(Vec::new()),
            xsd_tags::SCHEMA => Err(ParseError::new(
                ParseErrorKind::UnsupportedConstruct,
                state.name,
                "nested schema elements are not supported",
                pos,
            )
            .into()),
            name if xsd_tags::IGNORED.contains(&name) => Ok(Vec::new()),
            _ => Err(ParseError::new(
                ParseErrorKind::UnknownTag,
                state.name.clone(),
                format!("'{}' is not part of the supported XSD vocabulary", state.name),
                pos,
            )
            .into()),
        }
    }

    fn resolve(&self, tag: &str, value: &str, pos: Position) -> Result<QName> {
        self.namespaces.resolve(value).map_err(|e| {
            ParseError::new(ParseErrorKind::MalformedReference, tag, e.to_string(), pos).into()
        })
    }

    fn reduce_element(&mut self, state: ParseState, pos: Position) -> Result<Vec<Tag>> {
        if state.attr(xsd_attrs::ABSTRACT) == Some("true") {
            return Err(unsupported(&state.name, "abstract elements are not supported", pos));
        }
        if state.attr(xsd_attrs::DEFAULT).is_some() {
            return Err(unsupported(&state.name, "default values on elements are not supported", pos));
        }
        if state.attr(xsd_attrs::SUBSTITUTION_GROUP).is_some() {
            return Err(unsupported(&state.name, "substitution groups are not supported", pos));
        }

        let multiplicity = match state.attr(xsd_attrs::MAX_OCCURS) {
            Some(value) => parse_max_occurs(value).ok_or_else(|| {
                invalid(&state.name, format!("invalid maxOccurs value '{}'", value), pos)
            })?,
            None => MaxOccurs::Single,
        };
        if multiplicity == MaxOccurs::Drop {
            return Ok(Vec::new());
        }

        let name = state.attr(xsd_attrs::NAME).map(String::from);
        let reference = match state.attr(xsd_attrs::REF) {
            Some(value) => Some(self.resolve(&state.name, value, pos)?),
            None => None,
        };
        let placeholder = match state.attr(xsd_attrs::TYPE) {
            Some(value) => Some(TypeRef::Named(self.resolve(&state.name, value, pos)?)),
            None => None,
        };

        // A nested type definition overrides the type attribute
        let mut element_type = placeholder;
        for child in state.children {
            match child {
                Tag::Type(t) => element_type = Some(TypeRef::Inline(Box::new(t))),
                other => return Err(unexpected_child(&state.name, &other, pos)),
            }
        }

        if name.is_none() && reference.is_none() && element_type.is_none() {
            return Err(missing(
                &state.name,
                "element requires a name, a ref or a type",
                pos,
            ));
        }

        let mut element = ElementTag::new(name, reference, element_type);
        if multiplicity == MaxOccurs::Repeated {
            element.mark_repeated();
        }
        element.meta = state.meta;
        Ok(vec![Tag::Element(element)])
    }

    fn reduce_attribute(&mut self, state: ParseState, pos: Position) -> Result<Vec<Tag>> {
        match state.attr(xsd_attrs::USE) {
            Some("prohibited") => return Ok(Vec::new()),
            Some("optional") | Some("required") | None => {}
            Some(other) => {
                return Err(invalid(&state.name, format!("invalid use value '{}'", other), pos));
            }
        }

        let name = state.attr(xsd_attrs::NAME).map(String::from);
        let reference = match state.attr(xsd_attrs::REF) {
            Some(value) => Some(self.resolve(&state.name, value, pos)?),
            None => None,
        };
        let mut attr_type = match state.attr(xsd_attrs::TYPE) {
            Some(value) => Some(TypeRef::Named(self.resolve(&state.name, value, pos)?)),
            None => None,
        };
        for child in state.children {
            match child {
                Tag::Type(t) => attr_type = Some(TypeRef::Inline(Box::new(t))),
                other => return Err(unexpected_child(&state.name, &other, pos)),
            }
        }

        if name.is_none() && reference.is_none() && attr_type.is_none() {
            return Err(missing(
                &state.name,
                "attribute requires a name, a ref or a type",
                pos,
            ));
        }

        let mut attribute = AttributeTag::new(name, reference, attr_type);
        attribute.meta = state.meta;
        Ok(vec![Tag::Attribute(attribute)])
    }

    fn reduce_attribute_group(&mut self, state: ParseState, pos: Position) -> Result<Vec<Tag>> {
        let name = state.attr(xsd_attrs::NAME).map(String::from);
        let reference = match state.attr(xsd_attrs::REF) {
            Some(value) => Some(self.resolve(&state.name, value, pos)?),
            None => None,
        };
        if name.is_none() && reference.is_none() {
            return Err(missing(&state.name, "attributeGroup requires a name or a ref", pos));
        }

        let mut group = AttributeGroupTag::new(name, reference);
        for child in state.children {
            match child {
                Tag::Attribute(a) => group.attributes.push(a),
                Tag::AttributeGroup(g) => group.attribute_groups.push(g),
                other => return Err(unexpected_child(&state.name, &other, pos)),
            }
        }
        group.meta = state.meta;
        Ok(vec![Tag::AttributeGroup(group)])
    }

    fn reduce_group(&mut self, state: ParseState, pos: Position) -> Result<Vec<Tag>> {
        let name = state.attr(xsd_attrs::NAME).map(String::from);
        let reference = match state.attr(xsd_attrs::REF) {
            Some(value) => Some(self.resolve(&state.name, value, pos)?),
            None => None,
        };
        if name.is_none() && reference.is_none() {
            return Err(missing(&state.name, "group requires a name or a ref", pos));
        }

        let mut group = GroupTag::new(name, reference);
        for child in state.children {
            match child {
                Tag::Element(e) => group.elements.push(e),
                other => return Err(unexpected_child(&state.name, &other, pos)),
            }
        }
        group.meta = state.meta;
        Ok(vec![Tag::Group(group)])
    }

    fn reduce_complex_type(&mut self, state: ParseState, pos: Position) -> Result<Vec<Tag>> {
        if state.attr(xsd_attrs::ABSTRACT) == Some("true") {
            return Err(unsupported(&state.name, "abstract types are not supported", pos));
        }
        if state.attr(xsd_attrs::MIXED) == Some("true") {
            return Err(unsupported(&state.name, "mixed content is not supported", pos));
        }

        let name = state.attr(xsd_attrs::NAME).map(String::from);
        let meta = state.meta;

        let mut content = ComplexContentType::new(name.clone());
        let mut derived: Option<TypeTag> = None;
        for child in state.children {
            match child {
                Tag::Attribute(a) => content.attributes.push(a),
                Tag::AttributeGroup(g) => content.attribute_groups.push(g),
                Tag::Element(e) => content.elements.push(e),
                Tag::Group(g) => {
                    if content.group.is_some() {
                        return Err(unsupported(
                            &state.name,
                            "complexType allows at most one group",
                            pos,
                        ));
                    }
                    content.group = Some(g);
                }
                Tag::Type(t @ TypeTag::ComplexContent(_)) | Tag::Type(t @ TypeTag::SimpleContent(_)) => {
                    derived = Some(t);
                }
                other => return Err(unexpected_child(&state.name, &other, pos)),
            }
        }

        // A complexContent/simpleContent child becomes the whole result,
        // re-keyed with this type's name
        let mut result = match derived {
            Some(t) => t,
            None => {
                content.meta = meta;
                TypeTag::ComplexContent(content)
            }
        };
        result.set_name(name);
        result.merge_meta(&meta);
        Ok(vec![Tag::Type(result)])
    }

    fn reduce_complex_content(&mut self, state: ParseState, pos: Position) -> Result<Vec<Tag>> {
        let mut result: Option<ComplexContentType> = None;
        for child in state.children {
            let derived = match child {
                Tag::GeneralExtension(body) => ComplexContentType {
                    name: None,
                    base: Some(body.base),
                    attributes: body.attributes,
                    attribute_groups: body.attribute_groups,
                    elements: body.elements,
                    group: body.group,
                    meta: Metadata::default(),
                },
                Tag::GeneralRestriction(body) => {
                    if is_any_type(&body.base) {
                        // Restricting anyType carries no nominal base: the
                        // restriction's structural content is the full
                        // content definition
                        ComplexContentType {
                            name: None,
                            base: None,
                            attributes: body.attributes,
                            attribute_groups: body.attribute_groups,
                            elements: body.elements,
                            group: body.group,
                            meta: Metadata::default(),
                        }
                    } else {
                        // Restriction of a named base is modeled nominally
                        // only; structural children are discarded
                        ComplexContentType {
                            base: Some(body.base),
                            ..ComplexContentType::new(None)
                        }
                    }
                }
                other => return Err(unexpected_child(&state.name, &other, pos)),
            };
            result = Some(derived);
        }

        match result {
            Some(content) => Ok(vec![Tag::Type(TypeTag::ComplexContent(content))]),
            None => Err(unsupported(
                &state.name,
                "complexContent requires an extension or restriction",
                pos,
            )),
        }
    }

    fn reduce_simple_content(&mut self, state: ParseState, pos: Position) -> Result<Vec<Tag>> {
        let mut result: Option<SimpleContentType> = None;
        for child in state.children {
            let body = match child {
                Tag::GeneralExtension(body) | Tag::GeneralRestriction(body) => body,
                other => return Err(unexpected_child(&state.name, &other, pos)),
            };
            result = Some(SimpleContentType {
                name: None,
                base: Some(body.base),
                attributes: body.attributes,
                meta: Metadata::default(),
            });
        }

        match result {
            Some(content) => Ok(vec![Tag::Type(TypeTag::SimpleContent(content))]),
            None => Err(unsupported(
                &state.name,
                "simpleContent requires an extension or restriction",
                pos,
            )),
        }
    }

    fn reduce_extension(&mut self, state: ParseState, pos: Position) -> Result<Vec<Tag>> {
        let body = self.collect_derivation_body(state, pos)?;
        Ok(vec![Tag::GeneralExtension(body)])
    }

    /// `restriction` bifurcates: enumeration children make it a simple
    /// enumerated type; otherwise it is a transient structural body for
    /// the enclosing content tag to interpret.
    fn reduce_restriction(&mut self, state: ParseState, pos: Position) -> Result<Vec<Tag>> {
        let enumerations: Vec<String> = state
            .children
            .iter()
            .filter_map(|c| match c {
                Tag::Enumeration(value) => Some(value.clone()),
                _ => None,
            })
            .collect();

        if enumerations.is_empty() {
            let body = self.collect_derivation_body(state, pos)?;
            return Ok(vec![Tag::GeneralRestriction(body)]);
        }

        let base = self.required_qname(&state, xsd_attrs::BASE, pos)?;
        Ok(vec![Tag::Type(TypeTag::Restriction(RestrictionType {
            name: None,
            base,
            enumerations: Some(enumerations),
            meta: Metadata::default(),
        }))])
    }

    fn collect_derivation_body(&mut self, state: ParseState, pos: Position) -> Result<DerivationBody> {
        let base = self.required_qname(&state, xsd_attrs::BASE, pos)?;
        let mut body = DerivationBody {
            base,
            attributes: Vec::new(),
            attribute_groups: Vec::new(),
            elements: Vec::new(),
            group: None,
        };
        for child in state.children {
            match child {
                Tag::Attribute(a) => body.attributes.push(a),
                Tag::AttributeGroup(g) => body.attribute_groups.push(g),
                Tag::Element(e) => body.elements.push(e),
                Tag::Group(g) => {
                    if body.group.is_some() {
                        return Err(unsupported(&state.name, "at most one group is allowed", pos));
                    }
                    body.group = Some(g);
                }
                other => return Err(unexpected_child(&state.name, &other, pos)),
            }
        }
        Ok(body)
    }

    fn reduce_simple_type(&mut self, state: ParseState, pos: Position) -> Result<Vec<Tag>> {
        let name = state.attr(xsd_attrs::NAME).map(String::from);
        let meta = state.meta;

        let mut result: Option<TypeTag> = None;
        for child in state.children {
            let tag = match child {
                // Non-enumerated restriction: only the base is kept
                Tag::GeneralRestriction(body) => TypeTag::Restriction(RestrictionType {
                    name: name.clone(),
                    base: body.base,
                    enumerations: None,
                    meta: Metadata::default(),
                }),
                Tag::Type(TypeTag::Restriction(mut restriction)) => {
                    // Enumerated simple types are registered globally even
                    // when declared inline, so they must be nameable
                    let type_name = match &name {
                        Some(n) => n.clone(),
                        None => {
                            return Err(missing(
                                &state.name,
                                "an enumeration restriction requires a named simpleType",
                                pos,
                            ));
                        }
                    };
                    restriction.name = Some(type_name.clone());
                    restriction.meta.merge_from(&meta);
                    self.floating_enums.push((type_name, restriction.clone()));
                    TypeTag::Restriction(restriction)
                }
                Tag::Type(TypeTag::List(mut list)) => {
                    list.name = name.clone();
                    TypeTag::List(list)
                }
                Tag::Type(TypeTag::Union(mut union)) => {
                    union.name = name.clone();
                    TypeTag::Union(union)
                }
                other => return Err(unexpected_child(&state.name, &other, pos)),
            };
            result = Some(tag);
        }

        match result {
            Some(mut tag) => {
                tag.merge_meta(&meta);
                Ok(vec![Tag::Type(tag)])
            }
            None => Err(unsupported(
                &state.name,
                "simpleType requires a restriction, list or union",
                pos,
            )),
        }
    }

    fn reduce_list(&mut self, state: ParseState, pos: Position) -> Result<Vec<Tag>> {
        let item_type = self.required_qname(&state, xsd_attrs::ITEM_TYPE, pos)?;
        Ok(vec![Tag::Type(TypeTag::List(ListType {
            name: None,
            item_type,
            meta: Metadata::default(),
        }))])
    }

    fn reduce_union(&mut self, state: ParseState, pos: Position) -> Result<Vec<Tag>> {
        let members = state.attr(xsd_attrs::MEMBER_TYPES).ok_or_else(|| {
            missing(&state.name, "union requires a memberTypes attribute", pos)
        })?;
        let member_types = members
            .split_whitespace()
            .map(|value| self.resolve(&state.name, value, pos))
            .collect::<Result<Vec<QName>>>()?;
        Ok(vec![Tag::Type(TypeTag::Union(UnionType {
            name: None,
            member_types,
            meta: Metadata::default(),
        }))])
    }

    fn reduce_enumeration(&mut self, state: ParseState, pos: Position) -> Result<Vec<Tag>> {
        let value = state
            .attr(xsd_attrs::VALUE)
            .ok_or_else(|| missing(&state.name, "enumeration requires a value", pos))?;
        Ok(vec![Tag::Enumeration(value.to_string())])
    }

    fn reduce_sequence(&mut self, state: ParseState, pos: Position) -> Result<Vec<Tag>> {
        if state.attr(xsd_attrs::MIN_OCCURS).is_some() || state.attr(xsd_attrs::MAX_OCCURS).is_some()
        {
            return Err(unsupported(
                &state.name,
                "occurrence constraints on sequence are not supported",
                pos,
            ));
        }
        // Children are spliced into the parent as-is
        Ok(state.children)
    }

    fn reduce_choice(&mut self, state: ParseState, pos: Position) -> Result<Vec<Tag>> {
        let multiplicity = match state.attr(xsd_attrs::MAX_OCCURS) {
            Some(value) => parse_max_occurs(value).ok_or_else(|| {
                invalid(&state.name, format!("invalid maxOccurs value '{}'", value), pos)
            })?,
            None => MaxOccurs::Single,
        };
        if multiplicity == MaxOccurs::Drop {
            return Ok(Vec::new());
        }

        let tags = state
            .children
            .into_iter()
            .map(|child| match child {
                Tag::Element(mut element) => {
                    // A repeating choice makes every member independently
                    // repeatable
                    if multiplicity == MaxOccurs::Repeated {
                        element.mark_repeated();
                    }
                    Tag::Element(element.with_kind(ElementKind::Choice))
                }
                other => other,
            })
            .collect();
        Ok(tags)
    }

    fn reduce_all(state: ParseState) -> Vec<Tag> {
        state
            .children
            .into_iter()
            .map(|child| match child {
                Tag::Element(element) => Tag::Element(element.with_kind(ElementKind::All)),
                other => other,
            })
            .collect()
    }

    /// Partition the root schema's children (plus the floating enums)
    /// into the five named maps; later declarations of a name overwrite
    /// earlier ones.
    fn reduce_schema(&mut self, state: ParseState, pos: Position) -> Result<XmlSchema> {
        let target_namespace = state.attr(xsd_attrs::TARGET_NAMESPACE).map(String::from);
        let mut schema = XmlSchema::new(target_namespace);

        for child in state.children {
            if matches!(
                child,
                Tag::Enumeration(_) | Tag::GeneralRestriction(_) | Tag::GeneralExtension(_)
            ) {
                return Err(ParseError::new(
                    ParseErrorKind::UnsupportedConstruct,
                    xsd_tags::SCHEMA,
                    format!("{} is not allowed at the schema root", child.kind_name()),
                    pos,
                )
                .into());
            }
            let name = match child.name() {
                Some(name) => name.to_string(),
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::MissingAttribute,
                        xsd_tags::SCHEMA,
                        format!("top-level {} requires a name", child.kind_name()),
                        pos,
                    )
                    .into());
                }
            };
            match child {
                Tag::Element(e) => schema.insert_element(name, e),
                Tag::Attribute(a) => schema.insert_attribute(name, a),
                Tag::AttributeGroup(g) => schema.insert_attribute_group(name, g),
                Tag::Group(g) => schema.insert_group(name, g),
                Tag::Type(t) => schema.insert_type(name, t),
                // The disallowed variants were rejected above
                _ => unreachable!(),
            }
        }

        // Enumerated simple types are registered globally no matter how
        // deeply they were nested
        for (name, restriction) in self.floating_enums.drain(..) {
            schema.insert_type(name, TypeTag::Restriction(restriction));
        }

        Ok(schema)
    }

    fn required_qname(&self, state: &ParseState, attr: &str, pos: Position) -> Result<QName> {
        let value = state
            .attr(attr)
            .ok_or_else(|| {
                missing(&state.name, format!("{} requires a {} attribute", state.name, attr), pos)
            })?;
        self.resolve(&state.name, value, pos)
    }
}

fn is_any_type(qname: &QName) -> bool {
    qname.namespace.as_deref() == Some(XSD_NAMESPACE) && qname.local_name == "anyType"
}

fn unsupported(tag: &str, message: impl Into<String>, pos: Position) -> Error {
    ParseError::new(ParseErrorKind::UnsupportedConstruct, tag, message, pos).into()
}

fn missing(tag: &str, message: impl Into<String>, pos: Position) -> Error {
    ParseError::new(ParseErrorKind::MissingAttribute, tag, message, pos).into()
}

fn invalid(tag: &str, message: impl Into<String>, pos: Position) -> Error {
    ParseError::new(ParseErrorKind::InvalidAttribute, tag, message, pos).into()
}

fn unexpected_child(tag: &str, child: &Tag, pos: Position) -> Error {
    ParseError::new(
        ParseErrorKind::UnsupportedConstruct,
        tag,
        format!("unexpected {} inside {}", child.kind_name(), tag),
        pos,
    )
    .into()
}
