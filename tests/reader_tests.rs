//! Tests for the XML reader adapter: event extraction, namespace
//! scoping and source positions.

use std::io::Write;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use xsd_frontend::events::Event;
use xsd_frontend::tags::TypeTag;
use xsd_frontend::{reader, Error};

#[test]
fn parse_file_reads_and_compiles() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
             <xs:element name="config" type="xs:string"/>
           </xs:schema>"#
    )
    .expect("write schema");

    let schema = reader::parse_file(file.path()).expect("schema should compile");
    assert_eq!(schema.elements().len(), 1);
    assert!(schema.element("config").is_some());
}

#[test]
fn parse_file_missing_path_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("no-such-schema.xsd");
    match reader::parse_file(&missing) {
        Err(Error::Io(_)) => {}
        other => panic!("expected an io error, got {:?}", other),
    }
}

#[test]
fn events_carry_prefix_mappings_around_their_scope() {
    let events = reader::read_events(
        r#"<root xmlns:a="urn:a"><child xmlns:b="urn:b"/></root>"#,
    )
    .expect("events");

    let names: Vec<String> = events
        .iter()
        .map(|e| match e {
            Event::StartPrefixMapping { prefix, uri } => format!("+{}={}", prefix, uri),
            Event::EndPrefixMapping { prefix } => format!("-{}", prefix),
            Event::StartElement { local_name, .. } => format!("<{}", local_name),
            Event::EndElement { local_name, .. } => format!(">{}", local_name),
        })
        .collect();

    assert_eq!(
        names,
        vec!["+a=urn:a", "<root", "+b=urn:b", "<child", ">child", "-b", ">root", "-a"]
    );
}

#[test]
fn self_closing_elements_produce_both_events_at_the_tag() {
    let events = reader::read_events("<root>\n  <leaf/>\n</root>").expect("events");

    let leaf_end = events
        .iter()
        .find_map(|e| match e {
            Event::EndElement {
                local_name,
                position,
                ..
            } if local_name == "leaf" => Some(*position),
            _ => None,
        })
        .expect("leaf end event");

    assert_eq!(leaf_end.line, 2);
    assert_eq!(leaf_end.column, 3);
}

#[test]
fn end_positions_point_at_the_closing_tag() {
    let events = reader::read_events("<root>\n  <a>\n  </a>\n</root>").expect("events");

    let positions: Vec<(u64, u64)> = events
        .iter()
        .filter_map(|e| match e {
            Event::EndElement { position, .. } => Some((position.line, position.column)),
            _ => None,
        })
        .collect();

    // </a> on line 3 column 3, </root> on line 4 column 1
    assert_eq!(positions, vec![(3, 3), (4, 1)]);
}

#[test]
fn attribute_values_are_unescaped() {
    let events = reader::read_events(r#"<e name="a &amp; b"/>"#).expect("events");
    match &events[0] {
        Event::StartElement { attributes, .. } => {
            assert_eq!(attributes[0], ("name".to_string(), "a & b".to_string()));
        }
        other => panic!("expected a start element, got {:?}", other),
    }
}

#[test]
fn default_namespace_applies_to_elements() {
    let events = reader::read_events(r#"<schema xmlns="urn:default"/>"#).expect("events");
    match events
        .iter()
        .find(|e| matches!(e, Event::StartElement { .. }))
        .expect("start event")
    {
        Event::StartElement { uri, local_name, .. } => {
            assert_eq!(uri.as_deref(), Some("urn:default"));
            assert_eq!(local_name, "schema");
        }
        _ => unreachable!(),
    }
}

#[test]
fn malformed_xml_is_an_xml_error() {
    match reader::parse_str("<xs:schema xmlns:xs=\"http://www.w3.org/2001/XMLSchema\">") {
        Err(Error::Xml(_)) => {}
        other => panic!("expected an xml error, got {:?}", other),
    }
}

proptest! {
    /// Any maxOccurs greater than one repeats; zero and one never do.
    #[test]
    fn prop_max_occurs_multiplicity(n in 0u64..10_000) {
        let xml = format!(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="T">
                   <xs:sequence>
                     <xs:element name="e" type="xs:string" maxOccurs="{}"/>
                   </xs:sequence>
                 </xs:complexType>
               </xs:schema>"#,
            n
        );
        let schema = reader::parse_str(&xml).expect("schema should compile");
        match schema.get_type("T").expect("type T") {
            TypeTag::ComplexContent(t) => {
                if n == 0 {
                    prop_assert!(t.elements.is_empty());
                } else {
                    prop_assert_eq!(t.elements[0].repeated, n > 1);
                }
            }
            other => prop_assert!(false, "expected complex content, got {:?}", other),
        }
    }
}
