use super::consumer::{Shape, render, render_from};
use crate::{
    EventList, ReaderError, ReaderOptions, StartTag, SyntaxError, Token, XmlAttribute, XmlEvent,
    XmlName, XmlReader,
};

fn skip_root() -> ReaderOptions {
    ReaderOptions {
        skip_root: true,
        ..Default::default()
    }
}

#[test]
fn shape_mismatch_reports_both_tokens() {
    let shape = Shape::Object(&[("b", Shape::Object(&[]))]);
    let err = render(r"<a><b>x</b></a>", skip_root(), shape).unwrap_err();
    assert!(
        matches!(
            err,
            ReaderError::Syntax(SyntaxError::StateMismatch {
                expected: Token::BeginObject,
                actual: Token::StringValue,
            })
        ),
        "{err}"
    );
    assert_eq!(
        err.to_string(),
        "syntax error: BEGIN_OBJECT expected, but met STRING"
    );
}

#[test]
fn malformed_xml_is_a_syntax_error() {
    let err = render(r"<a><b></a>", skip_root(), Shape::Any).unwrap_err();
    assert!(
        matches!(err, ReaderError::Syntax(SyntaxError::MalformedSource(_))),
        "{err}"
    );
    assert!(err.is_syntax());
}

#[test]
fn truncated_document_is_a_syntax_error() {
    let err = render(r"<a><b>x</b>", skip_root(), Shape::Any).unwrap_err();
    assert!(err.is_syntax(), "{err}");
}

#[test]
fn missing_root_element() {
    let err = render("  ", skip_root(), Shape::Any).unwrap_err();
    assert!(
        matches!(
            err,
            ReaderError::Syntax(SyntaxError::UnsupportedShape { scope: None, .. })
        ),
        "{err}"
    );
}

#[test]
fn text_inside_an_object_array_is_rejected() {
    let err = render(
        r"<r>loose<i/></r>",
        skip_root(),
        Shape::List(&Shape::Any),
    )
    .unwrap_err();
    assert!(
        matches!(
            err,
            ReaderError::Syntax(SyntaxError::UnsupportedShape {
                scope: Some(crate::Scope::InsideArray),
                ..
            })
        ),
        "{err}"
    );
}

#[test]
fn attributes_on_a_primitive_element_are_rejected() {
    let options = ReaderOptions {
        root_array_primitive: true,
        ..skip_root()
    };
    let err = render(
        r#"<r><i k="1">a</i></r>"#,
        options,
        Shape::List(&Shape::Text),
    )
    .unwrap_err();
    assert!(
        matches!(
            err,
            ReaderError::Syntax(SyntaxError::UnsupportedShape {
                scope: Some(crate::Scope::PrimitiveValue),
                ..
            })
        ),
        "{err}"
    );
}

#[test]
fn primitive_root_array_needs_skip_root() {
    let options = ReaderOptions {
        root_array_primitive: true,
        ..Default::default()
    };
    assert!(matches!(
        XmlReader::from_str("<r/>", options),
        Err(ReaderError::Config(_))
    ));
}

#[test]
fn invalid_scalars() {
    let mut reader = XmlReader::from_str(r"<a><f>yes</f><n>4x</n></a>", skip_root()).unwrap();
    reader.begin_object().unwrap();
    reader.next_field_name().unwrap();
    assert!(matches!(
        reader.next_bool(),
        Err(ReaderError::InvalidValue {
            target: "boolean",
            ..
        })
    ));
    reader.next_field_name().unwrap();
    let err = reader.next_number::<i32>().unwrap_err();
    assert_eq!(err.to_string(), "cannot parse <4x> as i32");
}

#[test]
fn scalar_requests_on_containers_are_mismatches() {
    let mut reader = XmlReader::from_str(r"<a><b><c/></b></a>", skip_root()).unwrap();
    reader.begin_object().unwrap();
    reader.next_field_name().unwrap();
    assert!(matches!(
        reader.next_number::<u8>(),
        Err(ReaderError::Syntax(SyntaxError::StateMismatch {
            expected: Token::Number,
            actual: Token::BeginObject,
        }))
    ));
}

#[test]
fn skip_value_refuses_to_skip_a_closing_token() {
    let mut reader = XmlReader::from_str(r"<a/>", skip_root()).unwrap();
    reader.begin_object().unwrap();
    assert!(reader.skip_value().is_err());
}

#[test]
fn source_errors_stop_the_parse() {
    let mut reader = XmlReader::from_str(r"<a><b>1</b><c></a>", skip_root()).unwrap();
    reader.begin_object().unwrap();
    assert_eq!(reader.next_field_name().unwrap(), "b");
    assert_eq!(reader.next_string().unwrap(), "1");
    assert_eq!(reader.next_field_name().unwrap(), "c");
    assert!(reader.next_string().unwrap_err().is_syntax());
}

#[test]
fn prepared_events_drive_the_reader() {
    let events = EventList::new([
        XmlEvent::Start(StartTag {
            name: XmlName::new("a"),
            attributes: alloc::vec![XmlAttribute {
                name: XmlName::prefixed("x", "k"),
                value: "v".into(),
            }],
        }),
        XmlEvent::Start(StartTag {
            name: XmlName::new("b"),
            attributes: alloc::vec![],
        }),
        XmlEvent::Text("one".into()),
        XmlEvent::Text("two".into()),
        XmlEvent::End(XmlName::new("b")),
        XmlEvent::End(XmlName::new("a")),
    ]);
    let options = ReaderOptions {
        namespaces: true,
        ..skip_root()
    };
    let mut reader = XmlReader::new(events, options).unwrap();
    assert_eq!(
        render_from(&mut reader, Shape::Any).unwrap(),
        r#"{"@<x>k":"v","b":"onetwo"}"#
    );
}
