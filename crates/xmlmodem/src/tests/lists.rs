use rstest::rstest;

use super::consumer::{Shape, render};
use crate::{ReaderError, ReaderOptions, SyntaxError, Token, XmlReader};

const OBJECTS: Shape = Shape::List(&Shape::Any);
const TEXTS: Shape = Shape::List(&Shape::Text);

fn options(same_name_list: bool, primitive_arrays: bool) -> ReaderOptions {
    ReaderOptions {
        skip_root: true,
        same_name_list,
        primitive_arrays,
        ..Default::default()
    }
}

#[rstest]
#[case::objects(
    r"<r><places><place><name>a</name></place><place><name>b</name></place></places></r>",
    options(false, false),
    Shape::Object(&[("places", OBJECTS)]),
    r#"{"places":[{"name":"a"},{"name":"b"}]}"#
)]
#[case::first_element_with_attributes(
    r#"<r><list><item id="1"/><item id="2"/></list><after>x</after></r>"#,
    options(false, false),
    Shape::Object(&[("list", OBJECTS)]),
    r#"{"list":[{"@id":"1"},{"@id":"2"}],"after":"x"}"#
)]
#[case::text_elements_as_objects(
    r"<r><tags><tag>a</tag><tag>b</tag></tags></r>",
    options(false, false),
    Shape::Object(&[("tags", OBJECTS)]),
    r#"{"tags":[{"$":"a"},{"$":"b"}]}"#
)]
#[case::primitive_elements(
    r"<r><tags><tag>a</tag><tag/><tag>c</tag></tags></r>",
    options(false, true),
    Shape::Object(&[("tags", TEXTS)]),
    r#"{"tags":["a","","c"]}"#
)]
#[case::primitive_arrays_still_allow_objects(
    r"<r><l><e><x>1</x></e><e><x>2</x></e></l></r>",
    options(false, true),
    Shape::Object(&[("l", OBJECTS)]),
    r#"{"l":[{"x":"1"},{"x":"2"}]}"#
)]
#[case::single_text_as_object(
    r"<r><tags>solo</tags></r>",
    options(false, false),
    Shape::Object(&[("tags", OBJECTS)]),
    r#"{"tags":[{"$":"solo"}]}"#
)]
#[case::single_text_as_primitive(
    r"<r><tags>solo</tags></r>",
    options(false, true),
    Shape::Object(&[("tags", TEXTS)]),
    r#"{"tags":["solo"]}"#
)]
#[case::empty_wrapper(
    r"<r><tags/><n>1</n></r>",
    options(false, false),
    Shape::Object(&[("tags", OBJECTS)]),
    r#"{"tags":[],"n":"1"}"#
)]
#[case::repeated_field_reaches_consumer_twice(
    r"<r><b>1</b><b>2</b></r>",
    options(false, true),
    Shape::Object(&[("b", TEXTS)]),
    r#"{"b":["1"],"b":["2"]}"#
)]
fn wrapped_lists(
    #[case] xml: &str,
    #[case] options: ReaderOptions,
    #[case] shape: Shape,
    #[case] expected: &str,
) {
    assert_eq!(render(xml, options, shape).unwrap(), expected);
}

#[rstest]
#[case::primitive_siblings(
    r"<a><b>1</b><b>2</b></a>",
    options(true, true),
    Shape::Object(&[("b", TEXTS)]),
    r#"{"b":["1","2"]}"#
)]
#[case::empty_siblings_are_elements(
    r#"<r><p></p><p id="2"/></r>"#,
    options(true, false),
    Shape::Object(&[("p", OBJECTS)]),
    r#"{"p":[{},{"@id":"2"}]}"#
)]
#[case::name_change_splits_runs(
    r"<r><p1/><p1/><p2/></r>",
    options(true, false),
    Shape::Object(&[("p1", OBJECTS), ("p2", OBJECTS)]),
    r#"{"p1":[{},{}],"p2":[{}]}"#
)]
#[case::text_siblings_as_objects(
    r"<r><b>x</b><b>y</b><c>z</c></r>",
    options(true, false),
    Shape::Object(&[("b", OBJECTS)]),
    r#"{"b":[{"$":"x"},{"$":"y"}],"c":"z"}"#
)]
#[case::object_siblings(
    r"<r><p><n>a</n></p><p><n>b</n></p></r>",
    options(true, false),
    Shape::Object(&[("p", OBJECTS)]),
    r#"{"p":[{"n":"a"},{"n":"b"}]}"#
)]
#[case::siblings_with_attributes(
    r#"<r><p id="1"><n>a</n></p><p id="2"/></r>"#,
    options(true, false),
    Shape::Object(&[("p", OBJECTS)]),
    r#"{"p":[{"@id":"1","n":"a"},{"@id":"2"}]}"#
)]
#[case::nested_runs(
    r"<r><g><i>1</i><i>2</i></g><g><i>3</i></g></r>",
    options(true, true),
    Shape::Object(&[("g", Shape::List(&Shape::Object(&[("i", TEXTS)])))]),
    r#"{"g":[{"i":["1","2"]},{"i":["3"]}]}"#
)]
#[case::run_followed_by_other_field(
    r"<r><b>1</b><b>2</b><c>3</c></r>",
    options(true, true),
    Shape::Object(&[("b", TEXTS)]),
    r#"{"b":["1","2"],"c":"3"}"#
)]
#[case::single_sibling(
    r"<r><b>1</b><c>3</c></r>",
    options(true, true),
    Shape::Object(&[("b", TEXTS)]),
    r#"{"b":["1"],"c":"3"}"#
)]
fn same_name_lists(
    #[case] xml: &str,
    #[case] options: ReaderOptions,
    #[case] shape: Shape,
    #[case] expected: &str,
) {
    assert_eq!(render(xml, options, shape).unwrap(), expected);
}

#[test]
fn root_array_of_objects() {
    let got = render(r"<r><i>a</i><i>b</i></r>", options(false, false), OBJECTS).unwrap();
    assert_eq!(got, r#"[{"$":"a"},{"$":"b"}]"#);
}

#[test]
fn root_array_of_primitives() {
    let options = ReaderOptions {
        root_array_primitive: true,
        ..options(false, false)
    };
    let got = render(r"<r><i>a</i><i/><i>c</i></r>", options, TEXTS).unwrap();
    assert_eq!(got, r#"["a","","c"]"#);
}

#[test]
fn root_with_attributes_is_never_an_array() {
    let err = render(r#"<r k="v"><i/></r>"#, options(false, false), OBJECTS).unwrap_err();
    assert!(
        matches!(
            err,
            ReaderError::Syntax(SyntaxError::StateMismatch {
                expected: Token::BeginArray,
                actual: Token::BeginObject,
            })
        ),
        "{err}"
    );
}

#[test]
fn wrapped_root_is_never_adapted() {
    let err = render(r"<r><i/></r>", ReaderOptions::default(), OBJECTS).unwrap_err();
    assert!(err.is_syntax(), "{err}");
}

#[test]
fn unrequested_list_reads_as_repeated_fields() {
    let xml = r"<r><tags><tag>a</tag><tag>b</tag></tags><n>1</n></r>";
    let shape = Shape::Object(&[("tags", Shape::Any)]);
    // never asked for an array: the wrapper reads as a plain object
    assert_eq!(
        render(xml, options(false, false), shape).unwrap(),
        r#"{"tags":{"tag":"a","tag":"b"},"n":"1"}"#
    );
}

#[test]
fn skip_value_inside_a_same_name_run() {
    let xml = r"<r><b>1</b><b>2</b><c>3</c></r>";
    let mut reader = XmlReader::from_str(xml, options(true, true)).unwrap();
    reader.begin_object().unwrap();
    assert_eq!(reader.next_field_name().unwrap(), "b");
    reader.begin_array().unwrap();
    assert_eq!(reader.next_string().unwrap(), "1");
    reader.skip_value().unwrap();
    assert_eq!(reader.peek().unwrap(), Token::EndArray);
    reader.end_array().unwrap();
    assert_eq!(reader.next_field_name().unwrap(), "c");
    assert_eq!(reader.next_string().unwrap(), "3");
    reader.end_object().unwrap();
    assert_eq!(reader.peek().unwrap(), Token::EndOfStream);
}

#[test]
fn skip_object_member_of_a_same_name_run() {
    let xml = r"<r><g><i>1</i></g><g><i>2</i><j>3</j></g><c>x</c></r>";
    let mut reader = XmlReader::from_str(xml, options(true, true)).unwrap();
    reader.begin_object().unwrap();
    assert_eq!(reader.next_field_name().unwrap(), "g");
    reader.begin_array().unwrap();
    reader.begin_object().unwrap();
    assert_eq!(reader.next_field_name().unwrap(), "i");
    assert_eq!(reader.next_string().unwrap(), "1");
    reader.end_object().unwrap();
    reader.skip_value().unwrap();
    assert!(!reader.has_next().unwrap());
    reader.end_array().unwrap();
    assert_eq!(reader.next_field_name().unwrap(), "c");
    assert_eq!(reader.next_string().unwrap(), "x");
    reader.end_object().unwrap();
}

#[test]
fn skip_members_of_a_wrapped_list() {
    let xml = r"<r><list><item>a</item><item><k>v</k></item></list><n>1</n></r>";
    let mut reader = XmlReader::from_str(xml, options(false, false)).unwrap();
    reader.begin_object().unwrap();
    assert_eq!(reader.next_field_name().unwrap(), "list");
    reader.begin_array().unwrap();
    reader.skip_value().unwrap();
    reader.skip_value().unwrap();
    reader.end_array().unwrap();
    assert_eq!(reader.next_field_name().unwrap(), "n");
    assert_eq!(reader.next_string().unwrap(), "1");
    reader.end_object().unwrap();
}
