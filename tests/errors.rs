use xmlast::{Document, XmlError, XmlErrorKind};

fn parse_err(src: &str) -> XmlError {
    match Document::parse_str(src) {
        Ok(doc) => panic!("Expected an error, got {doc:?}"),
        Err(e) => e,
    }
}

#[test]
fn test_tag_mismatch() {
    let err = parse_err("<a>\n  <b>\n  </c>\n</a>");
    match &err.kind {
        XmlErrorKind::TagMismatch { open, close } => {
            assert_eq!(open, "b");
            assert_eq!(close, "c");
        }
        other => panic!("Unexpected error: {other}"),
    }

    let message = err.to_string();
    assert!(message.contains("'<c>'"));
    assert!(message.contains("'<b>'"));
    assert!(message.ends_with("\t</c>\n\t   ^~~~~\n"));
}

#[test]
fn test_missing_closing_quote() {
    let err = parse_err(r#"<a x="1>text</a>"#);
    assert!(matches!(&err.kind, XmlErrorKind::MissingClosingQuote(key) if key == "x"));
    assert_eq!(err.context.excerpt, r#"<a x="1>"#);
    assert_eq!(err.context.column, 7);
}

#[test]
fn test_missing_opening_quote() {
    let err = parse_err("<a x=1></a>");
    assert!(matches!(err.kind, XmlErrorKind::MissingOpeningQuote(_)));
}

#[test]
fn test_missing_attribute_value() {
    let err = parse_err("<a checked></a>");
    assert!(matches!(&err.kind, XmlErrorKind::MissingAttributeValue(key) if key == "checked"));
}

#[test]
fn test_unclosed_root() {
    let err = parse_err("<root><child/>");
    assert!(matches!(&err.kind, XmlErrorKind::UnclosedTag(name) if name == "root"));
    assert_eq!(err.context.offset, 0);
}

#[test]
fn test_unexpected_eof() {
    let err = parse_err("<root>");
    assert!(matches!(err.kind, XmlErrorKind::UnexpectedEof));
}

#[test]
fn test_declaration_does_not_leak() {
    let doc = Document::parse_str(r#"<?xml version="1.0"?><!-- <x> --><a>text</a>"#).unwrap();
    let root = doc.root().unwrap();
    assert_eq!(root.name(), "a");
    assert_eq!(root.text(), Some("text"));
    assert!(root.children().is_empty());
}
