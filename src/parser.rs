//! Recursive-descent construction of the element tree.
use crate::{
    element::Element,
    error::{XmlErrorKind, XmlResult},
    lexer::Lexer,
    vector::DynamicArray,
};

/// What to do when the input ends while an element is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnclosedPolicy {
    /// Fail with [`XmlErrorKind::UnclosedTag`]
    #[default]
    Error,

    /// Accept the element as if it had been closed at the end of the input
    Close,
}

/// Nesting depth accepted by [`ParseOptions::default`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options controlling a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Handling of elements left open at the end of the input.
    pub unclosed: UnclosedPolicy,

    /// Deepest element nesting accepted; the root is at depth 1.
    pub max_depth: usize,
}
impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            unclosed: UnclosedPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
impl ParseOptions {
    /// Sets the handling of elements left open at the end of the input.
    #[must_use]
    pub fn with_unclosed(mut self, unclosed: UnclosedPolicy) -> Self {
        self.unclosed = unclosed;
        self
    }

    /// Sets the deepest element nesting accepted.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// The result of reading one tag.
#[derive(Debug)]
enum Parsed<'src> {
    /// A complete element, with its subtree
    Element(Element),

    /// A closing tag, to be matched by the caller
    Closing(&'src str),
}

/// Builds an element tree from a flattened source string.
///
/// All parse state lives in the parser, so independent parses can run side by side.
#[derive(Debug)]
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    options: ParseOptions,
}
impl<'src> Parser<'src> {
    /// Creates a parser over `src`, which should already be flattened.
    /// See [`crate::TextBuffer`].
    #[must_use]
    pub fn new(src: &'src str, options: ParseOptions) -> Self {
        Self {
            lexer: Lexer::new(src),
            options,
        }
    }

    /// Parses the root element.
    ///
    /// Returns `None` if the source contains no tags. Anything after the root
    /// element is ignored.
    ///
    /// # Errors
    /// Returns the first syntax error found. Any partially built tree is dropped.
    pub fn parse(mut self) -> XmlResult<Option<Element>> {
        let start = self.lexer.cursor().pos();
        match self.build(0)? {
            None => Ok(None),
            Some(Parsed::Element(root)) => Ok(Some(root)),
            Some(Parsed::Closing(name)) => Err(self.lexer.error_at(
                XmlErrorKind::UnexpectedClosingTag(name.to_string()),
                start,
            )),
        }
    }

    /// Reads one tag at `depth` levels below the root's parent.
    fn build(&mut self, depth: usize) -> XmlResult<Option<Parsed<'src>>> {
        let Some((name, offset)) = self.lexer.read_next_tag_name()? else {
            return Ok(None);
        };

        if let Some(name) = name.strip_prefix('/') {
            return Ok(Some(Parsed::Closing(name)));
        }

        if depth >= self.options.max_depth {
            return Err(self
                .lexer
                .error_at(XmlErrorKind::TooDeep(self.options.max_depth), offset));
        }

        let mut element = Element::new(name).with_offset(offset);
        element.set_attribute_list(self.lexer.read_attribute_list()?);

        let Some(end) = self.lexer.find_tag_end() else {
            return Err(self.lexer.error(XmlErrorKind::UnterminatedTag));
        };

        let cursor = self.lexer.cursor_mut();
        if end > 0 && cursor.byte_at(end - 1) == Some(b'/') {
            cursor.set_pos(end + 1);
            tracing::trace!(tag = name, offset, "self-closing element");
            return Ok(Some(Parsed::Element(element)));
        }

        if cursor.byte_at(end + 1).is_none() {
            cursor.set_pos(end);
            return Err(self.lexer.error(XmlErrorKind::UnexpectedEof));
        }
        cursor.set_pos(end + 1);

        if let Some(text) = self.lexer.read_tag_text() {
            element.set_text(text);
        }

        let mut children = DynamicArray::new(0, None)?;
        loop {
            match self.build(depth + 1)? {
                None => match self.options.unclosed {
                    UnclosedPolicy::Error => {
                        return Err(self
                            .lexer
                            .error_at(XmlErrorKind::UnclosedTag(name.to_string()), offset));
                    }
                    UnclosedPolicy::Close => {
                        tracing::warn!(tag = name, offset, "element left open at end of input");
                        break;
                    }
                },

                Some(Parsed::Closing(close)) => {
                    if close == name {
                        break;
                    }

                    return Err(self.lexer.error(XmlErrorKind::TagMismatch {
                        open: name.to_string(),
                        close: close.to_string(),
                    }));
                }

                // Siblings keep accumulating until the closing tag of this element
                Some(Parsed::Element(child)) => children.push_back(child)?,
            }
        }

        tracing::trace!(tag = name, offset, children = children.count(), "element");
        element.set_child_list((!children.is_empty()).then_some(children));
        Ok(Some(Parsed::Element(element)))
    }
}

/// Parses a flattened source string with the given options.
///
/// # Errors
/// Returns the first syntax error found.
pub fn parse(src: &str, options: ParseOptions) -> XmlResult<Option<Element>> {
    Parser::new(src, options).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Attribute;

    fn parse_root(src: &str) -> Element {
        match parse(src, ParseOptions::default()) {
            Ok(Some(root)) => root,
            Ok(None) => panic!("no root element in {src}"),
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn test_nested_element() {
        let root = parse_root(r#"<a><b x="1">hi</b></a>"#);
        assert_eq!(root.name(), "a");
        assert!(root.text().is_none());
        assert_eq!(root.children().len(), 1);

        let b = &root.children()[0];
        assert_eq!(b.name(), "b");
        assert_eq!(b.attributes(), &[Attribute::new("x", "1")]);
        assert_eq!(b.text(), Some("hi"));
        assert!(b.child_list().is_none());
        assert_eq!(b.offset(), 3);
    }

    #[test]
    fn test_self_closing() {
        let root = parse_root("<a/>");
        assert_eq!(root.name(), "a");
        assert!(root.text().is_none());
        assert!(root.child_list().is_none());

        let root = parse_root(r#"<a><img src="x.png" /><br/></a>"#);
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.children()[0].get_attribute("src").unwrap().value, "x.png");
        assert!(root.children()[1].is_empty());
    }

    #[test]
    fn test_siblings_and_text() {
        let root = parse_root("<ul>items<li>one</li><li>two</li><li/></ul>");
        assert_eq!(root.text(), Some("items"));

        let names: Vec<_> = root.children().iter().map(Element::text).collect();
        assert_eq!(names, vec![Some("one"), Some("two"), None]);
    }

    #[test]
    fn test_text_only_before_first_child() {
        let root = parse_root("<p>before<b>bold</b>after</p>");
        assert_eq!(root.text(), Some("before"));
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn test_empty_element_has_no_children() {
        let root = parse_root("<a></a>");
        assert!(root.child_list().is_none());
        assert!(root.text().is_none());
    }

    #[test]
    fn test_declarations_skipped() {
        let root = parse_root(r#"<?xml version="1.0"?><!-- x --><a><!-- <b/> --><c/></a>"#);
        assert_eq!(root.name(), "a");
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].name(), "c");
    }

    #[test]
    fn test_no_tags() {
        assert!(parse("", ParseOptions::default()).unwrap().is_none());
        assert!(parse("just text", ParseOptions::default()).unwrap().is_none());
        assert!(parse("<?xml version='1.0'?>", ParseOptions::default()).unwrap().is_none());
    }

    #[test]
    fn test_trailing_content_ignored() {
        let root = parse_root("<a>x</a><b/>tail");
        assert_eq!(root.name(), "a");
        assert!(root.child_list().is_none());
    }

    #[test]
    fn test_mismatched_tags() {
        let err = parse("<a><b></c></a>", ParseOptions::default()).unwrap_err();
        match &err.kind {
            XmlErrorKind::TagMismatch { open, close } => {
                assert_eq!(open, "b");
                assert_eq!(close, "c");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.context.excerpt, "</c>");
    }

    #[test]
    fn test_missing_closing_quote() {
        let err = parse(r#"<a x="1>"#, ParseOptions::default()).unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::MissingClosingQuote(_)));
    }

    #[test]
    fn test_unterminated_tag() {
        let err = parse(r#"<a x="1""#, ParseOptions::default()).unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::UnterminatedTag));

        let err = parse("<a>", ParseOptions::default()).unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_unclosed_root() {
        let err = parse("<a><b/>text", ParseOptions::default()).unwrap_err();
        assert!(matches!(&err.kind, XmlErrorKind::UnclosedTag(name) if name == "a"));

        let options = ParseOptions::default().with_unclosed(UnclosedPolicy::Close);
        let root = parse("<a><b/>text", options).unwrap().unwrap();
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn test_unexpected_closing_root() {
        let err = parse("</a>", ParseOptions::default()).unwrap_err();
        assert!(matches!(&err.kind, XmlErrorKind::UnexpectedClosingTag(name) if name == "a"));
    }

    #[test]
    fn test_missing_tag_name() {
        let err = parse("<a>< ></a>", ParseOptions::default()).unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::MissingTagName));
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
        let options = ParseOptions::default().with_max_depth(4);

        let root = parse(&nested(4), options).unwrap().unwrap();
        assert_eq!(root.walk().count(), 4);

        let err = parse(&nested(5), options).unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::TooDeep(4)));
        assert_eq!(err.context.offset, 12);

        let err = parse(&nested(200_000), ParseOptions::default()).unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::TooDeep(DEFAULT_MAX_DEPTH)));
    }

    #[test]
    fn test_independent_parsers() {
        let mut first = Parser::new("<a><b/></a>", ParseOptions::default());
        let second = Parser::new("<c/>", ParseOptions::default());

        let c = second.parse().unwrap().unwrap();
        let a = first.build(0).unwrap();
        assert_eq!(c.name(), "c");
        assert!(matches!(a, Some(Parsed::Element(e)) if e.name() == "a"));
    }
}
