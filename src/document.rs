use crate::{
    cursor::TextBuffer,
    element::Element,
    error::XmlResult,
    parser::{ParseOptions, Parser},
    visitor,
};
use std::{
    io::{Read, Write},
    path::Path,
};

/// An XML document that has been parsed into a tree of elements.
///
/// Things to note:
/// - The source is flattened first: each line is trimmed and the lines are joined
/// - `<?...?>` and `<!...>` constructs (declarations, comments, doctypes) are skipped
/// - Element attributes can have duplicates, but `Element::get_attribute` will only return the last one defined
/// - Anything after the root element is ignored
/// - The parser does not recover from syntax errors; the first one is returned
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// The root of the tree, or `None` if the source contained no tags.
    pub root: Option<Element>,
}
impl Document {
    /// Parses a document from the given source string.
    ///
    /// # Errors
    /// Returns errors if the XML is invalid
    ///
    /// # Example
    /// ```rust
    /// use xmlast::Document;
    /// let src = r#"<test><test2 id="1">test</test2></test>"#;
    ///
    /// let doc = Document::parse_str(src).unwrap();
    /// let root = doc.root().unwrap();
    /// assert_eq!(root.name(), "test");
    /// assert_eq!(root.children()[0].get_attribute("id").unwrap().value, "1");
    /// ```
    pub fn parse_str(source: &str) -> XmlResult<Self> {
        Self::parse_with_options(source, ParseOptions::default())
    }

    /// Parses a document from the given source string, with custom options.
    ///
    /// # Errors
    /// Returns errors if the XML is invalid
    pub fn parse_with_options(source: &str, options: ParseOptions) -> XmlResult<Self> {
        Self::parse_buffer(&TextBuffer::new(source), options)
    }

    /// Reads a document from a reader.
    ///
    /// # Errors
    /// Returns errors if reading fails, or if the XML is invalid
    pub fn from_reader<R: Read>(reader: R, options: ParseOptions) -> XmlResult<Self> {
        let buffer = TextBuffer::from_reader(reader)?;
        Self::parse_buffer(&buffer, options)
    }

    /// Reads a document from a file.
    ///
    /// Errors carry the path of the file.
    ///
    /// # Errors
    /// Returns errors if the file cannot be read, or if the XML is invalid
    pub fn open(path: impl AsRef<Path>, options: ParseOptions) -> XmlResult<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "opening document");

        std::fs::File::open(path)
            .map_err(Into::into)
            .and_then(|file| Self::from_reader(file, options))
            .map_err(|e| e.with_path(path.to_path_buf()))
    }

    fn parse_buffer(buffer: &TextBuffer, options: ParseOptions) -> XmlResult<Self> {
        tracing::debug!(len = buffer.len(), ?options, "parsing document");
        let root = Parser::new(buffer.as_str(), options).parse()?;

        if let Some(root) = &root {
            tracing::debug!(root = root.name(), elements = root.walk().count(), "parsed document");
        }
        Ok(Self { root })
    }

    /// Returns the root element, if any.
    #[must_use]
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    /// Releases the document and its whole tree.
    pub fn release(self) {
        drop(self);
    }

    /// Creates the indented tree dump of this document.
    ///
    /// If a filter is given, only elements it accepts are listed.
    ///
    /// # Example
    /// ```rust
    /// use xmlast::{Document, tag_name_filter};
    ///
    /// let doc = Document::parse_str("<a><p>one</p><b><p/></b></a>").unwrap();
    /// let dump = doc.dump(Some(&tag_name_filter("p")));
    /// assert_eq!(dump, "|   Element: p\n|      Text: one\n|   |   Element: p\n");
    /// ```
    #[must_use]
    pub fn dump(&self, filter: Option<&dyn Fn(&Element) -> bool>) -> String {
        visitor::dump_tree(self.root(), filter)
    }

    /// Writes the indented tree dump of this document to the given writer.
    ///
    /// See [`Document::dump`] for more details.
    ///
    /// # Errors
    /// Fails if the writer fails.
    pub fn write_dump<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        filter: Option<&dyn Fn(&Element) -> bool>,
    ) -> std::io::Result<()> {
        visitor::write_tree(writer, self.root(), filter)
    }

    /// Create a formatted XML string from this document.
    ///
    /// `tab_char` is used to indent the XML. If `None`, a tab is used.
    /// A document without a root gives an empty string.
    ///
    /// # Errors
    /// Can fail if the output is not valid UTF-8.
    ///
    /// # Example
    /// ```rust
    /// use xmlast::Document;
    /// const SRC: &str = "<test><test2>test</test2></test>";
    ///
    /// let doc = Document::parse_str(SRC).unwrap();
    ///
    /// let formatted = doc.to_xml(Some("    ")).unwrap();
    /// assert_eq!(formatted, "<test>\n    <test2>test</test2>\n</test>\n");
    /// ```
    pub fn to_xml(&self, tab_char: Option<&str>) -> std::io::Result<String> {
        let mut buffer = vec![];
        self.to_xml_with_writer(&mut buffer, tab_char)?;

        let buffer = String::from_utf8(buffer).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Failed to convert to UTF-8: {e}"),
            )
        })?;
        Ok(buffer)
    }

    /// Write this document as a formatted XML string using the given writer.
    ///
    /// See [`Document::to_xml`] for more details.
    ///
    /// # Errors
    /// Fails if the writer fails.
    pub fn to_xml_with_writer<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        tab_char: Option<&str>,
    ) -> std::io::Result<()> {
        match self.root() {
            Some(root) => crate::to_xml::write_xml(writer, root, tab_char),
            None => Ok(()),
        }
    }
}
