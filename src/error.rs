//! Error handling for XML parsing
use crate::vector::VectorError;
use std::path::PathBuf;

/// A result type for XML parsing, which can be either a successful value or an error.
pub type XmlResult<T> = std::result::Result<T, XmlError>;

/// An error that occurred while parsing a document.
///
/// Displaying the error prints the message, followed by the offending tag and
/// a caret under the position where parsing stopped:
/// ```text
/// Tag mismatch: '<c>' is closed, but the last opened tag is '<b>'
///     </c>
///        ^~~~~
/// ```
#[derive(Debug)]
pub struct XmlError {
    /// The context of the error
    pub context: Box<ErrorContext>,

    /// The kind of error that occurred while parsing a document
    pub kind: XmlErrorKind,
}
impl XmlError {
    /// Creates a new `XmlError`
    #[must_use]
    pub fn new(kind: XmlErrorKind, context: ErrorContext) -> Self {
        Self {
            context: Box::new(context),
            kind,
        }
    }

    /// Adds a path to the error context.
    #[must_use]
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.context.path = Some(path);
        self
    }

    /// Returns true for errors in reading the input, rather than in its syntax.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self.kind, XmlErrorKind::Io(_))
    }
}
impl std::fmt::Display for XmlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(path) = &self.context.path {
            write!(f, "{}: ", path.display())?;
        }
        writeln!(f, "{}", self.kind)?;
        write!(f, "{}", self.context)
    }
}
impl std::error::Error for XmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}
impl From<std::io::Error> for XmlError {
    fn from(err: std::io::Error) -> Self {
        Self::new(XmlErrorKind::Io(err), ErrorContext::default())
    }
}
impl From<VectorError> for XmlError {
    fn from(err: VectorError) -> Self {
        Self::new(XmlErrorKind::Vector(err), ErrorContext::default())
    }
}

/// The kind of error that occurred while parsing a document.
#[derive(Debug, thiserror::Error)]
pub enum XmlErrorKind {
    /// File ended unexpectedly
    #[error("End of file reached unexpectedly")]
    UnexpectedEof,

    /// A `<` was not followed by a tag name
    #[error("Missing tag name")]
    MissingTagName,

    /// An attribute value had no key before the `=`
    #[error("Missing attribute name")]
    MissingAttributeName,

    /// An attribute key was not followed by `=`
    #[error("Attribute '{0}' has no value")]
    MissingAttributeValue(String),

    /// An attribute value did not start with a quote
    #[error("Missing opening quote for attribute '{0}'")]
    MissingOpeningQuote(String),

    /// An attribute value did not end with its quote
    #[error("Missing closing quote for attribute '{0}'")]
    MissingClosingQuote(String),

    /// A tag was never closed by a `>`
    #[error("Unterminated tag")]
    UnterminatedTag,

    /// A closing tag did not match the last opened tag
    #[error("Tag mismatch: '<{close}>' is closed, but the last opened tag is '<{open}>'")]
    TagMismatch {
        /// The name of the innermost open element
        open: String,

        /// The name found in the closing tag
        close: String,
    },

    /// The input ended while an element was still open
    #[error("Unclosed tag: {0}")]
    UnclosedTag(String),

    /// Elements were nested deeper than [`ParseOptions::max_depth`](crate::ParseOptions::max_depth)
    #[error("Elements nested deeper than {0} levels")]
    TooDeep(usize),

    /// A closing tag appeared where the root element was expected
    #[error("Unexpected closing tag: '</{0}>'")]
    UnexpectedClosingTag(String),

    /// IO error occurred while reading a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Element storage could not be allocated
    #[error("Storage error: {0}")]
    Vector(#[from] VectorError),
}

/// Context describing the error location in the source text.
///
/// Only the tag surrounding the error is kept, not the whole source.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The path to the file that was parsed, if available.
    pub path: Option<PathBuf>,

    /// Byte offset of the error in the flattened source.
    pub offset: usize,

    /// The source from the last `<` at or before the offset, to the first `>` at or after it.
    pub excerpt: String,

    /// Position of the offset within `excerpt`, in characters.
    pub column: usize,
}
impl ErrorContext {
    /// Creates a new `ErrorContext` for a position in the given source.
    #[must_use]
    pub fn new(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let start = source[..offset].rfind('<').unwrap_or(0);

        // The `<` under the offset itself also counts as the start
        let start = if source[offset..].starts_with('<') {
            offset
        } else {
            start
        };
        let end = source[offset..]
            .find('>')
            .map_or(source.len(), |i| offset + i + 1);

        Self {
            path: None,
            offset,
            excerpt: source[start..end].to_string(),
            column: source[start..offset].chars().count(),
        }
    }

    /// Creates a new `ErrorContext` with the given path, source, and offset.
    #[must_use]
    pub fn with_path(path: PathBuf, source: &str, offset: usize) -> Self {
        Self {
            path: Some(path),
            ..Self::new(source, offset)
        }
    }
}
impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.excerpt.is_empty() {
            return Ok(());
        }

        writeln!(f, "\t{}", self.excerpt)?;
        writeln!(f, "\t{}^~~~~", " ".repeat(self.column))
    }
}
