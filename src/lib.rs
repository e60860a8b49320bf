//! A minimal XML parser producing a tree of elements.
//!
//! The whole input is read into memory, flattened into a single line, and
//! parsed by recursive descent into [`Element`]s carrying a tag name,
//! attributes, text and children.
//!
//! Only `<tag attr="value" attr2='value2'>text<child/></tag>` constructs are
//! understood. Declarations, processing instructions and comments are skipped.
//! There is no support for namespaces, entities, CDATA or validation.
//!
//! ```rust
//! use xmlast::Document;
//!
//! let doc = Document::parse_str(r#"<a><b x="1">hi</b></a>"#).unwrap();
//! print!("{}", doc.dump(None));
//! // Element: a
//! // |   Element: b
//! // |      Key: x; Value: 1
//! // |      Text: hi
//! ```
//!
//! Syntax errors point at the offending tag:
//! ```rust
//! use xmlast::{Document, XmlErrorKind};
//!
//! let err = Document::parse_str("<a><b></c></a>").unwrap_err();
//! assert!(matches!(err.kind, XmlErrorKind::TagMismatch { .. }));
//! eprintln!("{err}");
//! // Tag mismatch: '<c>' is closed, but the last opened tag is '<b>'
//! //     </c>
//! //        ^~~~~
//! ```
#![warn(missing_docs)]

mod document;
pub use document::Document;

mod element;
pub use element::{Attribute, Element};

mod error;
pub use error::{ErrorContext, XmlError, XmlErrorKind, XmlResult};

mod cursor;
pub use cursor::{Cursor, TextBuffer};

pub mod lexer;

mod parser;
pub use parser::{DEFAULT_MAX_DEPTH, ParseOptions, Parser, UnclosedPolicy, parse};

pub mod to_xml;

pub mod vector;
pub use vector::{DynamicArray, VectorError};

mod visitor;
pub use visitor::{INDENT, Walk, dump_tree, tag_name_filter, write_tree};
