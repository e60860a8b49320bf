//! The flattened source text, and the single scan position advanced by the lexer.
use std::io::Read;

/// The whole input document, flattened into one line.
///
/// Every line of the input is trimmed of surrounding whitespace, and the
/// results are concatenated. Whitespace next to a line break therefore
/// never reaches the tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextBuffer(String);
impl TextBuffer {
    /// Flattens the given source string.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self(source.lines().map(str::trim).collect())
    }

    /// Reads a reader to the end, and flattens its contents.
    ///
    /// # Errors
    /// Fails if the reader fails, or if the input is not valid UTF-8.
    pub fn from_reader<R: Read>(mut reader: R) -> std::io::Result<Self> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        Ok(Self::new(&source))
    }

    /// Returns the flattened text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the length of the flattened text in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if len == 0
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl From<&str> for TextBuffer {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}
impl AsRef<str> for TextBuffer {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A byte position into a flattened source string.
///
/// All structural characters in the grammar are ASCII, so every position the
/// cursor stops at is also a char boundary.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'src> {
    src: &'src str,
    pos: usize,
}
impl<'src> Cursor<'src> {
    /// Creates a cursor at the start of `src`.
    #[must_use]
    pub fn new(src: &'src str) -> Self {
        Self { src, pos: 0 }
    }

    /// The text being scanned.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &'src str {
        self.src
    }

    /// The current byte offset.
    #[inline]
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Moves the cursor to `pos`, clamped to the end of the text.
    #[inline]
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.src.len());
    }

    /// Returns true once every byte has been consumed.
    #[inline]
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// The byte under the cursor.
    #[inline]
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    /// The byte `offset` positions after the cursor.
    #[inline]
    #[must_use]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + offset).copied()
    }

    /// Returns the byte at an absolute position.
    #[inline]
    #[must_use]
    pub fn byte_at(&self, pos: usize) -> Option<u8> {
        self.src.as_bytes().get(pos).copied()
    }

    /// Moves one byte forward.
    #[inline]
    pub fn advance(&mut self) {
        self.set_pos(self.pos + 1);
    }

    /// Returns true if the remaining text starts with `prefix`.
    #[must_use]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.src[self.pos..].starts_with(prefix)
    }

    /// Moves past any ASCII whitespace.
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Finds the next occurrence of `byte`, at or after the cursor.
    #[must_use]
    pub fn find(&self, byte: u8) -> Option<usize> {
        self.src.as_bytes()[self.pos..]
            .iter()
            .position(|c| *c == byte)
            .map(|i| i + self.pos)
    }

    /// Finds the next occurrence of `needle`, at or after the cursor.
    #[must_use]
    pub fn find_str(&self, needle: &str) -> Option<usize> {
        self.src[self.pos..].find(needle).map(|i| i + self.pos)
    }

    /// Returns the text between two byte offsets.
    #[inline]
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &'src str {
        &self.src[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_flattens_lines() {
        let buffer = TextBuffer::new("  <a>\n\t  <b>hi </b>  \r\n\n</a>\n");
        assert_eq!(buffer.as_str(), "<a><b>hi </b></a>");
        assert_eq!(buffer.len(), 17);
    }

    #[test]
    fn test_buffer_from_reader() {
        let buffer = TextBuffer::from_reader("<a>\n  text\n</a>".as_bytes()).unwrap();
        assert_eq!(buffer.as_str(), "<a>text</a>");
        assert!(TextBuffer::from_reader("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_cursor_find() {
        let mut cursor = Cursor::new("<a><b>");
        assert_eq!(cursor.find(b'<'), Some(0));
        cursor.advance();
        assert_eq!(cursor.find(b'<'), Some(3));
        assert_eq!(cursor.find(b'!'), None);
        assert_eq!(cursor.find_str("b>"), Some(4));
    }

    #[test]
    fn test_cursor_whitespace_and_eof() {
        let mut cursor = Cursor::new("   x");
        cursor.skip_whitespace();
        assert_eq!(cursor.peek(), Some(b'x'));
        assert_eq!(cursor.pos(), 3);

        cursor.advance();
        assert!(cursor.is_eof());
        assert_eq!(cursor.peek(), None);

        cursor.advance();
        assert_eq!(cursor.pos(), 4);
    }
}
