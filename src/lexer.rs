//! Scanning primitives over a [`Cursor`].
//!
//! Each primitive advances the shared cursor, and returns `None` for a benign
//! empty result (no more tags, no text, no attributes). Structural errors are
//! returned as [`XmlError`]s positioned at the cursor.
use crate::{
    cursor::Cursor,
    element::Attribute,
    error::{ErrorContext, XmlError, XmlErrorKind, XmlResult},
    vector::DynamicArray,
};

/// The lexer for a single parse.
#[derive(Debug)]
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
}
impl<'src> Lexer<'src> {
    /// Creates a lexer positioned at the start of `src`.
    #[must_use]
    pub fn new(src: &'src str) -> Self {
        Self {
            cursor: Cursor::new(src),
        }
    }

    /// The underlying cursor.
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> &Cursor<'src> {
        &self.cursor
    }

    /// The underlying cursor, mutably.
    #[inline]
    pub fn cursor_mut(&mut self) -> &mut Cursor<'src> {
        &mut self.cursor
    }

    /// Builds an error located at the cursor.
    #[must_use]
    pub fn error(&self, kind: XmlErrorKind) -> XmlError {
        self.error_at(kind, self.cursor.pos())
    }

    /// Builds an error located at `offset`.
    #[must_use]
    pub fn error_at(&self, kind: XmlErrorKind, offset: usize) -> XmlError {
        XmlError::new(kind, ErrorContext::new(self.cursor.source(), offset))
    }

    /// Reads a token ending at `terminator` or `>`.
    ///
    /// Leading and trailing whitespace is skipped. A `/>` also ends the token,
    /// so `<a/>` yields `a`. Returns `None` if the token is empty, or if the
    /// text ends before or right after it.
    pub fn read_token(&mut self, terminator: u8) -> Option<&'src str> {
        self.cursor.skip_whitespace();

        let start = self.cursor.pos();
        loop {
            match self.cursor.peek() {
                None => return None,
                Some(c) if c == terminator || c == b'>' => break,
                Some(b'/') if self.cursor.peek_at(1) == Some(b'>') => break,
                Some(_) => self.cursor.advance(),
            }
        }
        let token = self.cursor.slice(start, self.cursor.pos());

        self.cursor.skip_whitespace();
        if token.is_empty() || self.cursor.is_eof() {
            return None;
        }

        Some(token)
    }

    /// Moves to the next real tag, and reads its name.
    ///
    /// `<!...>` and `<?...>` markers are skipped entirely. Closing tags are
    /// returned with their leading `/`. Also returns the offset of the `<`.
    ///
    /// # Errors
    /// Fails if a `<` is not followed by a name, or a marker never ends.
    pub fn read_next_tag_name(&mut self) -> XmlResult<Option<(&'src str, usize)>> {
        loop {
            if self.cursor.is_eof() {
                return Ok(None);
            }

            let Some(start) = self.cursor.find(b'<') else {
                let end = self.cursor.source().len();
                self.cursor.set_pos(end);
                return Ok(None);
            };
            self.cursor.set_pos(start + 1);

            match self.cursor.peek() {
                Some(b'!' | b'?') => self.skip_declaration(start)?,
                _ => {
                    return match self.read_token(b' ') {
                        Some(name) => Ok(Some((name, start))),
                        None => Err(self.error(XmlErrorKind::MissingTagName)),
                    };
                }
            }
        }
    }

    /// Reads text up to the next `<`.
    pub fn read_tag_text(&mut self) -> Option<&'src str> {
        let start = self.cursor.pos();
        let end = self
            .cursor
            .find(b'<')
            .unwrap_or(self.cursor.source().len());
        self.cursor.set_pos(end);

        let text = self.cursor.slice(start, end);
        (!text.is_empty()).then_some(text)
    }

    /// Reads `key="value"` or `key='value'` pairs until the end of the tag.
    ///
    /// # Errors
    /// Fails on a missing `=`, a missing opening or closing quote, or an empty key.
    pub fn read_attribute_list(&mut self) -> XmlResult<Option<DynamicArray<Attribute>>> {
        let mut attributes = DynamicArray::new(0, None)?;

        while let Some(c) = self.cursor.peek() {
            if c == b'>' || c == b'/' {
                break;
            }

            let Some(key) = self.read_token(b'=') else {
                let kind = if self.cursor.is_eof() {
                    XmlErrorKind::UnexpectedEof
                } else {
                    XmlErrorKind::MissingAttributeName
                };
                return Err(self.error(kind));
            };
            let key = key.trim_end();

            if self.cursor.peek() != Some(b'=') {
                return Err(self.error(XmlErrorKind::MissingAttributeValue(key.to_string())));
            }
            self.cursor.advance();
            self.cursor.skip_whitespace();

            let quote = match self.cursor.peek() {
                Some(q @ (b'"' | b'\'')) => q,
                _ => return Err(self.error(XmlErrorKind::MissingOpeningQuote(key.to_string()))),
            };
            self.cursor.advance();

            let value = self.read_token(quote).unwrap_or_default();
            if self.cursor.peek() != Some(quote) {
                return Err(self.error(XmlErrorKind::MissingClosingQuote(key.to_string())));
            }
            self.cursor.advance();
            self.cursor.skip_whitespace();

            attributes.push_back(Attribute::new(key, value))?;
        }

        Ok((!attributes.is_empty()).then_some(attributes))
    }

    /// Finds the `>` ending the current tag.
    #[must_use]
    pub fn find_tag_end(&self) -> Option<usize> {
        self.cursor.find(b'>')
    }

    fn skip_declaration(&mut self, start: usize) -> XmlResult<()> {
        let end = if self.cursor.starts_with("!--") {
            self.cursor.find_str("-->").map(|i| i + 3)
        } else {
            self.cursor.find(b'>').map(|i| i + 1)
        };

        let Some(end) = end else {
            return Err(self.error_at(XmlErrorKind::UnterminatedTag, start));
        };

        tracing::trace!(
            declaration = self.cursor.slice(start, end),
            "skipping declaration"
        );
        self.cursor.set_pos(end);
        Ok(())
    }
}
