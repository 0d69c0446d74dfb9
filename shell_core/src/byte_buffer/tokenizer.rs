// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Tokenizing algorithms that operate on the content of a [`ByteBuffer`].
//!
//! All three record their results in the buffer's [`TokenTable`] as offsets into the
//! content. The table is rebuilt by every tokenizing call, and emptied by
//! [`ByteBuffer::clear`].
//!
//! A `0` byte always separates tokens, in addition to the configured delimiters. This
//! keeps the algorithms consistent with the C string view after a destructive split has
//! written terminators into the content.

use std::ffi::CStr;

use crate::{BufferError, ByteBuffer, InlineVec};

/// Position of one token inside the content of a [`ByteBuffer`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub offset: usize,
    pub len: usize,
}

impl Token {
    #[must_use]
    pub fn end(&self) -> usize { self.offset + self.len }
}

/// Growable array of [`Token`] slots.
///
/// Growth policy shared by all tokenizing algorithms:
/// - Start with `2 + size / 4` slots, assuming the average token (with its delimiter)
///   is at least 4 bytes long.
/// - Double the number of slots whenever the token count reaches it.
/// - New slots are always zero filled.
#[derive(Debug, Default)]
pub struct TokenTable {
    slots: Vec<Token>,
    count: usize,
}

impl TokenTable {
    /// Drop any previous tokens and size the slots for content of `content_size` bytes.
    ///
    /// # Errors
    ///
    /// [`BufferError::Alloc`] if the slots can't be allocated.
    pub fn reset(&mut self, content_size: usize) -> Result<(), BufferError> {
        self.clear();
        self.grow_to(2 + content_size / 4)
    }

    /// Record `token`, doubling the slots if they are all used.
    ///
    /// # Errors
    ///
    /// [`BufferError::Alloc`] if the slots can't grow.
    pub fn push(&mut self, token: Token) -> Result<(), BufferError> {
        if self.count == self.slots.len() {
            self.grow_to((self.slots.len() * 2).max(2))?;
        }
        if let Some(slot) = self.slots.get_mut(self.count) {
            *slot = token;
            self.count += 1;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.slots = Vec::new();
        self.count = 0;
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Token] { self.slots.get(..self.count).unwrap_or_default() }

    #[must_use]
    pub fn len(&self) -> usize { self.count }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.count == 0 }

    /// Number of allocated slots.
    #[must_use]
    pub fn capacity(&self) -> usize { self.slots.len() }

    fn grow_to(&mut self, slot_count: usize) -> Result<(), BufferError> {
        let additional = slot_count.saturating_sub(self.slots.len());
        self.slots.try_reserve_exact(additional).map_err(|_| {
            BufferError::Alloc {
                requested: slot_count.saturating_mul(size_of::<Token>()),
            }
            .logged()
        })?;
        self.slots.resize(slot_count, Token::default());
        Ok(())
    }
}

/// A nesting aware `{open, close}` pair for [`ByteBuffer::tokenize`]. Delimiters inside
/// the pair don't split the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncapsulationPair {
    pub open: u8,
    pub close: u8,
}

impl EncapsulationPair {
    /// Same byte opens and closes, eg `"` or `'`.
    #[must_use]
    pub fn quote(quote: u8) -> Self { Self { open: quote, close: quote } }

    /// Distinct bytes open and close, and may nest, eg `(` and `)`.
    #[must_use]
    pub fn bracket(open: u8, close: u8) -> Self { Self { open, close } }

    /// End (exclusive) of the encapsulated span that opens at `start`, and whether it was
    /// terminated.
    ///
    /// Depth starts at 1 after the opening byte. The close byte is checked first, so a
    /// quote pair (`open == close`) terminates on its next occurrence. An open byte
    /// (distinct from close) nests one level deeper.
    #[must_use]
    pub fn span_end(&self, bytes: &[u8], start: usize) -> (usize, bool) {
        let mut depth = 1_usize;
        for (index, &byte) in bytes.iter().enumerate().skip(start + 1) {
            if byte == self.close {
                depth -= 1;
                if depth == 0 {
                    return (index + 1, true);
                }
            } else if byte == self.open {
                depth += 1;
            }
        }
        (bytes.len(), false)
    }
}

/// Configuration for [`ByteBuffer::tokenize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizeOptions {
    /// Bytes that separate tokens.
    pub delimiters: Vec<u8>,
    /// Encapsulation pairs, checked in order against the first byte of each token.
    pub pairs: InlineVec<EncapsulationPair>,
    /// A token starting with this prefix ends tokenizing, eg `#` for end of line
    /// comments.
    pub ignore_prefix: Option<Vec<u8>>,
    /// When `true` each token is NUL terminated in place (when followed by a delimiter).
    /// When `false` the content is left intact.
    pub split: bool,
}

impl Default for TokenizeOptions {
    fn default() -> Self {
        Self {
            delimiters: DEFAULT_DELIMITERS.to_vec(),
            pairs: InlineVec::new(),
            ignore_prefix: None,
            split: false,
        }
    }
}

/// Space, tab, carriage return, and line feed.
pub const DEFAULT_DELIMITERS: &[u8] = b" \t\r\n";

impl TokenizeOptions {
    #[must_use]
    pub fn with_delimiters(mut self, delimiters: impl AsRef<[u8]>) -> Self {
        self.delimiters = delimiters.as_ref().to_vec();
        self
    }

    #[must_use]
    pub fn with_pairs(mut self, pairs: impl IntoIterator<Item = EncapsulationPair>) -> Self {
        self.pairs = pairs.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_ignore_prefix(mut self, prefix: impl AsRef<[u8]>) -> Self {
        let prefix = prefix.as_ref();
        self.ignore_prefix = (!prefix.is_empty()).then(|| prefix.to_vec());
        self
    }

    #[must_use]
    pub fn with_split(mut self, split: bool) -> Self {
        self.split = split;
        self
    }

    fn pair_opened_by(&self, byte: u8) -> Option<&EncapsulationPair> {
        self.pairs.iter().find(|pair| pair.open == byte)
    }
}

fn is_delimiter(delimiters: &[u8], byte: u8) -> bool {
    byte == 0 || delimiters.contains(&byte)
}

fn starts_with_prefix(bytes: &[u8], pos: usize, prefix: Option<&[u8]>) -> bool {
    match (prefix, bytes.get(pos..)) {
        (Some(prefix), Some(rest)) => rest.starts_with(prefix),
        _ => false,
    }
}

/// End (exclusive) of the run of non delimiter bytes starting at `pos`.
fn run_end(bytes: &[u8], pos: usize, delimiters: &[u8]) -> usize {
    bytes
        .iter()
        .skip(pos)
        .position(|&byte| is_delimiter(delimiters, byte))
        .map_or(bytes.len(), |len| pos + len)
}

/// Start of the next token at or after `pos`, or `bytes.len()`.
fn skip_delimiters(bytes: &[u8], pos: usize, delimiters: &[u8]) -> usize {
    bytes
        .iter()
        .skip(pos)
        .position(|&byte| !is_delimiter(delimiters, byte))
        .map_or(bytes.len(), |len| pos + len)
}

impl ByteBuffer {
    /// Destructive split on `delimiters`. Each token is NUL terminated in place
    /// (overwriting the delimiter that follows it), so [`Self::token_c_str`] views it as
    /// a C string. Stops early at a token that begins with `ignore_prefix`.
    ///
    /// Returns the number of tokens.
    ///
    /// # Errors
    ///
    /// [`BufferError::Alloc`] if the token slots can't grow.
    pub fn split(
        &mut self,
        delimiters: &[u8],
        ignore_prefix: Option<&[u8]>,
    ) -> Result<usize, BufferError> {
        self.tokens.reset(self.size)?;
        let size = self.size;
        let ignore_prefix = ignore_prefix.filter(|it| !it.is_empty());

        let mut pos = 0;
        loop {
            pos = skip_delimiters(self.as_bytes(), pos, delimiters);
            if pos >= size || starts_with_prefix(self.as_bytes(), pos, ignore_prefix) {
                break;
            }

            let end = run_end(self.as_bytes(), pos, delimiters);
            self.tokens.push(Token { offset: pos, len: end - pos })?;

            if let Some(terminator) = self.as_bytes_mut().get_mut(end) {
                *terminator = 0;
            }
            pos = end + 1;
        }

        Ok(self.tokens.len())
    }

    /// Non destructive scan that records the start (and length) of every maximal run of
    /// non delimiter bytes. The content is not modified.
    ///
    /// Returns the number of tokens.
    ///
    /// # Errors
    ///
    /// [`BufferError::Alloc`] if the token slots can't grow.
    pub fn mark(&mut self, delimiters: &[u8]) -> Result<usize, BufferError> {
        self.tokens.reset(self.size)?;
        let size = self.size;

        let mut pos = 0;
        loop {
            pos = skip_delimiters(self.as_bytes(), pos, delimiters);
            if pos >= size {
                break;
            }
            let end = run_end(self.as_bytes(), pos, delimiters);
            self.tokens.push(Token { offset: pos, len: end - pos })?;
            pos = end;
        }

        Ok(self.tokens.len())
    }

    /// General tokenizer with encapsulation, configured by `options`.
    ///
    /// From the save point (the end of the previous token) it:
    /// 1. Skips delimiters.
    /// 2. Stops if the next token begins with [`TokenizeOptions::ignore_prefix`].
    /// 3. If the token begins with the open byte of one of
    ///    [`TokenizeOptions::pairs`], the token is the whole encapsulated span including
    ///    the open and close bytes (see [`EncapsulationPair::span_end`]). An
    ///    unterminated span is logged and runs to the end of the content.
    /// 4. Otherwise the token ends at the next delimiter, as in [`Self::split`].
    ///
    /// With [`TokenizeOptions::split`] each token that is followed by a delimiter gets
    /// that delimiter replaced by a NUL. Bytes that immediately follow a closed span
    /// start the next token, and are never overwritten.
    ///
    /// ```
    /// use shell_core::{ByteBuffer, EncapsulationPair, TokenizeOptions};
    /// let mut buf = ByteBuffer::try_from(r#"echo "a b" (c (d))"#).unwrap();
    /// let options = TokenizeOptions::default().with_pairs([
    ///     EncapsulationPair::quote(b'"'),
    ///     EncapsulationPair::bracket(b'(', b')'),
    /// ]);
    /// assert_eq!(buf.tokenize(&options).unwrap(), 3);
    /// assert_eq!(buf.token_bytes(1), Some(&b"\"a b\""[..]));
    /// assert_eq!(buf.token_bytes(2), Some(&b"(c (d))"[..]));
    /// ```
    ///
    /// Returns the number of tokens.
    ///
    /// # Errors
    ///
    /// [`BufferError::Alloc`] if the token slots can't grow.
    pub fn tokenize(&mut self, options: &TokenizeOptions) -> Result<usize, BufferError> {
        self.tokens.reset(self.size)?;
        let size = self.size;
        let delimiters = options.delimiters.as_slice();
        let ignore_prefix = options.ignore_prefix.as_deref();

        let mut save_point = 0;
        loop {
            let pos = skip_delimiters(self.as_bytes(), save_point, delimiters);
            if pos >= size || starts_with_prefix(self.as_bytes(), pos, ignore_prefix) {
                break;
            }

            let first_byte = self.as_bytes().get(pos).copied().unwrap_or_default();
            let end = match options.pair_opened_by(first_byte) {
                Some(pair) => {
                    let (end, terminated) = pair.span_end(self.as_bytes(), pos);
                    if !terminated {
                        tracing::warn!(
                            offset = pos,
                            open = %char::from(pair.open),
                            close = %char::from(pair.close),
                            "unterminated encapsulation, token runs to end of buffer"
                        );
                    }
                    end
                }
                None => run_end(self.as_bytes(), pos, delimiters),
            };

            self.tokens.push(Token { offset: pos, len: end - pos })?;
            save_point = end;

            if options.split {
                let content = self.as_bytes_mut();
                if let Some(next) = content.get_mut(end)
                    && is_delimiter(delimiters, *next)
                {
                    *next = 0;
                    save_point = end + 1;
                }
            }
        }

        Ok(self.tokens.len())
    }

    /// Tokens found by the most recent tokenizing call.
    #[must_use]
    pub fn tokens(&self) -> &[Token] { self.tokens.as_slice() }

    /// Content of token `index`.
    #[must_use]
    pub fn token_bytes(&self, index: usize) -> Option<&[u8]> {
        let token = self.tokens.as_slice().get(index)?;
        self.as_bytes().get(token.offset..token.end())
    }

    /// Token `index` viewed as a C string, ie up to the next NUL (which is the in place
    /// terminator after [`Self::split`], or the hidden terminator).
    #[must_use]
    pub fn token_c_str(&self, index: usize) -> Option<&CStr> {
        let token = self.tokens.as_slice().get(index)?;
        CStr::from_bytes_until_nul(self.data.get(token.offset..)?).ok()
    }

    /// Content of every token, in order.
    pub fn token_iter(&self) -> impl Iterator<Item = &[u8]> {
        self.tokens
            .as_slice()
            .iter()
            .filter_map(|token| self.as_bytes().get(token.offset..token.end()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect(buf: &ByteBuffer) -> Vec<String> {
        buf.token_iter()
            .map(|it| String::from_utf8_lossy(it).into_owned())
            .collect()
    }

    fn shell_options() -> TokenizeOptions {
        TokenizeOptions::default()
            .with_delimiters(" ")
            .with_pairs([
                EncapsulationPair::quote(b'"'),
                EncapsulationPair::bracket(b'(', b')'),
            ])
    }

    #[test]
    fn test_token_table_growth_policy() {
        let mut table = TokenTable::default();
        table.reset(8).unwrap();
        assert_eq!(table.capacity(), 4);

        for offset in 0..5 {
            table.push(Token { offset, len: 1 }).unwrap();
        }
        assert_eq!(table.len(), 5);
        assert_eq!(table.capacity(), 8);

        table.reset(0).unwrap();
        assert_eq!(table.capacity(), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_split_is_destructive() {
        let mut buf = ByteBuffer::try_from("set  name value").unwrap();
        assert_eq!(buf.split(b" ", None).unwrap(), 3);
        assert_eq!(collect(&buf), vec!["set", "name", "value"]);
        assert_eq!(buf.as_bytes(), b"set\0 name\0value");
        assert_eq!(buf.token_c_str(1), Some(c"name"));
        assert_eq!(buf.token_c_str(2), Some(c"value"));
        assert_eq!(buf.as_c_str(), c"set");
    }

    #[test]
    fn test_split_stops_at_ignore_prefix() {
        let mut buf = ByteBuffer::try_from("keep # comment ignored").unwrap();
        assert_eq!(buf.split(b" ", Some(b"#")).unwrap(), 1);
        assert_eq!(collect(&buf), vec!["keep"]);
    }

    #[test]
    fn test_split_many_tokens_grows_table() {
        let mut buf = ByteBuffer::try_from("a b c d e f g h i j k").unwrap();
        assert_eq!(buf.split(b" ", None).unwrap(), 11);
        assert_eq!(buf.token_bytes(10), Some(&b"k"[..]));
        assert_eq!(buf.token_bytes(11), None);
    }

    #[test]
    fn test_mark_is_not_destructive() {
        let mut buf = ByteBuffer::try_from("  alpha\tbeta  gamma").unwrap();
        assert_eq!(buf.mark(b" \t").unwrap(), 3);
        assert_eq!(
            buf.tokens(),
            &[
                Token { offset: 2, len: 5 },
                Token { offset: 8, len: 4 },
                Token { offset: 14, len: 5 },
            ]
        );
        assert_eq!(buf.as_bytes(), b"  alpha\tbeta  gamma");
    }

    #[test]
    fn test_mark_only_delimiters() {
        let mut buf = ByteBuffer::try_from("   ").unwrap();
        assert_eq!(buf.mark(b" ").unwrap(), 0);
        let mut empty = ByteBuffer::new();
        assert_eq!(empty.mark(b" ").unwrap(), 0);
    }

    #[test]
    fn test_tokenize_quotes_and_nested_brackets() {
        let mut buf =
            ByteBuffer::try_from(r#"cmd "quoted arg" (nested (paren) expr) tail"#).unwrap();
        assert_eq!(buf.tokenize(&shell_options()).unwrap(), 4);
        assert_eq!(
            collect(&buf),
            vec!["cmd", r#""quoted arg""#, "(nested (paren) expr)", "tail"]
        );
    }

    #[test]
    fn test_tokenize_ignore_prefix() {
        let mut buf = ByteBuffer::try_from("keep # comment ignored").unwrap();
        let options = shell_options().with_ignore_prefix("#");
        assert_eq!(buf.tokenize(&options).unwrap(), 1);
        assert_eq!(collect(&buf), vec!["keep"]);
    }

    #[test]
    fn test_tokenize_unterminated_takes_rest() {
        let mut buf = ByteBuffer::try_from(r#"say "never closed here"#).unwrap();
        assert_eq!(buf.tokenize(&shell_options()).unwrap(), 2);
        assert_eq!(collect(&buf), vec!["say", r#""never closed here"#]);

        let mut buf = ByteBuffer::try_from("eval (a (b) c").unwrap();
        assert_eq!(buf.tokenize(&shell_options()).unwrap(), 2);
        assert_eq!(collect(&buf), vec!["eval", "(a (b) c"]);
    }

    #[test]
    fn test_tokenize_split_mode() {
        let mut buf = ByteBuffer::try_from(r#"run "a b" (x)"#).unwrap();
        let options = shell_options().with_split(true);
        assert_eq!(buf.tokenize(&options).unwrap(), 3);
        assert_eq!(buf.as_bytes(), b"run\0\"a b\"\0(x)");
        assert_eq!(buf.token_c_str(1), Some(c"\"a b\""));
        assert_eq!(buf.token_c_str(2), Some(c"(x)"));
    }

    #[test]
    fn test_tokenize_scan_mode_leaves_content() {
        let input = r#"run "a b" (x)"#;
        let mut buf = ByteBuffer::try_from(input).unwrap();
        buf.tokenize(&shell_options()).unwrap();
        assert_eq!(buf.as_str(), Some(input));
    }

    #[test]
    fn test_tokenize_glued_span_starts_next_token() {
        let mut buf = ByteBuffer::try_from(r#""ab"cd ef"#).unwrap();
        let options = shell_options().with_split(true);
        assert_eq!(buf.tokenize(&options).unwrap(), 3);
        assert_eq!(collect(&buf), vec![r#""ab""#, "cd", "ef"]);
    }

    #[test]
    fn test_tokenize_again_invalidates_previous_tokens() {
        let mut buf = ByteBuffer::try_from("a b c").unwrap();
        buf.tokenize(&shell_options()).unwrap();
        assert_eq!(buf.tokens().len(), 3);
        buf.assign(b"single").unwrap();
        buf.tokenize(&shell_options()).unwrap();
        assert_eq!(collect(&buf), vec!["single"]);
    }
}
