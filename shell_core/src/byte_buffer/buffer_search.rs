// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{BufferError, ByteBuffer, check_range};

impl ByteBuffer {
    /// Offset of the first occurrence of `needle` that starts at or after `start`,
    /// scanning left to right. An empty `needle` matches at `start`.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`] if `start` exceeds the size.
    pub fn find_forward(
        &self,
        start: usize,
        needle: &[u8],
    ) -> Result<Option<usize>, BufferError> {
        check_range(start, 0, self.size)?;
        if needle.is_empty() { return Ok(Some(start)); }

        let haystack = self.as_bytes().get(start..).unwrap_or_default();
        Ok(haystack
            .windows(needle.len())
            .position(|window| window == needle)
            .map(|pos| start + pos))
    }

    /// Offset of the last occurrence of `needle` that starts at or before `start`,
    /// scanning right to left. An empty `needle` matches at `start`.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`] if `start` exceeds the size.
    pub fn find_reverse(
        &self,
        start: usize,
        needle: &[u8],
    ) -> Result<Option<usize>, BufferError> {
        check_range(start, 0, self.size)?;
        if needle.is_empty() { return Ok(Some(start)); }

        // Matches starting at or before `start` may extend past it.
        let end = start.saturating_add(needle.len()).min(self.size);
        let haystack = self.as_bytes().get(..end).unwrap_or_default();
        Ok(haystack.windows(needle.len()).rposition(|window| window == needle))
    }

    /// Offset of the first byte at which `self` and `other` differ, or [`None`] if they
    /// are identical. When one is a prefix of the other, the offset where the shorter
    /// one ends is returned.
    #[must_use]
    pub fn diff_byte(&self, other: &ByteBuffer) -> Option<usize> {
        let lhs = self.as_bytes();
        let rhs = other.as_bytes();
        lhs.iter()
            .zip(rhs.iter())
            .position(|(a, b)| a != b)
            .or_else(|| (lhs.len() != rhs.len()).then(|| lhs.len().min(rhs.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_forward() {
        let buf = ByteBuffer::try_from("abc abc abc").unwrap();
        assert_eq!(buf.find_forward(0, b"abc").unwrap(), Some(0));
        assert_eq!(buf.find_forward(1, b"abc").unwrap(), Some(4));
        assert_eq!(buf.find_forward(9, b"abc").unwrap(), None);
        assert_eq!(buf.find_forward(11, b"c").unwrap(), None);
        assert_eq!(buf.find_forward(0, b"xyz").unwrap(), None);
    }

    #[test]
    fn test_find_reverse() {
        let buf = ByteBuffer::try_from("abc abc abc").unwrap();
        assert_eq!(buf.find_reverse(11, b"abc").unwrap(), Some(8));
        assert_eq!(buf.find_reverse(7, b"abc").unwrap(), Some(4));
        assert_eq!(buf.find_reverse(4, b"abc").unwrap(), Some(4));
        assert_eq!(buf.find_reverse(3, b"abc").unwrap(), Some(0));
        assert_eq!(buf.find_reverse(0, b"bc").unwrap(), None);
    }

    #[test]
    fn test_find_agrees_on_unique_needle() {
        let buf = ByteBuffer::try_from("the quick brown fox").unwrap();
        let forward = buf.find_forward(0, b"brown").unwrap();
        let reverse = buf.find_reverse(buf.size(), b"brown").unwrap();
        assert_eq!(forward, Some(10));
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_find_out_of_bounds() {
        let buf = ByteBuffer::try_from("abc").unwrap();
        assert!(buf.find_forward(4, b"a").is_err());
        assert!(buf.find_reverse(4, b"a").is_err());
    }

    #[test]
    fn test_diff_byte() {
        let a = ByteBuffer::try_from("status: 42%").unwrap();
        let mut copy = a.copy().unwrap();
        assert_eq!(a.diff_byte(&copy), None);

        copy.write_at(b"5", 8).unwrap();
        assert_eq!(a.diff_byte(&copy), Some(8));
    }

    #[test]
    fn test_diff_byte_prefix() {
        let short = ByteBuffer::try_from("abc").unwrap();
        let long = ByteBuffer::try_from("abcdef").unwrap();
        assert_eq!(short.diff_byte(&long), Some(3));
        assert_eq!(long.diff_byte(&short), Some(3));
        assert_eq!(ByteBuffer::new().diff_byte(&long), Some(0));
        assert_eq!(ByteBuffer::new().diff_byte(&ByteBuffer::new()), None);
    }
}
