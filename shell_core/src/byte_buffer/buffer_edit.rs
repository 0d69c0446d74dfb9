// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{BufferError, ByteBuffer, check_range};

impl ByteBuffer {
    /// Copy `out.len()` bytes starting at `offset` into `out`.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`] if `offset + out.len()` exceeds the size.
    pub fn read_at(&self, out: &mut [u8], offset: usize) -> Result<(), BufferError> {
        check_range(offset, out.len(), self.size)?;
        if let Some(src) = self.as_bytes().get(offset..offset + out.len()) {
            out.copy_from_slice(src);
        }
        Ok(())
    }

    /// Overwrite `bytes.len()` bytes starting at `offset`. Never grows the buffer.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`] if `offset + bytes.len()` exceeds the size.
    pub fn write_at(&mut self, bytes: &[u8], offset: usize) -> Result<(), BufferError> {
        check_range(offset, bytes.len(), self.size)?;
        if let Some(dest) = self.as_bytes_mut().get_mut(offset..offset + bytes.len()) {
            dest.copy_from_slice(bytes);
        }
        Ok(())
    }

    /// Remove leading bytes that belong to `charset`.
    ///
    /// # Errors
    ///
    /// [`BufferError::Alloc`] is only possible in theory, since this shrinks.
    pub fn trim_left(&mut self, charset: &[u8]) -> Result<(), BufferError> {
        let skip = self
            .as_bytes()
            .iter()
            .position(|it| !charset.contains(it))
            .unwrap_or(self.size);
        self.remove(0, skip)
    }

    /// Remove trailing bytes that belong to `charset`. A buffer made up entirely of
    /// trimmable bytes ends up empty.
    ///
    /// # Errors
    ///
    /// [`BufferError::Alloc`] is only possible in theory, since this shrinks.
    pub fn trim_right(&mut self, charset: &[u8]) -> Result<(), BufferError> {
        let keep = self
            .as_bytes()
            .iter()
            .rposition(|it| !charset.contains(it))
            .map_or(0, |last_kept| last_kept + 1);
        self.resize(keep)
    }

    /// [`Self::trim_right`] then [`Self::trim_left`].
    ///
    /// # Errors
    ///
    /// See [`Self::trim_right`].
    pub fn trim(&mut self, charset: &[u8]) -> Result<(), BufferError> {
        self.trim_right(charset)?;
        self.trim_left(charset)
    }

    /// Set every content byte to `byte`. The hidden terminator stays `0`.
    pub fn fill(&mut self, byte: u8) { self.as_bytes_mut().fill(byte); }

    /// Splice `bytes` in at `offset`, shifting the tail right. `offset == size` appends.
    /// Gaps are not allowed.
    ///
    /// # Errors
    ///
    /// - [`BufferError::OutOfBounds`] if `offset` exceeds the size, or the new size
    ///   overflows. Nothing is mutated.
    /// - [`BufferError::Alloc`] if the storage can't grow. Nothing is mutated.
    pub fn insert(&mut self, offset: usize, bytes: &[u8]) -> Result<(), BufferError> {
        check_range(offset, 0, self.size)?;
        let old_size = self.size;
        let new_size = old_size.checked_add(bytes.len()).ok_or_else(|| {
            BufferError::OutOfBounds { offset, len: bytes.len(), size: old_size }.logged()
        })?;

        self.resize(new_size)?;

        let content = self.as_bytes_mut();
        content.copy_within(offset..old_size, offset + bytes.len());
        if let Some(dest) = content.get_mut(offset..offset + bytes.len()) {
            dest.copy_from_slice(bytes);
        }

        Ok(())
    }

    /// Cut `len` bytes out starting at `offset`, shifting the tail left.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`] if `offset + len` exceeds the size. Nothing is
    /// mutated.
    pub fn remove(&mut self, offset: usize, len: usize) -> Result<(), BufferError> {
        check_range(offset, len, self.size)?;
        if len == 0 { return Ok(()); }

        let old_size = self.size;
        self.as_bytes_mut().copy_within(offset + len..old_size, offset);
        self.resize(old_size - len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_read_write_at() {
        let mut buf = ByteBuffer::try_from("0123456789").unwrap();
        let mut out = [0_u8; 3];
        buf.read_at(&mut out, 4).unwrap();
        assert_eq!(&out, b"456");

        buf.write_at(b"ab", 8).unwrap();
        assert_eq!(buf.as_bytes(), b"01234567ab");
    }

    #[test]
    fn test_read_write_out_of_bounds() {
        let mut buf = ByteBuffer::try_from("0123").unwrap();
        let mut out = [0_u8; 3];
        assert_eq!(
            buf.read_at(&mut out, 2),
            Err(BufferError::OutOfBounds { offset: 2, len: 3, size: 4 })
        );
        assert!(buf.write_at(b"xyz", 2).is_err());
        assert!(buf.write_at(b"x", usize::MAX).is_err());
        assert_eq!(buf.as_bytes(), b"0123");
    }

    #[test_case("  hello  ", "hello  ", "  hello", "hello" ; "spaces both sides")]
    #[test_case("hello", "hello", "hello", "hello" ; "nothing to trim")]
    #[test_case("     ", "", "", "" ; "everything trimmable")]
    #[test_case("", "", "", "" ; "empty")]
    #[test_case(" \t x \n", "x \n", " \t x", "x" ; "mixed charset")]
    fn test_trim(input: &str, left: &str, right: &str, both: &str) {
        let charset = b" \t\n";

        let mut buf = ByteBuffer::try_from(input).unwrap();
        buf.trim_left(charset).unwrap();
        assert_eq!(buf.as_str(), Some(left));

        let mut buf = ByteBuffer::try_from(input).unwrap();
        buf.trim_right(charset).unwrap();
        assert_eq!(buf.as_str(), Some(right));

        let mut buf = ByteBuffer::try_from(input).unwrap();
        buf.trim(charset).unwrap();
        assert_eq!(buf.as_str(), Some(both));
    }

    #[test]
    fn test_fill() {
        let mut buf = ByteBuffer::try_from("abc").unwrap();
        buf.fill(b'z');
        assert_eq!(buf.as_bytes(), b"zzz");
        assert_eq!(buf.as_c_str(), c"zzz");

        let mut empty = ByteBuffer::new();
        empty.fill(b'z');
        assert!(empty.is_empty());
        assert!(!empty.is_allocated());
    }

    #[test_case(0)]
    #[test_case(3)]
    #[test_case(6)]
    fn test_insert_then_remove_restores(offset: usize) {
        let mut buf = ByteBuffer::try_from("abcdef").unwrap();
        buf.insert(offset, b"XYZ").unwrap();
        assert_eq!(buf.size(), 9);
        assert_eq!(&buf.as_bytes()[offset..offset + 3], b"XYZ");
        buf.remove(offset, 3).unwrap();
        assert_eq!(buf.as_bytes(), b"abcdef");
        assert_eq!(buf.data[buf.size()], 0);
    }

    #[test]
    fn test_insert_middle() {
        let mut buf = ByteBuffer::try_from("held").unwrap();
        buf.insert(2, b"llo wor").unwrap();
        assert_eq!(buf.as_str(), Some("hello world"));
    }

    #[test]
    fn test_insert_gap_rejected() {
        let mut buf = ByteBuffer::try_from("abc").unwrap();
        assert!(matches!(
            buf.insert(4, b"x"),
            Err(BufferError::OutOfBounds { offset: 4, .. })
        ));
        assert_eq!(buf.as_bytes(), b"abc");
    }

    #[test]
    fn test_remove_out_of_bounds() {
        let mut buf = ByteBuffer::try_from("abc").unwrap();
        assert!(buf.remove(2, 2).is_err());
        assert!(buf.remove(usize::MAX, 2).is_err());
        assert_eq!(buf.as_bytes(), b"abc");
    }
}
