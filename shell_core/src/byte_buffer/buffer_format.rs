// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::{self, Write as _};

use crate::{BufferError, ByteBuffer};

/// Replace the content of a [`ByteBuffer`] with formatted output, sized exactly to fit.
/// Evaluates to `Result<usize, BufferError>` with the number of bytes written.
///
/// ```
/// use shell_core::{ByteBuffer, buf_print};
/// let mut buf = ByteBuffer::new();
/// let written = buf_print!(buf, "{} + {} = {}", 1, 2, 1 + 2).unwrap();
/// assert_eq!(written, 9);
/// assert_eq!(buf.as_bytes(), b"1 + 2 = 3");
/// ```
#[macro_export]
macro_rules! buf_print {
    (
        $buf:expr,
        $($format:tt)*
    ) => {{
        $buf.print(format_args!($($format)*))
    }};
}

/// [`fmt::Write`] sink that only counts the bytes it is handed.
#[derive(Debug, Default)]
pub struct LengthProbe {
    pub len: usize,
}

impl fmt::Write for LengthProbe {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.len = self.len.checked_add(s.len()).ok_or(fmt::Error)?;
        Ok(())
    }
}

/// [`fmt::Write`] sink over a precisely sized slice. Writing past the end is an error.
#[derive(Debug)]
struct SliceWriter<'a> {
    slice: &'a mut [u8],
    pos: usize,
}

impl fmt::Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.pos.checked_add(s.len()).ok_or(fmt::Error)?;
        let dest = self.slice.get_mut(self.pos..end).ok_or(fmt::Error)?;
        dest.copy_from_slice(s.as_bytes());
        self.pos = end;
        Ok(())
    }
}

impl ByteBuffer {
    /// Replace the content with the formatted `args`, using a two pass sizing contract:
    ///
    /// 1. The format is run against a [`LengthProbe`] to learn the exact required
    ///    length.
    /// 2. The format is run again, directly into freshly allocated storage of exactly
    ///    that length (plus the hidden terminator), which then replaces the content.
    ///
    /// The final size is always the formatted length, nothing is truncated and no
    /// capacity is wasted. Since pass 2 never writes into the live content, a failure
    /// can't leave it half overwritten.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// - [`BufferError::Format`] if a [`fmt::Display`] impl fails, or formats to a
    ///   different length the second time.
    /// - [`BufferError::Alloc`] if the storage can't be allocated.
    ///
    /// The content is unchanged when an error is returned.
    pub fn print(&mut self, args: fmt::Arguments<'_>) -> Result<usize, BufferError> {
        // Pass 1: measure.
        let mut probe = LengthProbe::default();
        probe.write_fmt(args).map_err(|_| BufferError::Format.logged())?;
        let required = probe.len;
        let total = required
            .checked_add(1)
            .ok_or_else(|| BufferError::Alloc { requested: usize::MAX }.logged())?;

        // Pass 2: write into precisely sized storage.
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(total)
            .map_err(|_| BufferError::Alloc { requested: total }.logged())?;
        storage.resize(total, 0);

        let mut writer = SliceWriter {
            slice: storage.get_mut(..required).unwrap_or_default(),
            pos: 0,
        };
        let pass_2_ok = writer.write_fmt(args).is_ok() && writer.pos == required;
        if !pass_2_ok {
            storage.fill(0);
            return Err(BufferError::Format.logged());
        }

        // Swap in the new content, the hidden terminator is already in place since the
        // storage was zero filled.
        self.data.fill(0);
        self.data = storage;
        self.size = required;

        Ok(required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fmt::Display;

    #[test]
    fn test_print_grows_to_exact_size() {
        let mut buf = ByteBuffer::new();
        let written = buf_print!(buf, "{}-{}", "abc", 12).unwrap();
        assert_eq!(written, 6);
        assert_eq!(buf.size(), 6);
        assert_eq!(buf.as_bytes(), b"abc-12");
        assert_eq!(buf.data.len(), 7);
        assert_eq!(buf.data[6], 0);
    }

    #[test]
    fn test_print_shrinks_to_exact_size() {
        let mut buf = ByteBuffer::try_from("a much longer piece of content").unwrap();
        let written = buf_print!(buf, "short").unwrap();
        assert_eq!(written, 5);
        assert_eq!(buf.as_bytes(), b"short");
        assert_eq!(buf.data.len(), 6);
    }

    #[test]
    fn test_print_empty_format() {
        let mut buf = ByteBuffer::try_from("stale").unwrap();
        assert_eq!(buf_print!(buf, "").unwrap(), 0);
        assert!(buf.is_empty());
        assert_eq!(buf.as_c_str(), c"");
    }

    struct Failing;

    impl Display for Failing {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result { Err(fmt::Error) }
    }

    #[test]
    fn test_print_failure_leaves_content() {
        let mut buf = ByteBuffer::try_from("keep").unwrap();
        let result = buf_print!(buf, "{}", Failing);
        assert_eq!(result, Err(BufferError::Format));
        assert_eq!(buf.as_bytes(), b"keep");
    }
}
