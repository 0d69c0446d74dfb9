// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{ffi::CStr, fmt::{self, Debug}};

use crate::{BufferError, TokenTable};

/// A growable, exclusively owned byte array plus its logical size.
///
/// # Hidden terminator
///
/// Whenever the backing storage is allocated it holds `size + 1` bytes, and the byte at
/// `size` is always `0` once a mutating call returns. This lets the same storage be
/// viewed two ways without a second representation:
/// - [`Self::as_bytes`] - the raw content, `size` bytes long, may contain `0` bytes.
/// - [`Self::as_c_str`] - the content up to the first `0` byte.
///
/// An empty buffer that has never been resized away from zero does not allocate.
///
/// # Ownership
///
/// The buffer also owns:
/// - the [`TokenTable`] filled in by the most recent tokenizing call (see
///   [`Self::split`], [`Self::mark`], [`Self::tokenize`]). These are offsets into the
///   content, not copies.
/// - a lazily created scratch [`ByteBuffer`] used as working space, eg by
///   [`Self::hexdump`].
///
/// All of these are scrubbed and released when the buffer is dropped.
///
/// This struct is not internally synchronized. Share it across threads only while
/// holding a lock that guards it (this is what [`crate::Console`] does for its double
/// buffer).
#[derive(Default)]
pub struct ByteBuffer {
    pub(crate) data: Vec<u8>,
    pub(crate) size: usize,
    pub(crate) tokens: TokenTable,
    pub(crate) scratch: Option<Box<ByteBuffer>>,
}

impl ByteBuffer {
    /// Empty buffer, nothing is allocated.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Buffer holding `size` zero bytes.
    ///
    /// # Errors
    ///
    /// [`BufferError::Alloc`] if the storage can't be allocated.
    pub fn try_with_size(size: usize) -> Result<Self, BufferError> {
        let mut it = Self::new();
        it.resize(size)?;
        Ok(it)
    }

    /// Logical length in bytes, excluding the hidden terminator.
    #[must_use]
    pub fn size(&self) -> usize { self.size }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.size == 0 }

    /// `true` once storage has been allocated (the hidden terminator exists).
    #[must_use]
    pub fn is_allocated(&self) -> bool { !self.data.is_empty() }

    /// Raw content view.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] { self.data.get(..self.size).unwrap_or_default() }

    /// Mutable raw content view. The hidden terminator is not part of this slice, so it
    /// can't be clobbered through it.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let size = self.size;
        self.data.get_mut(..size).unwrap_or_default()
    }

    /// NUL terminated view of the content. Stops at the first `0` byte, which is the
    /// hidden terminator unless the content itself contains one (eg after
    /// [`Self::split`]).
    #[must_use]
    pub fn as_c_str(&self) -> &CStr {
        CStr::from_bytes_until_nul(&self.data).unwrap_or(c"")
    }

    /// UTF-8 view of the content, if it is valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> { std::str::from_utf8(self.as_bytes()).ok() }

    /// Lossy UTF-8 view of the content.
    #[must_use]
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }

    /// Reallocate the backing storage to hold exactly `new_size` bytes of content plus
    /// the hidden terminator. Bytes added by growing are zero filled. Bytes removed by
    /// shrinking are scrubbed before they are released. Resizing to the current size is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// [`BufferError::Alloc`] (logged) if the storage can't grow. The content is left
    /// untouched in that case, however the caller should consider the buffer unusable
    /// for whatever needed the extra room.
    pub fn resize(&mut self, new_size: usize) -> Result<(), BufferError> {
        if new_size == self.size { return Ok(()); }

        let total = new_size
            .checked_add(1)
            .ok_or_else(|| BufferError::Alloc { requested: usize::MAX }.logged())?;

        if total > self.data.len() {
            let additional = total - self.data.len();
            self.data
                .try_reserve_exact(additional)
                .map_err(|_| BufferError::Alloc { requested: total }.logged())?;
            self.data.resize(total, 0);
        } else {
            if let Some(dropped) = self.data.get_mut(total..) {
                dropped.fill(0);
            }
            self.data.truncate(total);
            self.data.shrink_to(total);
        }

        if let Some(terminator) = self.data.get_mut(new_size) {
            *terminator = 0;
        }
        self.size = new_size;

        Ok(())
    }

    /// Replace the content with `bytes`.
    ///
    /// # Errors
    ///
    /// [`BufferError::Alloc`] if the storage can't grow, the content is unchanged.
    pub fn assign(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        self.resize(bytes.len())?;
        self.as_bytes_mut().copy_from_slice(bytes);
        Ok(())
    }

    /// Extend the content with `bytes`.
    ///
    /// # Errors
    ///
    /// [`BufferError::Alloc`] if the storage can't grow, the content is unchanged.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        let old_size = self.size;
        let new_size = old_size
            .checked_add(bytes.len())
            .ok_or_else(|| BufferError::Alloc { requested: usize::MAX }.logged())?;
        self.resize(new_size)?;
        if let Some(tail) = self.data.get_mut(old_size..new_size) {
            tail.copy_from_slice(bytes);
        }
        Ok(())
    }

    /// Scrub and release the content, the tokens and the scratch buffer. The buffer is
    /// back to its freshly created (unallocated) state.
    pub fn clear(&mut self) {
        self.data.fill(0);
        self.data = Vec::new();
        self.size = 0;
        self.tokens.clear();
        self.scratch = None;
    }

    /// Independent buffer with identical content. Tokens and scratch space are not
    /// carried over.
    ///
    /// # Errors
    ///
    /// [`BufferError::Alloc`] if the copy can't be allocated.
    pub fn copy(&self) -> Result<Self, BufferError> {
        let mut it = Self::new();
        it.assign(self.as_bytes())?;
        Ok(it)
    }

    /// Lazily created working space owned by this buffer.
    pub(crate) fn scratch_mut(&mut self) -> &mut ByteBuffer {
        self.scratch.get_or_insert_with(Box::default)
    }
}

impl Drop for ByteBuffer {
    fn drop(&mut self) { self.data.fill(0); }
}

impl PartialEq for ByteBuffer {
    fn eq(&self, other: &Self) -> bool { self.as_bytes() == other.as_bytes() }
}

impl Eq for ByteBuffer {}

impl Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("size", &self.size)
            .field("content", &String::from_utf8_lossy(self.as_bytes()))
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

impl TryFrom<&[u8]> for ByteBuffer {
    type Error = BufferError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let mut it = Self::new();
        it.assign(bytes)?;
        Ok(it)
    }
}

impl TryFrom<&str> for ByteBuffer {
    type Error = BufferError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Self::try_from(text.as_bytes())
    }
}

/// Appends. Use [`crate::buf_print!`] to replace the content with exactly sized
/// formatted output instead.
impl fmt::Write for ByteBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s.as_bytes()).map_err(|_| fmt::Error)
    }
}
