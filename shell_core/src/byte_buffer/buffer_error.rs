// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::Diagnostic;

/// Failures reported by [`crate::ByteBuffer`]. None of them leave the buffer partially
/// mutated by the call that returned them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum BufferError {
    /// Growing the backing storage failed. The buffer keeps its previous content, but
    /// callers should treat it as unusable since the operation that needed the memory
    /// could not run.
    #[error("unable to allocate {requested} bytes")]
    #[diagnostic(
        code(shell_core::byte_buffer::alloc),
        help("The process is out of memory, or the requested size overflows")
    )]
    Alloc { requested: usize },

    /// The `offset` and `len` pair does not fit inside the current logical `size`.
    #[error("range [{offset}, {offset}+{len}) is outside of buffer of size {size}")]
    #[diagnostic(code(shell_core::byte_buffer::out_of_bounds))]
    OutOfBounds { offset: usize, len: usize, size: usize },

    /// The [`std::fmt::Display`] implementation of an argument returned an error, or
    /// produced different output when it was run a second time.
    #[error("formatting failed")]
    #[diagnostic(code(shell_core::byte_buffer::format))]
    Format,
}

impl BufferError {
    /// Log this error and hand it back, so it can be used inline in `map_err` and `return
    /// Err(..)`.
    #[must_use]
    pub fn logged(self) -> Self {
        match &self {
            BufferError::Alloc { requested } => {
                tracing::error!(requested, "byte buffer allocation failed");
            }
            BufferError::OutOfBounds { offset, len, size } => {
                tracing::error!(offset, len, size, "byte buffer bounds violation");
            }
            BufferError::Format => {
                tracing::error!("byte buffer formatted write failed");
            }
        }
        self
    }
}

/// Validate that `offset..offset+len` fits in `size`.
///
/// # Errors
///
/// [`BufferError::OutOfBounds`] (logged) if the range doesn't fit, or if `offset + len`
/// overflows.
pub fn check_range(offset: usize, len: usize, size: usize) -> Result<(), BufferError> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(BufferError::OutOfBounds { offset, len, size }.logged()),
    }
}
