// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::Diagnostic;
use std::io;

use crate::{BufferError, ReadlineError};

/// Failures reported by [`crate::Console`].
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConsoleError {
    /// A thread panicked while it held the console lock or one of the streams. The
    /// calling operation aborted before touching the output.
    #[error("console lock is poisoned")]
    #[diagnostic(
        code(shell_core::console::lock_poisoned),
        help("A thread panicked while holding the console lock")
    )]
    LockPoisoned,

    #[error(transparent)]
    #[diagnostic(code(shell_core::console::io))]
    Io(#[from] io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Buffer(#[from] BufferError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Readline(#[from] ReadlineError),

    /// The completion callbacks of the line editor are process wide, and another
    /// console already owns them.
    #[error("completion callbacks are already bound to console #{owner}")]
    #[diagnostic(
        code(shell_core::console::binding_in_use),
        help("Drop the other console, or call unbind_completion_source() on it first")
    )]
    BindingInUse { owner: usize },
}

impl ConsoleError {
    /// Log this error and hand it back.
    #[must_use]
    pub fn logged(self) -> Self {
        tracing::error!(target: "shell_core::console", error = %self, "console operation failed");
        self
    }
}
