// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt, io::Write};

use super::console_impl::ConsoleState;
use crate::{Console, ConsoleError, ERASE_TRIPLE, ERROR_TAG, LINE_TERMINATOR, WARNING_TAG};

/// Level a printed message is mirrored to the log with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
enum Severity {
    Info,
    Warning,
    Error,
}

impl Console {
    /// Format `args` and write it to the output followed by a line terminator. Returns
    /// the number of bytes written, terminator included.
    ///
    /// While another thread is editing a line interactively the message goes above the
    /// prompt, and the line being edited is drawn again below it.
    ///
    /// # Errors
    ///
    /// - [`ConsoleError::LockPoisoned`].
    /// - [`ConsoleError::Buffer`] if formatting fails, nothing is written then.
    /// - [`ConsoleError::Readline`] if writing fails.
    pub fn print(&self, args: fmt::Arguments<'_>) -> Result<usize, ConsoleError> {
        self.print_with_severity(Severity::Info, args)
    }

    /// [`Self::print`] with [`WARNING_TAG`] in front.
    ///
    /// # Errors
    ///
    /// Same as [`Self::print`].
    pub fn warning(&self, args: fmt::Arguments<'_>) -> Result<usize, ConsoleError> {
        let _guard = self.lock()?;
        self.print_with_severity(Severity::Warning, format_args!("{WARNING_TAG}{args}"))
    }

    /// [`Self::print`] with [`ERROR_TAG`] in front.
    ///
    /// # Errors
    ///
    /// Same as [`Self::print`].
    pub fn error(&self, args: fmt::Arguments<'_>) -> Result<usize, ConsoleError> {
        let _guard = self.lock()?;
        self.print_with_severity(Severity::Error, format_args!("{ERROR_TAG}{args}"))
    }

    fn print_with_severity(
        &self,
        severity: Severity,
        args: fmt::Arguments<'_>,
    ) -> Result<usize, ConsoleError> {
        let _guard = self.lock()?;
        let mut state = self.state()?;
        let slot = state.scratch_slot();
        let ConsoleState {
            output,
            buffers,
            editor,
            ..
        } = &mut *state;
        let [first, second] = buffers;
        let buffer = if slot == 0 { first } else { second };

        buffer.print(args)?;
        mirror_to_log(severity, &String::from_utf8_lossy(buffer.as_bytes()));
        buffer.append(LINE_TERMINATOR)?;

        let written = buffer.size();
        let result = editor.print_data(buffer.as_bytes(), &mut **output);
        buffer.clear();
        result?;

        Ok(written)
    }

    /// Incremental redraw of a status line. Only the tail that changed since the
    /// previous call is erased (backspace, space, backspace per byte) and written
    /// again. Nothing is written when the content is unchanged. `None` resets, so that
    /// the next call writes its content verbatim.
    ///
    /// No line terminator is added, the caret stays at the end of the content.
    ///
    /// While another thread is editing a line interactively the caret belongs to the
    /// prompt, so the content can't be redrawn in place. It is printed above the prompt
    /// as a whole line instead, and the next call starts afresh as after a reset.
    ///
    /// ```
    /// use shell_core::{Console, ConsoleConfig, StdoutMock};
    ///
    /// let stdout_mock = StdoutMock::default();
    /// let console = Console::new(
    ///     Box::new(&b""[..]),
    ///     Box::new(stdout_mock.clone()),
    ///     ConsoleConfig::default(),
    /// );
    ///
    /// console.reprint(Some(format_args!("{}%", 10))).unwrap();
    /// console.reprint(Some(format_args!("{}%", 12))).unwrap();
    /// assert_eq!(
    ///     stdout_mock.get_copy_of_buffer_as_string(),
    ///     "10%\x08 \x08\x08 \x082%"
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// - [`ConsoleError::LockPoisoned`].
    /// - [`ConsoleError::Buffer`] if formatting fails, nothing is written then.
    /// - [`ConsoleError::Io`] or [`ConsoleError::Readline`] if writing fails.
    pub fn reprint(&self, args: Option<fmt::Arguments<'_>>) -> Result<(), ConsoleError> {
        let _guard = self.lock()?;
        let mut state = self.state()?;
        let ConsoleState {
            output,
            buffers,
            baseline,
            editor,
        } = &mut *state;

        let Some(args) = args else {
            for buffer in buffers.iter_mut() {
                buffer.clear();
            }
            tracing::trace!(target: "shell_core::console", "reprint reset");
            return Ok(());
        };

        let [first, second] = buffers;
        let (old, new) = if *baseline == 0 {
            (first, second)
        } else {
            (second, first)
        };
        new.print(args)?;

        if editor.is_editing() {
            new.append(LINE_TERMINATOR)?;
            let result = editor.print_data(new.as_bytes(), &mut **output);
            old.clear();
            new.clear();
            result?;
            return Ok(());
        }

        let mut frame = Vec::new();
        if old.is_empty() {
            frame.extend_from_slice(new.as_bytes());
        } else {
            let Some(offset) = old.diff_byte(new) else {
                return Ok(());
            };
            for _ in offset..old.size() {
                frame.extend_from_slice(ERASE_TRIPLE);
            }
            frame.extend_from_slice(new.as_bytes().get(offset..).unwrap_or_default());
        }

        output.write_all(&frame)?;
        output.flush()?;
        *baseline = 1 - *baseline;

        Ok(())
    }

    /// Same as `reprint(None)`.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::LockPoisoned`].
    pub fn reset(&self) -> Result<(), ConsoleError> { self.reprint(None) }

    /// # Errors
    ///
    /// [`ConsoleError::LockPoisoned`], or [`ConsoleError::Io`] if the output fails to
    /// flush.
    pub fn flush(&self) -> Result<(), ConsoleError> {
        let _guard = self.lock()?;
        self.state()?.output.flush()?;
        Ok(())
    }
}

fn mirror_to_log(severity: Severity, message: &str) {
    match severity {
        Severity::Info => {
            tracing::info!(target: "shell_core::console", %severity, message);
        }
        Severity::Warning => {
            tracing::warn!(target: "shell_core::console", %severity, message);
        }
        Severity::Error => {
            tracing::error!(target: "shell_core::console", %severity, message);
        }
    }
}
