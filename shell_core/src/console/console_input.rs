// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{BufRead, Write},
          sync::atomic::Ordering};

use super::console_impl::ConsoleState;
use crate::{Console, ConsoleError, ControlFlowExtended, ReadlineEvent};

impl Console {
    /// Read one line, without its line terminator.
    ///
    /// - `interactive` with line editing enabled ([`crate::ConsoleConfig::line_editing`]):
    ///   the line is edited in place behind `prompt`, with history recall and tab
    ///   completion. `Ctrl+C` yields an empty line, `Ctrl+D` on an empty line ends the
    ///   input. Accepted lines go to the history.
    /// - Otherwise a raw line is read from the input stream. `prompt` is written first
    ///   only if `interactive` is set.
    ///
    /// Returns [`None`] at the end of the input or when reading fails (which is logged).
    /// [`Self::is_input_eof`] tells the two apart from a line afterwards.
    ///
    /// The console lock is not held while waiting for input, so other threads can keep
    /// printing. If the caller holds it ([`Self::lock`]), other threads' output waits for
    /// the line. Concurrent interactive reads are served one after the other.
    pub fn get_line(&self, prompt: &str, interactive: bool) -> Option<String> {
        if self.is_locked_by_current_thread() {
            tracing::warn!(
                target: "shell_core::console",
                id = self.id,
                "reading a line while holding the console lock, other threads' output waits"
            );
        }

        let result = if interactive && self.line_editing {
            self.read_line_interactive(prompt)
        } else {
            self.read_line_batch(prompt, interactive)
        };

        match result {
            Ok(Some(line)) => {
                self.input_eof.store(false, Ordering::SeqCst);
                Some(line)
            }
            Ok(None) => {
                tracing::debug!(id = self.id, "end of input");
                self.input_eof.store(true, Ordering::SeqCst);
                None
            }
            Err(err) => {
                tracing::error!(
                    target: "shell_core::console",
                    id = self.id,
                    error = %err,
                    "could not read line"
                );
                self.input_eof.store(true, Ordering::SeqCst);
                None
            }
        }
    }

    fn read_line_batch(
        &self,
        prompt: &str,
        interactive: bool,
    ) -> Result<Option<String>, ConsoleError> {
        if interactive {
            let _guard = self.lock()?;
            let mut state = self.state()?;
            state.output.write_all(prompt.as_bytes())?;
            state.output.flush()?;
        }

        let mut bytes = Vec::new();
        let bytes_read = self.input()?.read_until(b'\n', &mut bytes)?;
        if bytes_read == 0 {
            return Ok(None);
        }

        if bytes.last() == Some(&b'\n') {
            bytes.pop();
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }

    fn read_line_interactive(&self, prompt: &str) -> Result<Option<String>, ConsoleError> {
        let _reading = self
            .reading
            .lock()
            .map_err(|_| ConsoleError::LockPoisoned.logged())?;

        let term_size = {
            let mut events = self.event_source()?;
            events.enter_raw_mode()?;
            events.terminal_size()
        };
        let result = self.edit_line(prompt, term_size);
        let exit_result = self
            .event_source()
            .and_then(|mut events| Ok(events.exit_raw_mode()?));

        let line = result?;
        exit_result?;
        Ok(line)
    }

    /// The event source is locked only while waiting for the next event, and the event
    /// is applied with the console lock. So a print from another thread lands between
    /// two key presses, and a swapped event source takes over at the next one.
    fn edit_line(
        &self,
        prompt: &str,
        term_size: (u16, u16),
    ) -> Result<Option<String>, ConsoleError> {
        {
            let _guard = self.lock()?;
            let mut state = self.state()?;
            let ConsoleState { output, editor, .. } = &mut *state;
            editor.line_state.term_size = term_size;
            editor.begin(prompt, &mut **output)?;
        }

        loop {
            let event = self.event_source()?.next_event();

            let _guard = self.lock()?;
            let mut state = self.state()?;
            let ConsoleState { output, editor, .. } = &mut *state;
            match editor.apply_event(event, &mut **output) {
                ControlFlowExtended::Continue
                | ControlFlowExtended::ReturnOk(ReadlineEvent::Resized(_)) => {}
                ControlFlowExtended::ReturnOk(ReadlineEvent::Line(line)) => {
                    return Ok(Some(line));
                }
                ControlFlowExtended::ReturnOk(ReadlineEvent::Interrupted) => {
                    return Ok(Some(String::new()));
                }
                ControlFlowExtended::ReturnOk(ReadlineEvent::Eof) => return Ok(None),
                ControlFlowExtended::ReturnError(err) => return Err(err.into()),
            }
        }
    }
}
