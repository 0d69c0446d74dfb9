// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::{QueueableCommand, cursor};
use std::io::Write;

use super::core::{LineState, to_u16};
use crate::ReadlineError;

impl LineState {
    /// Print `data` above the line being edited, then render the prompt and the line
    /// again below it. Line feeds in `data` also act as carriage returns, since the
    /// terminal is in raw mode while a line is being edited.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::IO`] if writing to `term` fails.
    pub fn print_data_and_flush(
        &mut self,
        data: &[u8],
        term: &mut dyn Write,
    ) -> Result<(), ReadlineError> {
        self.clear(term)?;

        // If last written data was not newline, restore the cursor.
        if !self.last_line_completed {
            term.queue(cursor::MoveUp(1))?.queue(cursor::MoveToColumn(0))?;
            if self.last_line_length != 0 {
                term.queue(cursor::MoveRight(to_u16(self.last_line_length)))?;
            }
        }

        for line in data.split_inclusive(|byte| *byte == b'\n') {
            term.write_all(line)?;
            term.queue(cursor::MoveToColumn(0))?;
        }

        self.last_line_completed = data.ends_with(b"\n");

        if self.last_line_completed {
            self.last_line_length = 0;
        } else {
            let new_len = self.last_line_length + data.len();
            let term_width = usize::from(self.term_size.0.max(1));
            // Wrap around when doing multiple partial writes.
            if new_len >= term_width {
                self.last_line_length = new_len % term_width;
                writeln!(term)?;
            } else {
                self.last_line_length = new_len;
            }
            // Make a new line for the prompt.
            writeln!(term)?;
        }

        term.queue(cursor::MoveToColumn(0))?;
        self.render_and_flush(term)?;

        Ok(())
    }

    /// # Errors
    ///
    /// [`ReadlineError::IO`] if writing to `term` fails.
    pub fn print_and_flush(
        &mut self,
        string: &str,
        term: &mut dyn Write,
    ) -> Result<(), ReadlineError> {
        self.print_data_and_flush(string.as_bytes(), term)
    }

    /// Drop the line and wipe the prompt from the screen. Used when editing ends
    /// without a line (end of input, interrupt).
    ///
    /// # Errors
    ///
    /// [`ReadlineError::IO`] if writing to `term` fails.
    pub fn exit(&mut self, term: &mut dyn Write) -> Result<(), ReadlineError> {
        self.clear(term)?;
        self.line.clear();
        self.hint = None;
        self.completion_cycle = None;
        self.move_cursor_to_start();

        term.queue(cursor::MoveToColumn(0))?;
        term.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StdoutMock;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exit_clears_line() {
        let mut line_state = LineState::new("$ ".into(), (80, 24));
        line_state.set_line("some content");
        let mut stdout_mock = StdoutMock::default();

        line_state.exit(&mut stdout_mock).unwrap();

        assert!(line_state.line.is_empty());
        assert_eq!(line_state.current_column, 2);
    }

    #[test]
    fn test_print_data_sets_last_line_completed() {
        let mut line_state = LineState::new("$ ".into(), (80, 24));
        let mut stdout_mock = StdoutMock::default();

        line_state.print_data_and_flush(b"hello\n", &mut stdout_mock).unwrap();
        assert!(line_state.last_line_completed);
        assert_eq!(line_state.last_line_length, 0);

        line_state.print_data_and_flush(b"world", &mut stdout_mock).unwrap();
        assert!(!line_state.last_line_completed);
        assert_eq!(line_state.last_line_length, 5);
    }

    #[test]
    fn test_print_data_renders_line_again() {
        let mut line_state = LineState::new("$ ".into(), (80, 24));
        line_state.line = "typed".into();
        let mut stdout_mock = StdoutMock::default();

        line_state.print_data_and_flush(b"news\n", &mut stdout_mock).unwrap();

        let output = stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
        assert_eq!(output, "news\n$ typed");
    }
}
