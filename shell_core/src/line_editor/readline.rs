// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::Diagnostic;
use std::{io::{self, Write},
          path::PathBuf};
use thiserror::Error;

use crate::{CrosstermEventResult, EventSource, History, LineState};

/// Error returned while editing a line. Such errors generally require the caller to
/// give up on the line.
#[derive(Debug, Error, Diagnostic)]
pub enum ReadlineError {
    /// An internal I/O error occurred.
    #[error(transparent)]
    #[diagnostic(code(shell_core::readline::io))]
    IO(#[from] io::Error),
}

/// Events emitted by [`LineEditor::read_line`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ReadlineEvent {
    /// The user entered a line of text.
    Line(String),

    /// The user pressed `Ctrl+D` on an empty line, or the input ran out.
    Eof,

    /// The user pressed `Ctrl+C`.
    Interrupted,

    /// The terminal was resized to `(width_cols, height_rows)`.
    Resized((u16, u16)),
}

/// Internal control flow for the event loop. This is used primarily to make testing
/// easier, and lets a caller interleave its own locking between events.
#[derive(Debug, PartialEq, Clone)]
pub enum ControlFlowExtended<T, E> {
    ReturnOk(T),
    ReturnError(E),
    Continue,
}

/// Interactive line editor: a [`LineState`] plus the [`History`] it recalls from.
///
/// There are two ways to drive it:
/// 1. [`Self::read_line`] runs the whole loop against an [`EventSource`].
/// 2. [`Self::begin`] then [`Self::apply_event`] for every event, which is what
///    [`crate::Console`] does so it can take its lock per event instead of for the
///    whole edit.
#[derive(Debug)]
pub struct LineEditor {
    pub line_state: LineState,
    pub history: History,
    /// Accepted lines are saved here after every [`Self::add_history_entry`].
    pub history_path: Option<PathBuf>,
    is_editing: bool,
}

impl LineEditor {
    #[must_use]
    pub fn new(term_size: (u16, u16)) -> Self {
        Self {
            line_state: LineState::new(String::new(), term_size),
            history: History::default(),
            history_path: None,
            is_editing: false,
        }
    }

    /// Load the history from `path` and keep saving to it. A file that can't be read is
    /// logged and otherwise ignored, the history simply starts empty.
    #[must_use]
    pub fn with_history_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Err(err) = self.history.load(&path) {
            tracing::warn!(
                message = "Could not load history",
                path = %path.display(),
                error = %err
            );
        }
        self.history_path = Some(path);
        self
    }

    /// Set maximum history length. The default length is [`crate::HISTORY_SIZE_MAX`].
    pub fn set_max_history(&mut self, max_size: usize) { self.history.set_max_size(max_size); }

    /// Set whether the input line should remain on the screen after events.
    ///
    /// If `enter` is true, then when the user presses "Enter", the prompt and the text
    /// they entered will remain on the screen, and the cursor will move to the next line.
    /// If `enter` is false, the prompt & input will be erased instead. `control_c`
    /// similarly controls the behavior for when the user presses `Ctrl+C`.
    pub fn should_print_line_on(&mut self, enter: bool, control_c: bool) {
        self.line_state.should_print_line_on_enter = enter;
        self.line_state.should_print_line_on_control_c = control_c;
    }

    #[must_use]
    pub fn is_editing(&self) -> bool { self.is_editing }

    /// Start editing a fresh line behind `prompt`.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::IO`] if rendering the prompt fails.
    pub fn begin(&mut self, prompt: &str, term: &mut dyn Write) -> Result<(), ReadlineError> {
        let line_state = &mut self.line_state;
        line_state.prompt.clear();
        line_state.prompt.push_str(prompt);
        line_state.line.clear();
        line_state.completion_cycle = None;
        line_state.move_cursor_to_start();
        line_state.refresh_hint();
        self.history.reset_position();
        self.is_editing = true;

        line_state.render_and_flush(term)?;
        Ok(())
    }

    /// Feed one event to the line being edited. Returns
    /// [`ControlFlowExtended::Continue`] until the edit is over. A read error of kind
    /// [`io::ErrorKind::UnexpectedEof`] counts as [`ReadlineEvent::Eof`], any other read
    /// error ends the edit with that error.
    pub fn apply_event(
        &mut self,
        event_result: CrosstermEventResult,
        term: &mut dyn Write,
    ) -> ControlFlowExtended<ReadlineEvent, ReadlineError> {
        let event = match event_result {
            Ok(event) => event,
            Err(err) => {
                self.is_editing = false;
                // The read already failed, a failure to clean up the screen adds nothing.
                self.line_state.exit(term).ok();
                return if err.kind() == io::ErrorKind::UnexpectedEof {
                    ControlFlowExtended::ReturnOk(ReadlineEvent::Eof)
                } else {
                    ControlFlowExtended::ReturnError(err.into())
                };
            }
        };

        match self
            .line_state
            .apply_event_and_render(event, term, &mut self.history)
        {
            Ok(None | Some(ReadlineEvent::Resized(_))) => ControlFlowExtended::Continue,
            Ok(Some(readline_event)) => {
                self.is_editing = false;
                if let ReadlineEvent::Line(line) = &readline_event {
                    self.add_history_entry(line);
                }
                ControlFlowExtended::ReturnOk(readline_event)
            }
            Err(err) => {
                self.is_editing = false;
                ControlFlowExtended::ReturnError(err)
            }
        }
    }

    /// Print `data` to `term`. While a line is being edited it goes above the prompt,
    /// which is rendered again below it.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::IO`] if writing fails.
    pub fn print_data(&mut self, data: &[u8], term: &mut dyn Write) -> Result<(), ReadlineError> {
        if self.is_editing {
            self.line_state.print_data_and_flush(data, term)
        } else {
            term.write_all(data)?;
            term.flush()?;
            Ok(())
        }
    }

    /// Add a line to the input history, and save the history if it has a path.
    pub fn add_history_entry(&mut self, entry: &str) {
        self.history.update(entry);
        if let Some(path) = &self.history_path
            && let Err(err) = self.history.save(path)
        {
            tracing::warn!(
                message = "Could not save history",
                path = %path.display(),
                error = %err
            );
        }
    }

    /// Edit a whole line, reading events from `events`. Raw mode is entered for the
    /// duration of the edit and always left afterwards.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::IO`] if the terminal can't be switched to raw mode, or reading
    /// or writing fails.
    pub fn read_line(
        &mut self,
        prompt: &str,
        term: &mut dyn Write,
        events: &mut dyn EventSource,
    ) -> Result<ReadlineEvent, ReadlineError> {
        self.line_state.term_size = events.terminal_size();
        events.enter_raw_mode()?;

        let result = self.begin(prompt, term).and_then(|()| loop {
            match self.apply_event(events.next_event(), term) {
                ControlFlowExtended::ReturnOk(event) => break Ok(event),
                ControlFlowExtended::ReturnError(err) => break Err(err),
                ControlFlowExtended::Continue => {}
            }
        });

        let exit_result = events.exit_raw_mode();
        let event = result?;
        exit_result?;
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MockEventSource, StdoutMock, typed_events};
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_read_line() {
        let mut editor = LineEditor::new((80, 24));
        let mut stdout_mock = StdoutMock::default();
        let mut events = MockEventSource::new(typed_events("abc\n"));
        let raw_mode_depth = events.raw_mode_depth.clone();

        let result = editor.read_line("> ", &mut stdout_mock, &mut events).unwrap();

        assert_eq!(result, ReadlineEvent::Line("abc".to_string()));
        assert_eq!(editor.line_state.line, "");
        assert!(!editor.is_editing());
        assert_eq!(raw_mode_depth.load(Ordering::SeqCst), 0);
        assert_eq!(editor.history.entries.front().map(String::as_str), Some("abc"));

        let output_buffer_data = stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
        assert!(output_buffer_data.contains("> abc"));
    }

    #[test]
    fn test_read_line_runs_out_of_events() {
        let mut editor = LineEditor::new((80, 24));
        let mut stdout_mock = StdoutMock::default();
        let mut events = MockEventSource::from_typed("partial");

        let result = editor.read_line("> ", &mut stdout_mock, &mut events).unwrap();

        assert_eq!(result, ReadlineEvent::Eof);
        assert!(editor.history.entries.is_empty());
    }

    #[test]
    fn test_read_line_io_error() {
        let mut editor = LineEditor::new((80, 24));
        let mut stdout_mock = StdoutMock::default();
        let mut events = MockEventSource::new([Err(io::Error::other("device gone"))]);
        let raw_mode_depth = events.raw_mode_depth.clone();

        let result = editor.read_line("> ", &mut stdout_mock, &mut events);

        assert!(matches!(result, Err(ReadlineError::IO(_))));
        assert_eq!(raw_mode_depth.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_apply_event_continues_until_enter() {
        let mut editor = LineEditor::new((80, 24));
        let mut stdout_mock = StdoutMock::default();
        editor.begin("$ ", &mut stdout_mock).unwrap();
        assert!(editor.is_editing());

        let resize = Ok(Event::Resize(100, 30));
        assert!(matches!(
            editor.apply_event(resize, &mut stdout_mock),
            ControlFlowExtended::Continue
        ));

        let key = Ok(Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)));
        assert!(matches!(
            editor.apply_event(key, &mut stdout_mock),
            ControlFlowExtended::Continue
        ));

        let enter = Ok(Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
        assert!(matches!(
            editor.apply_event(enter, &mut stdout_mock),
            ControlFlowExtended::ReturnOk(ReadlineEvent::Line(line)) if line == "x"
        ));
        assert!(!editor.is_editing());
    }

    #[test]
    fn test_print_data_while_editing_keeps_line() {
        let mut editor = LineEditor::new((80, 24));
        let mut stdout_mock = StdoutMock::default();

        editor.print_data(b"before\n", &mut stdout_mock).unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "before\n");

        editor.begin("$ ", &mut stdout_mock).unwrap();
        let key = Ok(Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        editor.apply_event(key, &mut stdout_mock);
        stdout_mock.clear();

        editor.print_data(b"during\n", &mut stdout_mock).unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string_strip_ansi(), "during\n$ q");
        assert_eq!(editor.line_state.line, "q");
    }

    #[test]
    fn test_history_persists_across_editors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");

        let mut editor = LineEditor::new((80, 24)).with_history_path(&path);
        let mut stdout_mock = StdoutMock::default();
        let mut events = MockEventSource::new(typed_events("one\ntwo\n"));
        editor.read_line("> ", &mut stdout_mock, &mut events).unwrap();
        editor.read_line("> ", &mut stdout_mock, &mut events).unwrap();

        let mut reopened = LineEditor::new((80, 24)).with_history_path(&path);
        let mut events = MockEventSource::new([
            Ok(Event::Key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE))),
            Ok(Event::Key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE))),
            Ok(Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))),
        ]);
        let result = reopened.read_line("> ", &mut stdout_mock, &mut events).unwrap();
        assert_eq!(result, ReadlineEvent::Line("one".into()));
    }
}
