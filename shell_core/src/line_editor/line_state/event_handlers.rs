// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::{QueueableCommand, cursor,
                event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
                terminal::{Clear, ClearType::All}};
use std::io::Write;
use unicode_segmentation::UnicodeSegmentation;

use super::core::{CompletionCycle, LineState};
use crate::{History, ReadlineError, ReadlineEvent, line_editor::completion_hooks};

/// Bell, sent when Tab finds nothing to complete.
const BELL: &[u8] = b"\x07";

/// Handle control key events (Ctrl+key combinations).
fn handle_control_key(
    line_state: &mut LineState,
    code: KeyCode,
    term: &mut dyn Write,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    match code {
        KeyCode::Char('d') => handle_ctrl_d(line_state, term),
        KeyCode::Char('c') => handle_ctrl_c(line_state, term),
        KeyCode::Char('l') => handle_ctrl_l(line_state, term),
        KeyCode::Char('u') => handle_ctrl_u(line_state, term),
        KeyCode::Char('w') => handle_ctrl_w(line_state, term),
        KeyCode::Char('a') => handle_home(line_state, term),
        KeyCode::Char('e') => handle_end(line_state, term),
        KeyCode::Left => handle_ctrl_left(line_state, term),
        KeyCode::Right => handle_ctrl_right(line_state, term),
        _ => Ok(None),
    }
}

/// Handle key events with no modifiers or non Control modifiers. Control+Alt is used
/// to reach certain special symbols on a lot of international keyboard layouts, so
/// those count as regular keys.
fn handle_regular_key(
    line_state: &mut LineState,
    code: KeyCode,
    term: &mut dyn Write,
    history: &mut History,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    match code {
        KeyCode::Enter => handle_enter(line_state, term, history),
        KeyCode::Backspace => handle_backspace(line_state, term),
        KeyCode::Delete => handle_delete(line_state, term),
        KeyCode::Left => handle_left(line_state, term),
        KeyCode::Right => handle_right(line_state, term),
        KeyCode::Home => handle_home(line_state, term),
        KeyCode::End => handle_end(line_state, term),
        KeyCode::Up => handle_up(line_state, term, history),
        KeyCode::Down => handle_down(line_state, term, history),
        KeyCode::Tab => handle_tab(line_state, term),
        KeyCode::Char(c) => handle_char(line_state, term, c),
        _ => Ok(None),
    }
}

fn handle_resize(
    line_state: &mut LineState,
    size: (u16, u16),
    term: &mut dyn Write,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    line_state.term_size = size;
    line_state.clear_and_render_and_flush(term)?;
    Ok(Some(ReadlineEvent::Resized(size)))
}

// Control key handlers.

/// Ctrl+D on an empty line is end of input, otherwise it deletes the character under
/// the cursor (like the Delete key).
fn handle_ctrl_d(
    line_state: &mut LineState,
    term: &mut dyn Write,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    if line_state.line.is_empty() {
        line_state.exit(term)?;
        Ok(Some(ReadlineEvent::Eof))
    } else {
        handle_delete(line_state, term)
    }
}

fn handle_ctrl_c(
    line_state: &mut LineState,
    term: &mut dyn Write,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    if line_state.should_print_line_on_control_c {
        let echo = format!("{}{}\n", line_state.prompt, line_state.line);
        line_state.hint = None;
        line_state.print_and_flush(&echo, term)?;
    }
    line_state.exit(term)?;
    Ok(Some(ReadlineEvent::Interrupted))
}

fn handle_ctrl_l(
    line_state: &mut LineState,
    term: &mut dyn Write,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    term.queue(Clear(All))?.queue(cursor::MoveTo(0, 0))?;
    line_state.clear_and_render_and_flush(term)?;
    Ok(None)
}

/// Delete from the start of the line up to the cursor.
fn handle_ctrl_u(
    line_state: &mut LineState,
    term: &mut dyn Write,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    if line_state.line_cursor_grapheme != 0 {
        line_state.clear(term)?;
        let cursor_byte_pos = line_state.cursor_byte_offset();
        line_state.line.drain(..cursor_byte_pos);
        line_state.move_cursor_to_start();
        line_state.refresh_hint();
        line_state.render_and_flush(term)?;
    }
    Ok(None)
}

/// Delete the word to the left of the cursor, and the spaces that follow it.
fn handle_ctrl_w(
    line_state: &mut LineState,
    term: &mut dyn Write,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    let cursor_pos = line_state.line_cursor_grapheme;
    if cursor_pos == 0 {
        return Ok(None);
    }

    let word_start = find_prev_word_start(&line_state.line, cursor_pos);
    let start_byte = line_state.byte_offset_at(word_start);
    let end_byte = line_state.cursor_byte_offset();

    line_state.clear(term)?;
    line_state.line.drain(start_byte..end_byte);
    line_state.move_cursor(signed_distance(cursor_pos, word_start));
    line_state.refresh_hint();
    line_state.render_and_flush(term)?;

    Ok(None)
}

fn handle_ctrl_left(
    line_state: &mut LineState,
    term: &mut dyn Write,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    let cursor_pos = line_state.line_cursor_grapheme;
    let target = find_prev_word_start(&line_state.line, cursor_pos);
    line_state.reset_cursor(term)?;
    line_state.move_cursor(signed_distance(cursor_pos, target));
    line_state.set_cursor(term)?;
    term.flush()?;
    Ok(None)
}

fn handle_ctrl_right(
    line_state: &mut LineState,
    term: &mut dyn Write,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    let cursor_pos = line_state.line_cursor_grapheme;
    let target = find_next_word_end(&line_state.line, cursor_pos);
    line_state.reset_cursor(term)?;
    line_state.move_cursor(signed_distance(cursor_pos, target));
    line_state.set_cursor(term)?;
    term.flush()?;
    Ok(None)
}

// Regular key handlers.

fn handle_enter(
    line_state: &mut LineState,
    term: &mut dyn Write,
    history: &mut History,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    // The hint is never part of the echo.
    line_state.hint = None;

    // Print line so you can see what commands you've typed.
    if line_state.should_print_line_on_enter {
        let echo = format!("{}{}\n", line_state.prompt, line_state.line);
        line_state.print_and_flush(&echo, term)?;
    }

    let line = std::mem::take(&mut line_state.line);
    history.reset_position();

    // Leave the screen clean, the next prompt is rendered by the next edit.
    line_state.exit(term)?;

    Ok(Some(ReadlineEvent::Line(line)))
}

fn handle_backspace(
    line_state: &mut LineState,
    term: &mut dyn Write,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    if let Some((pos, str)) = line_state.current_grapheme() {
        let end = pos + str.len();
        line_state.clear(term)?;
        line_state.line.replace_range(pos..end, "");
        line_state.move_cursor(-1);
        line_state.refresh_hint();
        line_state.render_and_flush(term)?;
    }
    Ok(None)
}

fn handle_delete(
    line_state: &mut LineState,
    term: &mut dyn Write,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    if let Some((pos, str)) = line_state.next_grapheme() {
        let end = pos + str.len();
        line_state.clear(term)?;
        line_state.line.replace_range(pos..end, "");
        line_state.refresh_hint();
        line_state.render_and_flush(term)?;
    }
    Ok(None)
}

fn handle_left(
    line_state: &mut LineState,
    term: &mut dyn Write,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    line_state.reset_cursor(term)?;
    line_state.move_cursor(-1);
    line_state.set_cursor(term)?;
    term.flush()?;
    Ok(None)
}

fn handle_right(
    line_state: &mut LineState,
    term: &mut dyn Write,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    line_state.reset_cursor(term)?;
    line_state.move_cursor(1);
    line_state.set_cursor(term)?;
    term.flush()?;
    Ok(None)
}

fn handle_home(
    line_state: &mut LineState,
    term: &mut dyn Write,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    line_state.reset_cursor(term)?;
    line_state.move_cursor_to_start();
    line_state.set_cursor(term)?;
    term.flush()?;
    Ok(None)
}

fn handle_end(
    line_state: &mut LineState,
    term: &mut dyn Write,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    line_state.reset_cursor(term)?;
    line_state.move_cursor_to_end();
    line_state.set_cursor(term)?;
    term.flush()?;
    Ok(None)
}

// Navigate to older history entry.
fn handle_up(
    line_state: &mut LineState,
    term: &mut dyn Write,
    history: &mut History,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    if let Some(line) = history.search_next() {
        line_state.clear(term)?;
        line_state.set_line(line);
        line_state.render_and_flush(term)?;
    }
    Ok(None)
}

// Navigate to newer history entry.
fn handle_down(
    line_state: &mut LineState,
    term: &mut dyn Write,
    history: &mut History,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    if let Some(line) = history.search_previous() {
        line_state.clear(term)?;
        line_state.set_line(line);
        line_state.render_and_flush(term)?;
    }
    Ok(None)
}

/// Start a completion cycle, or advance the one in progress. After the last candidate
/// the original line shows again, then the cycle starts over.
fn handle_tab(
    line_state: &mut LineState,
    term: &mut dyn Write,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    let cycle = match line_state.completion_cycle.take() {
        Some(mut cycle) => {
            cycle.index = (cycle.index + 1) % (cycle.candidates.len() + 1);
            cycle
        }
        None => {
            let completions = completion_hooks::complete(&line_state.line);
            if completions.is_empty() {
                term.write_all(BELL)?;
                term.flush()?;
                return Ok(None);
            }
            CompletionCycle {
                original_line: line_state.line.clone(),
                candidates: completions.candidates,
                index: 0,
            }
        }
    };

    let shown = cycle
        .candidates
        .get(cycle.index)
        .unwrap_or(&cycle.original_line)
        .clone();
    line_state.clear(term)?;
    line_state.set_line(&shown);
    line_state.render_and_flush(term)?;
    line_state.completion_cycle = Some(cycle);

    Ok(None)
}

/// Esc during a completion cycle puts the original line back.
fn handle_escape(
    line_state: &mut LineState,
    term: &mut dyn Write,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    if let Some(cycle) = line_state.completion_cycle.take() {
        line_state.clear(term)?;
        line_state.set_line(&cycle.original_line);
        line_state.render_and_flush(term)?;
    }
    Ok(None)
}

// Add character to line and output.
fn handle_char(
    line_state: &mut LineState,
    term: &mut dyn Write,
    c: char,
) -> Result<Option<ReadlineEvent>, ReadlineError> {
    line_state.clear(term)?;
    let prev_len = line_state.line.graphemes(true).count();
    let insert_byte_pos = line_state.cursor_byte_offset();
    line_state.line.insert(insert_byte_pos, c);

    // A combining character joins the grapheme to its left, the cursor stays put.
    if line_state.line.graphemes(true).count() != prev_len {
        line_state.move_cursor(1);
    } else {
        line_state.move_cursor(0);
    }
    line_state.refresh_hint();
    line_state.render_and_flush(term)?;
    Ok(None)
}

/// Grapheme index where the word to the left of `cursor_pos` starts. Spaces right
/// before the cursor are skipped first.
fn find_prev_word_start(line: &str, cursor_pos: usize) -> usize {
    let graphemes: Vec<&str> = line.graphemes(true).take(cursor_pos).collect();
    let mut index = graphemes.len();
    while index > 0 && graphemes.get(index - 1).is_some_and(|it| it.trim().is_empty()) {
        index -= 1;
    }
    while index > 0 && graphemes.get(index - 1).is_some_and(|it| !it.trim().is_empty()) {
        index -= 1;
    }
    index
}

/// Grapheme index where the word to the right of `cursor_pos` ends.
fn find_next_word_end(line: &str, cursor_pos: usize) -> usize {
    let graphemes: Vec<&str> = line.graphemes(true).collect();
    let mut index = cursor_pos.min(graphemes.len());
    while graphemes.get(index).is_some_and(|it| it.trim().is_empty()) {
        index += 1;
    }
    while graphemes.get(index).is_some_and(|it| !it.trim().is_empty()) {
        index += 1;
    }
    index
}

#[allow(clippy::cast_possible_wrap)]
fn signed_distance(from: usize, to: usize) -> isize { to as isize - from as isize }

impl LineState {
    /// Processes an input event, updates the line, and renders the changes to `term`.
    ///
    /// Returns `Ok(Some(..))` when the caller has something to act on:
    /// - [`ReadlineEvent::Line`] - Enter was pressed, the line is complete.
    /// - [`ReadlineEvent::Eof`] - Ctrl+D on an empty line.
    /// - [`ReadlineEvent::Interrupted`] - Ctrl+C.
    /// - [`ReadlineEvent::Resized`] - the terminal was resized.
    ///
    /// Returns `Ok(None)` for everything else (editing, cursor movement, history
    /// navigation, completion).
    ///
    /// ```
    /// use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    /// use shell_core::{History, LineState, ReadlineEvent, StdoutMock};
    ///
    /// let mut line_state = LineState::new("> ".into(), (80, 24));
    /// let mut stdout = StdoutMock::default();
    /// let mut history = History::default();
    ///
    /// for ch in "hello".chars() {
    ///     let event = Event::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
    ///     let result = line_state.apply_event_and_render(event, &mut stdout, &mut history);
    ///     assert!(matches!(result, Ok(None)));
    /// }
    /// assert_eq!(line_state.line, "hello");
    ///
    /// let enter = Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    /// let result = line_state.apply_event_and_render(enter, &mut stdout, &mut history);
    /// assert!(matches!(result, Ok(Some(ReadlineEvent::Line(line))) if line == "hello"));
    /// ```
    ///
    /// # Errors
    ///
    /// [`ReadlineError::IO`] if writing to `term` fails.
    pub fn apply_event_and_render(
        &mut self,
        event: Event,
        term: &mut dyn Write,
        history: &mut History,
    ) -> Result<Option<ReadlineEvent>, ReadlineError> {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => {
                // Any key other than Tab and Esc accepts the candidate on display.
                if code == KeyCode::Esc {
                    return handle_escape(self, term);
                }
                if code != KeyCode::Tab {
                    self.completion_cycle = None;
                }

                if modifiers == KeyModifiers::CONTROL {
                    handle_control_key(self, code, term)
                } else {
                    handle_regular_key(self, code, term, history)
                }
            }
            Event::Resize(cols, rows) => handle_resize(self, (cols, rows), term),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompletionCallback, Completions, StdoutMock};
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    fn key(code: KeyCode) -> Event { Event::Key(KeyEvent::new(code, KeyModifiers::NONE)) }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn apply_all(line_state: &mut LineState, history: &mut History, events: &[Event]) {
        let mut stdout_mock = StdoutMock::default();
        for event in events {
            line_state
                .apply_event_and_render(event.clone(), &mut stdout_mock, history)
                .unwrap();
        }
    }

    fn type_str(text: &str) -> Vec<Event> { text.chars().map(|c| key(KeyCode::Char(c))).collect() }

    #[test]
    fn test_add_char() {
        let mut line = LineState::new("foo".into(), (100, 100));
        let mut history = History::default();
        let mut stdout_mock = StdoutMock::default();

        let it = line.apply_event_and_render(
            key(KeyCode::Char('a')),
            &mut stdout_mock,
            &mut history,
        );

        assert!(matches!(it, Ok(None)));
        assert_eq!(line.line, "a");
        assert_eq!(line.current_column, 4);
    }

    #[test]
    fn test_move_cursor_right_at_end_is_noop() {
        let mut line = LineState::new("foo".into(), (100, 100));
        let mut history = History::default();
        apply_all(&mut line, &mut history, &[key(KeyCode::Right)]);
        assert_eq!(line.current_column, 3);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut line = LineState::new(String::new(), (100, 100));
        let mut history = History::default();
        let mut events = type_str("helo");
        events.push(key(KeyCode::Left));
        events.push(key(KeyCode::Char('l')));
        apply_all(&mut line, &mut history, &events);
        assert_eq!(line.line, "hello");
        assert_eq!(line.line_cursor_grapheme, 4);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut line = LineState::new(String::new(), (100, 100));
        let mut history = History::default();
        let mut events = type_str("abcd");
        events.extend([
            key(KeyCode::Backspace),
            key(KeyCode::Home),
            key(KeyCode::Delete),
        ]);
        apply_all(&mut line, &mut history, &events);
        assert_eq!(line.line, "bc");
        assert_eq!(line.line_cursor_grapheme, 0);
    }

    #[test]
    fn test_enter_returns_line_and_resets() {
        let mut line = LineState::new("$ ".into(), (100, 100));
        let mut history = History::default();
        apply_all(&mut line, &mut history, &type_str("ls -l"));

        let mut stdout_mock = StdoutMock::default();
        let it = line
            .apply_event_and_render(key(KeyCode::Enter), &mut stdout_mock, &mut history)
            .unwrap();

        assert_eq!(it, Some(ReadlineEvent::Line("ls -l".into())));
        assert!(line.line.is_empty());
        assert_eq!(line.current_column, 2);
        assert!(
            stdout_mock
                .get_copy_of_buffer_as_string_strip_ansi()
                .contains("$ ls -l\n")
        );
    }

    #[test]
    fn test_search_history() {
        let mut line = LineState::new("foo".into(), (100, 100));
        let mut history = History::default();

        apply_all(&mut line, &mut history, &[key(KeyCode::Up)]);
        assert_eq!(line.line, "");

        history.update("first");
        history.update("second");
        apply_all(&mut line, &mut history, &[key(KeyCode::Up)]);
        assert_eq!(line.line, "second");
        apply_all(&mut line, &mut history, &[key(KeyCode::Up)]);
        assert_eq!(line.line, "first");
        apply_all(&mut line, &mut history, &[key(KeyCode::Down)]);
        assert_eq!(line.line, "second");
        apply_all(&mut line, &mut history, &[key(KeyCode::Down)]);
        assert_eq!(line.line, "");
    }

    #[test]
    fn test_ctrl_d_empty_line_eof() {
        let mut line = LineState::new(String::new(), (100, 100));
        let mut history = History::default();
        let mut stdout_mock = StdoutMock::default();

        let result = line.apply_event_and_render(ctrl('d'), &mut stdout_mock, &mut history);

        assert!(matches!(result, Ok(Some(ReadlineEvent::Eof))));
    }

    #[test]
    fn test_ctrl_d_non_empty_deletes_char() {
        let mut line = LineState::new(String::new(), (100, 100));
        let mut history = History::default();
        apply_all(&mut line, &mut history, &type_str("abc"));
        apply_all(&mut line, &mut history, &[ctrl('a'), key(KeyCode::Right), ctrl('d')]);

        assert_eq!(line.line, "ac");
        assert_eq!(line.line_cursor_grapheme, 1);
    }

    #[test]
    fn test_ctrl_c_interrupts_and_clears() {
        let mut line = LineState::new(String::new(), (100, 100));
        let mut history = History::default();
        apply_all(&mut line, &mut history, &type_str("abc"));
        let mut stdout_mock = StdoutMock::default();

        let result = line.apply_event_and_render(ctrl('c'), &mut stdout_mock, &mut history);

        assert!(matches!(result, Ok(Some(ReadlineEvent::Interrupted))));
        assert!(line.line.is_empty());
    }

    #[test]
    fn test_ctrl_u_deletes_to_start() {
        let mut line = LineState::new(String::new(), (100, 100));
        let mut history = History::default();
        let mut events = type_str("hello world");
        events.extend([key(KeyCode::Left), key(KeyCode::Left), ctrl('u')]);
        apply_all(&mut line, &mut history, &events);
        assert_eq!(line.line, "ld");
        assert_eq!(line.line_cursor_grapheme, 0);
    }

    #[test]
    fn test_ctrl_w_word_boundaries() {
        let mut line = LineState::new(String::new(), (100, 100));
        let mut history = History::default();
        apply_all(&mut line, &mut history, &type_str("one two  "));

        apply_all(&mut line, &mut history, &[ctrl('w')]);
        assert_eq!(line.line, "one ");

        apply_all(&mut line, &mut history, &[ctrl('w')]);
        assert_eq!(line.line, "");

        apply_all(&mut line, &mut history, &[ctrl('w')]);
        assert_eq!(line.line, "");
    }

    #[test]
    fn test_ctrl_word_navigation() {
        let mut line = LineState::new(String::new(), (100, 100));
        let mut history = History::default();
        apply_all(&mut line, &mut history, &type_str("alpha beta gamma"));

        let ctrl_left = Event::Key(KeyEvent::new(KeyCode::Left, KeyModifiers::CONTROL));
        let ctrl_right = Event::Key(KeyEvent::new(KeyCode::Right, KeyModifiers::CONTROL));

        apply_all(&mut line, &mut history, std::slice::from_ref(&ctrl_left));
        assert_eq!(line.line_cursor_grapheme, 11);
        apply_all(&mut line, &mut history, std::slice::from_ref(&ctrl_left));
        assert_eq!(line.line_cursor_grapheme, 6);

        apply_all(&mut line, &mut history, std::slice::from_ref(&ctrl_right));
        assert_eq!(line.line_cursor_grapheme, 10);
        apply_all(&mut line, &mut history, std::slice::from_ref(&ctrl_right));
        assert_eq!(line.line_cursor_grapheme, 16);
    }

    #[test]
    fn test_resize_is_reported() {
        let mut line = LineState::new(String::new(), (100, 100));
        let mut history = History::default();
        let mut stdout_mock = StdoutMock::default();

        let result =
            line.apply_event_and_render(Event::Resize(40, 10), &mut stdout_mock, &mut history);

        assert!(matches!(result, Ok(Some(ReadlineEvent::Resized((40, 10))))));
        assert_eq!(line.term_size, (40, 10));
    }

    fn complete_commands(line: &str, completions: &mut Completions) {
        for it in ["help", "hexdump", "history"] {
            if it.starts_with(line) {
                completions.add(it);
            }
        }
    }

    fn install(callback: Option<CompletionCallback>) {
        completion_hooks::set_completion_callback(callback);
        completion_hooks::set_hints_callback(None);
    }

    #[serial]
    #[test]
    fn test_tab_cycles_through_candidates() {
        install(Some(complete_commands));
        let mut line = LineState::new(String::new(), (100, 100));
        let mut history = History::default();
        apply_all(&mut line, &mut history, &type_str("he"));

        apply_all(&mut line, &mut history, &[key(KeyCode::Tab)]);
        assert_eq!(line.line, "help");
        apply_all(&mut line, &mut history, &[key(KeyCode::Tab)]);
        assert_eq!(line.line, "hexdump");
        apply_all(&mut line, &mut history, &[key(KeyCode::Tab)]);
        assert_eq!(line.line, "he");
        apply_all(&mut line, &mut history, &[key(KeyCode::Tab)]);
        assert_eq!(line.line, "help");

        // Any other key accepts the candidate shown.
        apply_all(&mut line, &mut history, &[key(KeyCode::Char('!'))]);
        assert_eq!(line.line, "help!");
        assert!(line.completion_cycle.is_none());
        install(None);
    }

    #[serial]
    #[test]
    fn test_escape_restores_original_line() {
        install(Some(complete_commands));
        let mut line = LineState::new(String::new(), (100, 100));
        let mut history = History::default();
        apply_all(&mut line, &mut history, &type_str("hi"));

        apply_all(&mut line, &mut history, &[key(KeyCode::Tab)]);
        assert_eq!(line.line, "history");

        apply_all(&mut line, &mut history, &[key(KeyCode::Esc)]);
        assert_eq!(line.line, "hi");
        assert!(line.completion_cycle.is_none());
        install(None);
    }

    #[serial]
    #[test]
    fn test_tab_without_candidates_rings_bell() {
        install(None);
        let mut line = LineState::new(String::new(), (100, 100));
        let mut history = History::default();
        apply_all(&mut line, &mut history, &type_str("zz"));

        let mut stdout_mock = StdoutMock::default();
        line.apply_event_and_render(key(KeyCode::Tab), &mut stdout_mock, &mut history)
            .unwrap();

        assert_eq!(line.line, "zz");
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "\x07");
    }

    #[test]
    fn test_word_boundary_helpers() {
        assert_eq!(find_prev_word_start("ab  cd", 6), 4);
        assert_eq!(find_prev_word_start("ab  cd", 4), 0);
        assert_eq!(find_prev_word_start("ab", 0), 0);
        assert_eq!(find_next_word_end("ab  cd", 0), 2);
        assert_eq!(find_next_word_end("ab  cd", 2), 6);
        assert_eq!(find_next_word_end("ab", 9), 2);
    }
}
