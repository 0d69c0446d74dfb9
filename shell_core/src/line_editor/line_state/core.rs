// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::{QueueableCommand, cursor};
use std::io::{self, Write};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::{Hint, InlineVec};

/// Tab completion in progress. `index == candidates.len()` means the original line is
/// showing again, after cycling through every candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCycle {
    pub original_line: String,
    pub candidates: InlineVec<String>,
    pub index: usize,
}

/// Handles the editing and rendering of a single line. Works hand in hand with
/// [`crate::LineEditor`], which owns it along with the [`crate::History`].
#[derive(Debug)]
pub struct LineState {
    /// Unicode line.
    pub line: String,

    /// Index of grapheme in line.
    pub line_cursor_grapheme: usize,

    /// Column of grapheme in line.
    pub current_column: u16,

    pub prompt: String,

    /// After pressing enter, should we print the line just submitted?
    pub should_print_line_on_enter: bool,

    /// After pressing `control_c` should we print the line just cancelled?
    pub should_print_line_on_control_c: bool,

    pub last_line_length: usize,
    pub last_line_completed: bool,

    pub term_size: (u16, u16),

    /// Hint rendered after the line. Refreshed whenever the line changes.
    pub hint: Option<Hint>,

    pub completion_cycle: Option<CompletionCycle>,
}

/// Saturating conversion for terminal coordinates.
pub(crate) fn to_u16(value: usize) -> u16 { u16::try_from(value).unwrap_or(u16::MAX) }

impl LineState {
    /// Create a new `LineState` with the given prompt and terminal size, which is
    /// `(width_cols, height_rows)`.
    #[must_use]
    pub fn new(prompt: String, term_size: (u16, u16)) -> Self {
        let current_column = to_u16(prompt.width());
        Self {
            prompt,
            last_line_completed: true,
            term_size,
            current_column,
            should_print_line_on_enter: true,
            should_print_line_on_control_c: false,
            line: String::new(),
            line_cursor_grapheme: 0,
            last_line_length: 0,
            hint: None,
            completion_cycle: None,
        }
    }

    fn term_width(&self) -> u16 { self.term_size.0.max(1) }

    /// Gets the number of lines wrapped.
    pub(crate) fn line_height(&self, pos: u16) -> u16 { pos / self.term_width() }

    /// Move from a position on the line to the start.
    pub(crate) fn move_to_beginning(&self, term: &mut dyn Write, from: u16) -> io::Result<()> {
        let move_up = self.line_height(from.saturating_sub(1));
        term.queue(cursor::MoveToColumn(0))?;
        if move_up != 0 {
            term.queue(cursor::MoveUp(move_up))?;
        }
        Ok(())
    }

    /// Move from the start of the line to some position.
    pub(crate) fn move_from_beginning(&self, term: &mut dyn Write, to: u16) -> io::Result<()> {
        let line_height = self.line_height(to.saturating_sub(1));
        let line_remaining_len = to % self.term_width();
        if line_height != 0 {
            term.queue(cursor::MoveDown(line_height))?;
        }
        if line_remaining_len != 0 {
            term.queue(cursor::MoveRight(line_remaining_len))?;
        }
        Ok(())
    }

    /// Move cursor by `change` unicode graphemes, either left (negative) or right
    /// (positive), clamped to the line. Recalculates [`Self::current_column`].
    pub fn move_cursor(&mut self, change: isize) {
        if change > 0 {
            let count = self.line.graphemes(true).count();
            self.line_cursor_grapheme =
                usize::min(self.line_cursor_grapheme + change.unsigned_abs(), count);
        } else {
            self.line_cursor_grapheme =
                self.line_cursor_grapheme.saturating_sub(change.unsigned_abs());
        }
        let pos = self.cursor_byte_offset();
        let line_width = self.line.get(..pos).map_or(0, UnicodeWidthStr::width);
        self.current_column = to_u16(self.prompt.width() + line_width);
    }

    pub(crate) fn move_cursor_to_start(&mut self) { self.move_cursor(isize::MIN); }

    pub(crate) fn move_cursor_to_end(&mut self) { self.move_cursor(isize::MAX); }

    /// The grapheme to the left of the cursor, with its byte offset.
    pub(crate) fn current_grapheme(&self) -> Option<(usize, &str)> {
        self.line
            .grapheme_indices(true)
            .take(self.line_cursor_grapheme)
            .last()
    }

    /// The grapheme under the cursor, with its byte offset.
    pub(crate) fn next_grapheme(&self) -> Option<(usize, &str)> {
        self.line.grapheme_indices(true).nth(self.line_cursor_grapheme)
    }

    /// Byte offset in [`Self::line`] where the cursor sits.
    pub(crate) fn cursor_byte_offset(&self) -> usize {
        self.current_grapheme().map_or(0, |(pos, str)| pos + str.len())
    }

    /// Byte offset of the grapheme with index `seg_index`, or the line length if it is
    /// past the end.
    pub(crate) fn byte_offset_at(&self, seg_index: usize) -> usize {
        self.line
            .grapheme_indices(true)
            .nth(seg_index)
            .map_or(self.line.len(), |(pos, _)| pos)
    }

    pub(crate) fn reset_cursor(&self, term: &mut dyn Write) -> io::Result<()> {
        self.move_to_beginning(term, self.current_column)
    }

    pub(crate) fn set_cursor(&self, term: &mut dyn Write) -> io::Result<()> {
        self.move_from_beginning(term, self.current_column)
    }

    /// Replace the whole line and put the cursor at its end.
    pub fn set_line(&mut self, line: &str) {
        self.line.clear();
        self.line.push_str(line);
        self.move_cursor_to_end();
        self.refresh_hint();
    }

    /// Ask the hints hook for the hint that goes with the current line.
    pub(crate) fn refresh_hint(&mut self) {
        self.hint = crate::line_editor::completion_hooks::hint(&self.line);
    }
}
