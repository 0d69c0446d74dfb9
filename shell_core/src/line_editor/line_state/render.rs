// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::{QueueableCommand,
                style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor},
                terminal::{Clear, ClearType::FromCursorDown}};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

use super::core::{LineState, to_u16};

impl LineState {
    /// Clear the prompt, the line and the hint, leaving the cursor where the prompt
    /// starts.
    pub fn clear(&self, term: &mut dyn Write) -> io::Result<()> {
        self.move_to_beginning(term, self.current_column)?;
        term.queue(Clear(FromCursorDown))?;
        Ok(())
    }

    /// Write the prompt, the line and the hint (if any), then put the cursor back where
    /// it belongs in the line.
    pub fn render_and_flush(&self, term: &mut dyn Write) -> io::Result<()> {
        write!(term, "{}{}", self.prompt, self.line)?;
        let mut total_len = self.prompt.width() + self.line.width();

        if let Some(hint) = &self.hint
            && !hint.text.is_empty()
        {
            if let Some(color) = hint.color {
                term.queue(SetForegroundColor(color))?;
            }
            if hint.bold {
                term.queue(SetAttribute(Attribute::Bold))?;
            }
            term.queue(Print(&hint.text))?;
            term.queue(SetAttribute(Attribute::Reset))?;
            term.queue(ResetColor)?;
            total_len += hint.text.width();
        }

        self.move_to_beginning(term, to_u16(total_len))?;
        self.move_from_beginning(term, self.current_column)?;

        term.flush()
    }

    pub fn clear_and_render_and_flush(&self, term: &mut dyn Write) -> io::Result<()> {
        self.clear(term)?;
        self.render_and_flush(term)
    }
}
