// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::{event, terminal};
use std::io;

use crate::CrosstermEventResult;

/// Where a [`crate::LineEditor`] gets its key presses from. The blocking read happens
/// outside of any console lock, so output from other threads keeps flowing while a line
/// is being typed.
pub trait EventSource: Send {
    /// Block until the next terminal event arrives.
    ///
    /// # Errors
    ///
    /// Any I/O error from the underlying device. Editing ends as if at end of input.
    fn next_event(&mut self) -> CrosstermEventResult;

    /// # Errors
    ///
    /// If the terminal can't be switched.
    fn enter_raw_mode(&mut self) -> io::Result<()> { Ok(()) }

    /// # Errors
    ///
    /// If the terminal can't be switched.
    fn exit_raw_mode(&mut self) -> io::Result<()> { Ok(()) }

    /// `(width_cols, height_rows)`.
    fn terminal_size(&self) -> (u16, u16) { (80, 24) }
}

/// The real terminal, through [`crossterm`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermEventSource;

impl EventSource for CrosstermEventSource {
    fn next_event(&mut self) -> CrosstermEventResult { event::read() }

    fn enter_raw_mode(&mut self) -> io::Result<()> { terminal::enable_raw_mode() }

    fn exit_raw_mode(&mut self) -> io::Result<()> { terminal::disable_raw_mode() }

    fn terminal_size(&self) -> (u16, u16) { terminal::size().unwrap_or((80, 24)) }
}
