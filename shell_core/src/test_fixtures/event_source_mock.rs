// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use std::{collections::VecDeque,
          io,
          sync::{Arc,
                 atomic::{AtomicUsize, Ordering}}};

use crate::{CrosstermEventResult, EventSource};

/// Replays a canned sequence of terminal events. Once they run out, every read fails
/// with [`io::ErrorKind::UnexpectedEof`], which a [`crate::LineEditor`] treats as the
/// end of input.
#[derive(Debug, Default)]
pub struct MockEventSource {
    pub events: VecDeque<CrosstermEventResult>,
    /// Shared count of raw mode entries minus exits, so a test can check that raw mode
    /// is always left after editing.
    pub raw_mode_depth: Arc<AtomicUsize>,
}

impl MockEventSource {
    pub fn new(events: impl IntoIterator<Item = CrosstermEventResult>) -> Self {
        Self {
            events: events.into_iter().collect(),
            raw_mode_depth: Arc::default(),
        }
    }

    /// Key presses for `text`, see [`typed_events`].
    pub fn from_typed(text: &str) -> Self { Self::new(typed_events(text)) }
}

/// Key presses for every char in `text`. A `\n` becomes Enter.
pub fn typed_events(text: &str) -> Vec<CrosstermEventResult> {
    text.chars()
        .map(|c| {
            let code = if c == '\n' { KeyCode::Enter } else { KeyCode::Char(c) };
            Ok(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
        })
        .collect()
}

impl EventSource for MockEventSource {
    fn next_event(&mut self) -> CrosstermEventResult {
        self.events.pop_front().unwrap_or_else(|| {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no more mock events"))
        })
    }

    fn enter_raw_mode(&mut self) -> io::Result<()> {
        self.raw_mode_depth.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> io::Result<()> {
        self.raw_mode_depth.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }

    fn terminal_size(&self) -> (u16, u16) { (80, 24) }
}
