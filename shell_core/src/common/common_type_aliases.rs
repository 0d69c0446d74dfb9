// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::event::Event;
use smallvec::SmallVec;
use std::io::Error;

/// Disambiguate the type of `StdMutex` from other mutex types.
pub type StdMutex<T> = std::sync::Mutex<T>;

/// Type alias for a `Send`-able output device (raw terminal, [`crate::StdoutMock`], a
/// script log file, etc).
pub type SendRawTerminal = dyn std::io::Write + Send;

/// Type alias for a `Send`-able buffered input stream (stdin, a script file, etc).
pub type SendBufRead = dyn std::io::BufRead + Send;

/// Type alias for crossterm (input) event result.
pub type CrosstermEventResult = Result<Event, Error>;

/// Stack allocated for small sizes, spills to the heap when it grows.
pub type InlineVec<T> = SmallVec<[T; DEFAULT_INLINE_VEC_SIZE]>;

pub const DEFAULT_INLINE_VEC_SIZE: usize = 8;
