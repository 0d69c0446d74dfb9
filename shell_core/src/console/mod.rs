// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Thread safe console: line input, tagged printing, and incremental redraw.
//!
//! | Module            | Responsibility                                                |
//! |-------------------|---------------------------------------------------------------|
//! | `console_impl`    | [`Console`] struct, stream redirection, lock, binding         |
//! | `console_input`   | [`Console::get_line`], batch and interactive                  |
//! | `console_output`  | print, warning, error, double buffered [`Console::reprint`]   |
//! | `recursive_lock`  | [`RecursiveLock`] serializing whole console operations        |
//! | `readline_bridge` | the one process wide [`CompletionSource`] binding             |
//!
//! Two locks are involved. The [`RecursiveLock`] is held for the duration of every
//! public operation and may be taken by the caller too, see [`Console::lock`]. The
//! console state (output stream, redraw buffers, line editor) sits behind a plain mutex
//! that is only ever held inside a single operation, never across a nested one.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod console_config;
pub mod console_error;
pub mod console_impl;
pub mod readline_bridge;
pub mod recursive_lock;
mod console_input;
mod console_output;

// Re-export.
pub use console_config::*;
pub use console_error::*;
pub use console_impl::*;
pub use readline_bridge::{CompletionSource, bound_owner};
pub use recursive_lock::*;
