// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Line editing state machine used by [`crate::LineEditor`].
//!
//! | Module           | Responsibility                                            |
//! |------------------|-----------------------------------------------------------|
//! | `core`           | [`LineState`] struct, grapheme cursor math                |
//! | `event_handlers` | Key and resize dispatch, completion cycling               |
//! | `output`         | Printing above the line, prompt updates, exit             |
//! | `render`         | Clear and render of prompt, line and hint                 |

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Private modules organized by functional responsibility.
mod core;
mod event_handlers;
mod output;
mod render;

// Public re-exports (expose stable API).
pub use self::core::*;
