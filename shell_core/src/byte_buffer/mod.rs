// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Growable byte buffer with a hidden NUL terminator.
//!
//! | Module           | Responsibility                                               |
//! |------------------|--------------------------------------------------------------|
//! | `buffer_core`    | [`ByteBuffer`] struct, resize, assign, append, views         |
//! | `buffer_format`  | exactly sized formatted write, [`buf_print!`]                |
//! | `buffer_edit`    | read / write at offset, trim, fill, insert, remove           |
//! | `buffer_search`  | literal forward / reverse search, first differing byte       |
//! | `hexdump`        | canonical hex / ASCII dump into the scratch buffer           |
//! | `tokenizer`      | destructive split, non destructive mark, nesting aware tokenize |

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod buffer_core;
pub mod buffer_edit;
pub mod buffer_error;
pub mod buffer_format;
pub mod buffer_search;
pub mod hexdump;
pub mod tokenizer;

// Re-export.
pub use buffer_core::*;
pub use buffer_edit::*;
pub use buffer_error::*;
pub use buffer_format::*;
pub use buffer_search::*;
pub use hexdump::*;
pub use tokenizer::*;
