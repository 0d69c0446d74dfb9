// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! `shell_core` is the foundation layer of an interactive command shell. Everything a
//! command dispatcher needs to read a line, split it into arguments, and write results
//! back to the terminal lives here.
//!
//! # Building blocks
//!
//! 1. [`ByteBuffer`] - a growable byte buffer that keeps a hidden NUL terminator one
//!    past its logical size, so it can be viewed as raw bytes ([`ByteBuffer::as_bytes`])
//!    or as a C string ([`ByteBuffer::as_c_str`]). It supports exactly sized formatted
//!    writes ([`buf_print!`]), bounds checked reads and writes at an offset, trimming,
//!    literal search, splicing, and a canonical hex dump.
//! 2. Tokenizing on top of [`ByteBuffer`]:
//!     - [`ByteBuffer::split`] - destructive split on a delimiter set.
//!     - [`ByteBuffer::mark`] - non destructive token boundary marking.
//!     - [`ByteBuffer::tokenize`] - nesting aware tokenizer that keeps quoted and
//!       bracketed runs together, see [`TokenizeOptions`].
//! 3. [`Console`] - wraps an input and an output stream behind a recursive lock, and
//!    offers line input (batch or interactive), one shot printing, tagged warnings and
//!    errors, and incremental redraw ([`Console::reprint`]) built on two
//!    [`ByteBuffer`]s used as a double buffer.
//! 4. [`line_editor`] - the interactive line editing facility (edit in place, history,
//!    tab completion and hints) that the [`Console`] delegates to in interactive mode.
//!
//! # Logging
//!
//! Every diagnostic goes through [`tracing`]. Nothing is installed by default, use
//! [`init_tracing`] with a [`TracingConfig`] to route it to stdout, stderr, or a file.
//!
//! # Example
//!
//! ```no_run
//! use shell_core::{Console, ConsoleConfig, ByteBuffer, TokenizeOptions,
//!                  EncapsulationPair};
//!
//! fn main() -> miette::Result<()> {
//!     let console = Console::new_stdio(ConsoleConfig::default());
//!     while let Some(line) = console.get_line("> ", true) {
//!         let mut buf = ByteBuffer::try_from(line.as_str())?;
//!         let options = TokenizeOptions::default()
//!             .with_pairs([EncapsulationPair::quote(b'"')])
//!             .with_ignore_prefix("#");
//!         buf.tokenize(&options)?;
//!         for token in buf.token_iter() {
//!             console.print(format_args!("{}", String::from_utf8_lossy(token)))?;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Enforce strict error handling in production library code only. Tests and examples are
// allowed to use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules (re-exported below to provide clean public API).
pub mod byte_buffer;
pub mod common;
pub mod console;
pub mod line_editor;
pub mod log;
pub mod test_fixtures;

// Re-export.
pub use byte_buffer::*;
pub use common::*;
pub use console::*;
pub use line_editor::*;
pub use log::*;
pub use test_fixtures::*;
