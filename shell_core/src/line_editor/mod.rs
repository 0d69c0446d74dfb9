// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Interactive line editing: edit in place, history recall, tab completion and hints.
//!
//! The editor never reads the terminal on its own. Events come from an
//! [`EventSource`], and output goes to whatever [`std::io::Write`] the caller passes in,
//! so the [`crate::Console`] decides which lock is held while rendering.
//!
//! | Key                    | Action                                       |
//! |------------------------|----------------------------------------------|
//! | Enter                  | Accept the line                              |
//! | Ctrl+C                 | Abandon the line                             |
//! | Ctrl+D                 | End of input on an empty line, else delete   |
//! | Left, Right, Home, End | Move the cursor (Ctrl+A and Ctrl+E too)      |
//! | Ctrl+Left, Ctrl+Right  | Move by word                                 |
//! | Backspace, Delete      | Delete a grapheme                            |
//! | Ctrl+U, Ctrl+W         | Delete to start of line, delete word         |
//! | Ctrl+L                 | Clear the screen                             |
//! | Up, Down               | Recall history                               |
//! | Tab, Esc               | Cycle completions, restore the original line |

// Attach.
pub mod completion_hooks;
pub mod event_source;
pub mod history;
pub mod line_state;
pub mod readline;

// Re-export.
pub use completion_hooks::{Completions, CompletionCallback, Hint, HintsCallback,
                           set_completion_callback, set_hints_callback};
pub use event_source::*;
pub use history::*;
pub use line_state::*;
pub use readline::*;
