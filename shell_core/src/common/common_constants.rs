// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Maximum number of entries kept by [`crate::History`] unless configured otherwise.
pub const HISTORY_SIZE_MAX: usize = 1_000;

/// Prefix added to the format of [`crate::Console::warning`].
pub const WARNING_TAG: &str = "Warning: ";

/// Prefix added to the format of [`crate::Console::error`].
pub const ERROR_TAG: &str = "Error: ";

/// Line terminator appended by [`crate::Console::print`] and friends.
pub const LINE_TERMINATOR: &[u8] = b"\n";

/// Backspace, space, backspace. Erases the byte to the left of the caret on a terminal,
/// and leaves the caret where the erased byte used to be.
pub const ERASE_TRIPLE: &[u8] = b"\x08 \x08";
