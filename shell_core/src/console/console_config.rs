// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;

use crate::HISTORY_SIZE_MAX;

/// Settings for [`crate::Console::new`].
///
/// ```
/// use shell_core::ConsoleConfig;
///
/// let config = ConsoleConfig::default()
///     .with_history_path("/tmp/.shell_history")
///     .with_history_max_size(200)
///     .with_line_editing(false);
/// assert_eq!(config.history_max_size, 200);
/// assert!(config.print_line_on_enter);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Line history file. Loaded when the console is created (a missing file is not an
    /// error), and saved again after every accepted interactive line.
    pub history_path: Option<PathBuf>,
    pub history_max_size: usize,
    /// Keep the prompt and the accepted line on screen after Enter.
    pub print_line_on_enter: bool,
    /// Use the line editor for interactive reads. When off, interactive reads print the
    /// prompt and read a raw line from the input stream, which is what a script or a
    /// pipe needs.
    pub line_editing: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            history_path: None,
            history_max_size: HISTORY_SIZE_MAX,
            print_line_on_enter: true,
            line_editing: true,
        }
    }
}

impl ConsoleConfig {
    #[must_use]
    pub fn with_history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_history_max_size(mut self, max_size: usize) -> Self {
        self.history_max_size = max_size;
        self
    }

    #[must_use]
    pub fn with_print_line_on_enter(mut self, print_line_on_enter: bool) -> Self {
        self.print_line_on_enter = print_line_on_enter;
        self
    }

    #[must_use]
    pub fn with_line_editing(mut self, line_editing: bool) -> Self {
        self.line_editing = line_editing;
        self
    }
}
