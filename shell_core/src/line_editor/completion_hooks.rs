// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Process wide completion and hint callbacks consulted by [`crate::LineState`].
//!
//! These are plain function pointers with no captured context, so exactly one set is
//! active per process. [`crate::Console::bind_completion_source`] layers an object
//! oriented, single owner binding on top of these.

use crossterm::style::Color;
use std::sync::PoisonError;

use crate::{InlineVec, StdMutex};

/// Candidates collected by a [`CompletionCallback`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completions {
    pub candidates: InlineVec<String>,
}

impl Completions {
    pub fn add(&mut self, candidate: impl Into<String>) {
        self.candidates.push(candidate.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.candidates.is_empty() }

    #[must_use]
    pub fn len(&self) -> usize { self.candidates.len() }
}

/// Text shown dimly to the right of the line being edited, eg the expected arguments of
/// a command. It is never part of the accepted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub text: String,
    pub color: Option<Color>,
    pub bold: bool,
}

impl Hint {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: false,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }
}

/// Receives the whole line and adds candidates that replace it.
pub type CompletionCallback = fn(&str, &mut Completions);

/// Receives the whole line and returns the hint to show after it, if any.
pub type HintsCallback = fn(&str) -> Option<Hint>;

#[derive(Debug, Clone, Copy)]
struct Hooks {
    completion: Option<CompletionCallback>,
    hints: Option<HintsCallback>,
}

static HOOKS: StdMutex<Hooks> = StdMutex::new(Hooks {
    completion: None,
    hints: None,
});

fn hooks() -> Hooks { *HOOKS.lock().unwrap_or_else(PoisonError::into_inner) }

/// Install (or with [`None`], remove) the completion callback. Returns the one that was
/// installed before.
pub fn set_completion_callback(
    callback: Option<CompletionCallback>,
) -> Option<CompletionCallback> {
    let mut hooks = HOOKS.lock().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut hooks.completion, callback)
}

/// Install (or with [`None`], remove) the hints callback. Returns the one that was
/// installed before.
pub fn set_hints_callback(callback: Option<HintsCallback>) -> Option<HintsCallback> {
    let mut hooks = HOOKS.lock().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut hooks.hints, callback)
}

/// Run the installed completion callback against `line`. The lock is not held while the
/// callback runs, so a callback may itself install or remove hooks.
#[must_use]
pub fn complete(line: &str) -> Completions {
    let mut completions = Completions::default();
    if let Some(callback) = hooks().completion {
        callback(line, &mut completions);
    }
    completions
}

/// Run the installed hints callback against `line`.
#[must_use]
pub fn hint(line: &str) -> Option<Hint> { hooks().hints.and_then(|callback| callback(line)) }

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    fn complete_colors(line: &str, completions: &mut Completions) {
        for it in ["red", "green", "grey"] {
            if it.starts_with(line) {
                completions.add(it);
            }
        }
    }

    fn hint_colors(line: &str) -> Option<Hint> {
        (line == "gr").then(|| Hint::new("een|ey").with_color(Color::DarkGrey))
    }

    #[serial]
    #[test]
    fn test_no_hooks_installed() {
        set_completion_callback(None);
        set_hints_callback(None);
        assert!(complete("anything").is_empty());
        assert_eq!(hint("anything"), None);
    }

    #[serial]
    #[test]
    fn test_install_and_replace() {
        assert!(set_completion_callback(Some(complete_colors)).is_none());
        set_hints_callback(Some(hint_colors));

        let completions = complete("gr");
        assert_eq!(completions.candidates.as_slice(), ["green", "grey"]);
        assert_eq!(hint("gr").map(|it| it.text), Some("een|ey".to_string()));
        assert_eq!(hint("g"), None);

        assert!(set_completion_callback(None).is_some());
        assert!(set_hints_callback(None).is_some());
        assert!(complete("gr").is_empty());
    }
}
