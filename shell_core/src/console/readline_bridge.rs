// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Adapter between the process wide callbacks of [`crate::line_editor`] and one
//! [`crate::Console`].
//!
//! The line editor only knows plain function pointers (see
//! [`crate::set_completion_callback`]), so the object that actually answers them is
//! parked in a static here. That makes this a hard single instance constraint: at most
//! one console per process has its [`CompletionSource`] bound at any time. Binding a
//! second one fails with [`ConsoleError::BindingInUse`] until the first is unbound or
//! dropped.

use std::sync::{Arc, PoisonError};

use crate::{Completions, ConsoleError, Hint, StdMutex, set_completion_callback,
            set_hints_callback};

/// Supplies tab completion candidates and hints for the line being edited. Both receive
/// the whole line typed so far.
pub trait CompletionSource: Send + Sync {
    /// Candidates that replace the whole line, in the order Tab cycles through them.
    fn complete(&self, line: &str) -> Vec<String>;

    /// Text shown after the line, eg the arguments a command expects.
    fn hint(&self, _line: &str) -> Option<Hint> { None }
}

struct Binding {
    owner: usize,
    source: Arc<dyn CompletionSource>,
}

static BINDING: StdMutex<Option<Binding>> = StdMutex::new(None);

/// Which console owns the callbacks, if any.
#[must_use]
pub fn bound_owner() -> Option<usize> {
    BINDING
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map(|binding| binding.owner)
}

/// Bind `source` on behalf of console `owner`. Re-binding by the same owner replaces
/// its source.
pub(crate) fn bind(owner: usize, source: Arc<dyn CompletionSource>) -> Result<(), ConsoleError> {
    let mut binding = BINDING.lock().map_err(|_| ConsoleError::LockPoisoned.logged())?;
    if let Some(existing) = binding.as_ref()
        && existing.owner != owner
    {
        return Err(ConsoleError::BindingInUse { owner: existing.owner }.logged());
    }

    *binding = Some(Binding { owner, source });
    set_completion_callback(Some(complete_trampoline));
    set_hints_callback(Some(hint_trampoline));
    tracing::debug!(owner, "completion source bound");
    Ok(())
}

/// Release the binding if `owner` holds it. Returns whether anything was released.
pub(crate) fn release(owner: usize) -> bool {
    let mut binding = BINDING.lock().unwrap_or_else(PoisonError::into_inner);
    if binding.as_ref().is_none_or(|it| it.owner != owner) {
        return false;
    }

    *binding = None;
    set_completion_callback(None);
    set_hints_callback(None);
    tracing::debug!(owner, "completion source released");
    true
}

/// The static lock is not held while the source runs.
fn bound_source() -> Option<Arc<dyn CompletionSource>> {
    BINDING
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map(|binding| binding.source.clone())
}

fn complete_trampoline(line: &str, completions: &mut Completions) {
    if let Some(source) = bound_source() {
        for candidate in source.complete(line) {
            completions.add(candidate);
        }
    }
}

fn hint_trampoline(line: &str) -> Option<Hint> { bound_source()?.hint(line) }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_editor::completion_hooks;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    struct Keywords(&'static [&'static str]);

    impl CompletionSource for Keywords {
        fn complete(&self, line: &str) -> Vec<String> {
            self.0
                .iter()
                .filter(|it| it.starts_with(line))
                .map(ToString::to_string)
                .collect()
        }

        fn hint(&self, line: &str) -> Option<Hint> {
            (line == "count").then(|| Hint::new(" <n>"))
        }
    }

    #[serial]
    #[test]
    fn test_bind_routes_hooks_to_source() {
        bind(901, Arc::new(Keywords(&["count", "clear", "exit"]))).unwrap();
        assert_eq!(bound_owner(), Some(901));

        let completions = completion_hooks::complete("c");
        assert_eq!(completions.candidates.as_slice(), ["count", "clear"]);
        assert_eq!(completion_hooks::hint("count"), Some(Hint::new(" <n>")));

        assert!(release(901));
        assert_eq!(bound_owner(), None);
        assert!(completion_hooks::complete("c").is_empty());
    }

    #[serial]
    #[test]
    fn test_single_owner() {
        bind(902, Arc::new(Keywords(&["a"]))).unwrap();

        let result = bind(903, Arc::new(Keywords(&["b"])));
        assert!(matches!(result, Err(ConsoleError::BindingInUse { owner: 902 })));

        // Same owner may replace its own source.
        bind(902, Arc::new(Keywords(&["c"]))).unwrap();
        assert_eq!(completion_hooks::complete("").candidates.as_slice(), ["c"]);

        assert!(!release(903));
        assert!(release(902));
        bind(903, Arc::new(Keywords(&["b"]))).unwrap();
        assert!(release(903));
    }
}
