// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{self, BufReader},
          mem,
          sync::{Arc, MutexGuard,
                 atomic::{AtomicBool, AtomicUsize, Ordering}}};

use crate::{ByteBuffer, CompletionSource, ConsoleConfig, ConsoleError, CrosstermEventSource,
            EventSource, LineEditor, RecursiveLock, RecursiveLockGuard, SendBufRead,
            SendRawTerminal, StdMutex, readline_bridge};

static NEXT_CONSOLE_ID: AtomicUsize = AtomicUsize::new(1);

/// Everything the output path touches. Only ever locked briefly, inside a console
/// operation that already holds the [`RecursiveLock`], and never across a call into
/// another console operation.
///
/// Lock order is `reading`, then the [`RecursiveLock`], then `state`. The `input` and
/// `events` stream mutexes are leaves: nothing else is acquired while one is held.
pub(crate) struct ConsoleState {
    pub(crate) output: Box<SendRawTerminal>,
    /// Double buffer for [`Console::reprint`]. `buffers[baseline]` holds what is on
    /// screen, the other slot is formatted into next.
    pub(crate) buffers: [ByteBuffer; 2],
    pub(crate) baseline: usize,
    pub(crate) editor: LineEditor,
}

impl ConsoleState {
    pub(crate) fn scratch_slot(&self) -> usize { 1 - self.baseline }
}

/// Thread safe console over an input and an output stream.
///
/// - Line input: [`Self::get_line`], either through the [`crate::LineEditor`]
///   (interactive) or straight from the input stream (batch).
/// - Output: [`Self::print`], [`Self::warning`], [`Self::error`], and the incremental
///   [`Self::reprint`].
///
/// Every operation holds the console's recursive lock for its whole duration, and the
/// lock is public ([`Self::lock`]) so a caller can make a sequence of operations atomic
/// with respect to other threads. A blocking read does not hold the lock, so other
/// threads keep printing while a line is awaited.
///
/// ```
/// use shell_core::{Console, ConsoleConfig, StdoutMock};
///
/// let stdout_mock = StdoutMock::default();
/// let console = Console::new(
///     Box::new(&b"first\nsecond\n"[..]),
///     Box::new(stdout_mock.clone()),
///     ConsoleConfig::default(),
/// );
///
/// assert_eq!(console.get_line("> ", false).as_deref(), Some("first"));
/// console.print(format_args!("got {}", 42)).unwrap();
/// assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "got 42\n");
/// ```
pub struct Console {
    pub(crate) id: usize,
    lock: RecursiveLock,
    /// Serializes interactive reads, held for a whole [`Console::get_line`].
    pub(crate) reading: StdMutex<()>,
    pub(crate) state: StdMutex<ConsoleState>,
    pub(crate) input: StdMutex<Box<SendBufRead>>,
    pub(crate) events: StdMutex<Box<dyn EventSource>>,
    pub(crate) input_eof: AtomicBool,
    pub(crate) line_editing: bool,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("id", &self.id)
            .field("input_eof", &self.input_eof.load(Ordering::Relaxed))
            .field("line_editing", &self.line_editing)
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Create a console reading lines from `input` and writing to `output`. Interactive
    /// key presses come from the terminal, see [`Self::set_event_source`] to change
    /// that.
    pub fn new(
        input: Box<SendBufRead>,
        output: Box<SendRawTerminal>,
        config: ConsoleConfig,
    ) -> Self {
        Self::new_with_event_source(input, output, Box::new(CrosstermEventSource), config)
    }

    /// Create a console over the process's stdin and stdout.
    #[must_use]
    pub fn new_stdio(config: ConsoleConfig) -> Self {
        Self::new(
            Box::new(BufReader::new(io::stdin())),
            Box::new(io::stdout()),
            config,
        )
    }

    pub fn new_with_event_source(
        input: Box<SendBufRead>,
        output: Box<SendRawTerminal>,
        events: Box<dyn EventSource>,
        config: ConsoleConfig,
    ) -> Self {
        let mut editor = LineEditor::new(events.terminal_size());
        if let Some(path) = config.history_path {
            editor = editor.with_history_path(path);
        }
        editor.set_max_history(config.history_max_size);
        editor.should_print_line_on(config.print_line_on_enter, false);

        let id = NEXT_CONSOLE_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(id, line_editing = config.line_editing, "console created");

        Self {
            id,
            lock: RecursiveLock::new(),
            reading: StdMutex::new(()),
            state: StdMutex::new(ConsoleState {
                output,
                buffers: [ByteBuffer::new(), ByteBuffer::new()],
                baseline: 0,
                editor,
            }),
            input: StdMutex::new(input),
            events: StdMutex::new(events),
            input_eof: AtomicBool::new(false),
            line_editing: config.line_editing,
        }
    }

    /// Unique within the process, used to tell consoles apart in logs and in
    /// [`ConsoleError::BindingInUse`].
    #[must_use]
    pub fn id(&self) -> usize { self.id }

    /// Acquire the console lock. Nested calls from the same thread don't block. Other
    /// threads' console operations wait until every guard of this thread is dropped.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::LockPoisoned`] if a thread panicked while holding it.
    pub fn lock(&self) -> Result<RecursiveLockGuard<'_>, ConsoleError> { self.lock.lock() }

    /// Whether the calling thread holds the console lock.
    pub(crate) fn is_locked_by_current_thread(&self) -> bool { self.lock.held_depth() > 0 }

    pub(crate) fn state(&self) -> Result<MutexGuard<'_, ConsoleState>, ConsoleError> {
        self.state.lock().map_err(|_| ConsoleError::LockPoisoned.logged())
    }

    pub(crate) fn input(&self) -> Result<MutexGuard<'_, Box<SendBufRead>>, ConsoleError> {
        self.input.lock().map_err(|_| ConsoleError::LockPoisoned.logged())
    }

    pub(crate) fn event_source(
        &self,
    ) -> Result<MutexGuard<'_, Box<dyn EventSource>>, ConsoleError> {
        self.events.lock().map_err(|_| ConsoleError::LockPoisoned.logged())
    }

    /// Redirect line input, eg to a script file. Returns the previous input so it can be
    /// restored. Clears the end of input flag.
    ///
    /// A batch read in progress finishes on the old input first. The console lock is not
    /// taken, so other threads keep printing while this waits.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::LockPoisoned`].
    pub fn set_input(&self, input: Box<SendBufRead>) -> Result<Box<SendBufRead>, ConsoleError> {
        let mut current = self.input()?;
        self.input_eof.store(false, Ordering::SeqCst);
        Ok(mem::replace(&mut *current, input))
    }

    /// Redirect output. Returns the previous output so it can be restored.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::LockPoisoned`].
    pub fn set_output(
        &self,
        output: Box<SendRawTerminal>,
    ) -> Result<Box<SendRawTerminal>, ConsoleError> {
        let _guard = self.lock()?;
        let mut state = self.state()?;
        Ok(mem::replace(&mut state.output, output))
    }

    /// Swap where interactive key presses come from. Returns the previous source.
    ///
    /// During an interactive read this waits for the key press being awaited, and the
    /// rest of the line is read from `events`. The console lock is not taken.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::LockPoisoned`].
    pub fn set_event_source(
        &self,
        events: Box<dyn EventSource>,
    ) -> Result<Box<dyn EventSource>, ConsoleError> {
        let mut current = self.event_source()?;
        Ok(mem::replace(&mut *current, events))
    }

    /// Whether the last line read hit the end of the input stream (or Ctrl+D in the line
    /// editor).
    #[must_use]
    pub fn is_input_eof(&self) -> bool { self.input_eof.load(Ordering::SeqCst) }

    /// Bind `source` to the line editor's tab completion and hints. Only one console per
    /// process can hold this binding, it is released by [`Self::unbind_completion_source`]
    /// or when this console is dropped.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::BindingInUse`] if another console holds the binding.
    pub fn bind_completion_source(
        &self,
        source: Arc<dyn CompletionSource>,
    ) -> Result<(), ConsoleError> {
        readline_bridge::bind(self.id, source)
    }

    /// Returns whether this console held the binding.
    pub fn unbind_completion_source(&self) -> bool { readline_bridge::release(self.id) }
}

impl Drop for Console {
    fn drop(&mut self) {
        readline_bridge::release(self.id);
        if let Ok(mut state) = self.state.lock() {
            for buffer in &mut state.buffers {
                buffer.clear();
            }
            // Nothing left to report a failed flush to.
            state.output.flush().ok();
        }
        tracing::debug!(id = self.id, "console dropped");
    }
}
