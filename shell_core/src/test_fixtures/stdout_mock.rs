// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{Result, Write},
          sync::{Arc, PoisonError,
                 atomic::{AtomicUsize, Ordering}}};
use strip_ansi_escapes::strip;

use crate::StdMutex;

/// You can safely clone this struct, since it only contains [Arc]s. The inner `buffer`
/// will not be cloned, just the [Arc] will be cloned. So a test can
/// hand one clone to a [`crate::Console`] as its output, and inspect what was written
/// through the other.
#[derive(Debug, Clone, Default)]
pub struct StdoutMock {
    pub buffer: Arc<StdMutex<Vec<u8>>>,
    /// Number of [`Write::flush`] calls, shared between clones.
    pub flush_count: Arc<AtomicUsize>,
}

impl StdoutMock {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn get_copy_of_buffer(&self) -> Vec<u8> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn get_copy_of_buffer_as_string(&self) -> String {
        String::from_utf8_lossy(&self.get_copy_of_buffer()).into_owned()
    }

    #[must_use]
    pub fn get_copy_of_buffer_as_string_strip_ansi(&self) -> String {
        String::from_utf8_lossy(&strip(self.get_copy_of_buffer())).into_owned()
    }

    #[must_use]
    pub fn get_flush_count(&self) -> usize { self.flush_count.load(Ordering::SeqCst) }

    /// Drop everything written so far, and reset the flush count.
    pub fn clear(&self) {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.flush_count.store(0, Ordering::SeqCst);
    }
}

impl Write for StdoutMock {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> {
        self.flush_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
