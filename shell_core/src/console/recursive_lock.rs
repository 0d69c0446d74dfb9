// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{marker::PhantomData,
          sync::{Condvar, PoisonError},
          thread::{self, ThreadId}};

use crate::{ConsoleError, StdMutex};

#[derive(Debug, Default)]
struct LockState {
    owner: Option<ThreadId>,
    depth: usize,
}

/// A mutual exclusion lock that the thread holding it may acquire again. It guards no
/// data of its own, it serializes whole console operations (which may nest, eg a tagged
/// error print reusing the plain print) across threads.
#[derive(Debug, Default)]
pub struct RecursiveLock {
    state: StdMutex<LockState>,
    released: Condvar,
}

/// Releases one level of a [`RecursiveLock`] on drop. It is tied to the thread that
/// acquired it, so it is neither [`Send`] nor [`Sync`].
#[derive(Debug)]
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct RecursiveLockGuard<'a> {
    lock: &'a RecursiveLock,
    _not_send: PhantomData<*const ()>,
}

impl RecursiveLock {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Block until the lock is free or already held by the calling thread, then take
    /// one more level of it.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::LockPoisoned`] (logged) if a thread panicked while updating the
    /// lock bookkeeping.
    pub fn lock(&self) -> Result<RecursiveLockGuard<'_>, ConsoleError> {
        let me = thread::current().id();
        let mut state = self
            .state
            .lock()
            .map_err(|_| ConsoleError::LockPoisoned.logged())?;

        loop {
            match state.owner {
                None => {
                    state.owner = Some(me);
                    state.depth = 1;
                    break;
                }
                Some(owner) if owner == me => {
                    state.depth += 1;
                    break;
                }
                Some(_) => {
                    state = self
                        .released
                        .wait(state)
                        .map_err(|_| ConsoleError::LockPoisoned.logged())?;
                }
            }
        }

        Ok(RecursiveLockGuard {
            lock: self,
            _not_send: PhantomData,
        })
    }

    /// How many times the calling thread holds the lock, `0` if it doesn't.
    #[must_use]
    pub fn held_depth(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.owner == Some(thread::current().id()) {
            state.depth
        } else {
            0
        }
    }
}

impl Drop for RecursiveLockGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.lock.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.depth = state.depth.saturating_sub(1);
        if state.depth == 0 {
            state.owner = None;
            drop(state);
            self.lock.released.notify_one();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::{sync::{Arc, mpsc},
              time::Duration};

    #[test]
    fn test_same_thread_reenters() {
        let lock = RecursiveLock::new();
        assert_eq!(lock.held_depth(), 0);

        let outer = lock.lock().unwrap();
        let inner = lock.lock().unwrap();
        assert_eq!(lock.held_depth(), 2);

        drop(inner);
        assert_eq!(lock.held_depth(), 1);
        drop(outer);
        assert_eq!(lock.held_depth(), 0);
    }

    #[test]
    fn test_other_thread_waits_for_full_release() {
        let lock = Arc::new(RecursiveLock::new());
        let (sender, receiver) = mpsc::channel();

        let outer = lock.lock().unwrap();
        let inner = lock.lock().unwrap();

        let handle = {
            let lock = lock.clone();
            thread::spawn(move || {
                let _guard = lock.lock().unwrap();
                sender.send(()).unwrap();
            })
        };

        drop(inner);
        assert!(receiver.recv_timeout(Duration::from_millis(100)).is_err());

        drop(outer);
        receiver.recv_timeout(Duration::from_secs(5)).unwrap();
        handle.join().unwrap();
        assert_eq!(lock.held_depth(), 0);
    }
}
