// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Deferred execution for completion callbacks and trampoline yields.
//!
//! Two schedulers ship with the crate:
//!
//! - [`TokioScheduler`] spawns each task on a tokio runtime. This is what
//!   [`App::builder`](crate::app::App::builder) picks by default.
//! - [`ManualScheduler`] queues tasks until the caller pumps them, which makes
//!   "the callback has not run yet" observable in tests.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use tokio::runtime::Handle;

use crate::errors::LifecycleError;
use crate::traits::{Scheduler, Task};

/// Runs deferred tasks as tokio tasks.
#[derive(Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Bind to the runtime the caller is running in.
    pub fn current() -> Result<Self, LifecycleError> {
        Handle::try_current()
            .map(Self::from_handle)
            .map_err(|e| LifecycleError::NoRuntime(e.to_string()))
    }

    pub fn from_handle(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Scheduler for TokioScheduler {
    fn defer(&self, task: Task) {
        self.handle.spawn(async move { task() });
    }
}

impl fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioScheduler").finish_non_exhaustive()
    }
}

/// FIFO queue of tasks that only run when pumped.
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use the_appwood::engine::ManualScheduler;
/// use the_appwood::traits::Scheduler;
///
/// let scheduler = ManualScheduler::new();
/// let hits = Arc::new(AtomicUsize::new(0));
///
/// let counter = hits.clone();
/// scheduler.defer(Box::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// }));
///
/// assert_eq!(hits.load(Ordering::SeqCst), 0);
/// assert_eq!(scheduler.run_until_idle(), 1);
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// ```
#[derive(Default)]
pub struct ManualScheduler {
    queue: Mutex<VecDeque<Task>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the oldest queued task. Returns `false` when the queue was empty.
    pub fn run_next(&self) -> bool {
        // The lock is released before the task runs; tasks may defer more work.
        let task = self
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Run tasks, including ones queued along the way, until none remain.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }

    /// Number of tasks waiting to run
    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Scheduler for ManualScheduler {
    fn defer(&self, task: Task) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(task);
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}
