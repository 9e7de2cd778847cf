// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The sequential drive loop behind `start` and `stop`.
//!
//! A [`Drive`] walks the resolved initialization order one module at a time,
//! forwards on `start` and backwards on `stop`. Each hook gets a
//! [`Completion`]; the next module begins only after the previous one reported
//! success.
//!
//! Modules may complete synchronously (inside the hook call) or later from any
//! thread. Synchronous completions are absorbed by a loop instead of recursion,
//! so arbitrarily long chains of synchronous modules run in constant stack:
//!
//! - before a hook is called, `pending` is set to 1
//! - the completion path decrements it; if that reaches 0 the hook has not
//!   returned yet, so the completion path simply returns and lets the loop
//!   carry on
//! - after the hook returns, the loop increments it; a result of 1 means the
//!   module already completed and the loop advances in place, anything else
//!   means completion is still outstanding (or failed) and the loop exits
//!
//! Whichever side observes the other finishing is the one that continues,
//! which also makes a completion racing in from another thread safe.
//!
//! The final result always reaches the caller through the app's
//! [`Scheduler`](crate::traits::Scheduler), never inline.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicIsize, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::app::App;
use crate::errors::{FailureOrigin, LifecycleError, ModuleError, Phase};
use crate::observability::messages::lifecycle::{AppFailed, SyncChainYielded};
use crate::observability::messages::module::{
    CompletionCalledTwice, LateCompletion, ModuleFailed, ModuleStarted, ModuleStarting,
    ModuleStopped, ModuleStopping,
};

/// Callback receiving the outcome of a whole `start` or `stop` run.
pub type DoneCallback = Box<dyn FnOnce(Result<(), LifecycleError>) + Send + 'static>;

/// One `start` or `stop` run over the app's initialization order.
pub(crate) struct Drive {
    app: App,
    phase: Phase,
    pending: AtomicIsize,
    finished: AtomicBool,
    on_done: Mutex<Option<DoneCallback>>,
    sync_batch_limit: usize,
}

impl Drive {
    /// Begin driving `phase`. The app must already be in `Starting` or
    /// `Stopping` with its cursor positioned before the first module.
    pub(crate) fn launch(app: App, phase: Phase, sync_batch_limit: usize, on_done: DoneCallback) {
        let drive = Arc::new(Self {
            app,
            phase,
            pending: AtomicIsize::new(0),
            finished: AtomicBool::new(false),
            on_done: Mutex::new(Some(on_done)),
            sync_batch_limit,
        });
        drive.run();
    }

    fn run(self: &Arc<Self>) {
        let mut completed = 0usize;

        loop {
            if self.sync_batch_limit > 0 && completed >= self.sync_batch_limit {
                self.app.emit(&SyncChainYielded {
                    phase: self.phase,
                    completed,
                });
                let drive = Arc::clone(self);
                self.app.defer(Box::new(move || drive.run()));
                return;
            }

            let descriptor = match self.app.advance_cursor(self.phase) {
                Ok(Some(descriptor)) => descriptor,
                Ok(None) => {
                    self.succeed();
                    return;
                }
                Err(error) => {
                    self.abort(error);
                    return;
                }
            };
            let name = descriptor.name();

            let Some(hook) = descriptor.hook(self.phase) else {
                // Nothing to tear down; the module counts as stopped.
                self.app.emit(&ModuleStopping {
                    module: name,
                    has_stop: false,
                });
                self.app.record_module_done(self.phase, name);
                completed += 1;
                continue;
            };

            match self.phase {
                Phase::Start => self.app.emit(&ModuleStarting { module: name }),
                Phase::Stop => self.app.emit(&ModuleStopping {
                    module: name,
                    has_stop: true,
                }),
            }

            self.pending.store(1, Ordering::SeqCst);
            let completion = Completion::new(Arc::clone(self), name);

            if let Err(cause) = hook.call(&self.app, completion) {
                self.thrown(name, cause);
                return;
            }

            if self.pending.fetch_add(1, Ordering::SeqCst) + 1 != 1 {
                // Completion is still outstanding, or the module failed.
                return;
            }
            completed += 1;
        }
    }

    fn on_complete(self: &Arc<Self>, module: &str, result: Result<(), ModuleError>) {
        if self.finished.load(Ordering::SeqCst) {
            self.app.emit(&LateCompletion {
                module,
                phase: self.phase,
                failed: result.is_err(),
            });
            return;
        }

        if let Err(cause) = result {
            self.fail(module, FailureOrigin::Reported, cause);
            return;
        }

        self.app.record_module_done(self.phase, module);
        match self.phase {
            Phase::Start => self.app.emit(&ModuleStarted { module }),
            Phase::Stop => self.app.emit(&ModuleStopped { module }),
        }

        if self.pending.fetch_sub(1, Ordering::SeqCst) - 1 == 0 {
            // The hook has not returned yet; the loop in `run` continues.
            return;
        }
        self.run();
    }

    /// A hook returned `Err`. A protocol violation propagated with `?` ends
    /// the run as itself rather than as a module failure.
    fn thrown(&self, module: &str, cause: ModuleError) {
        match cause.downcast::<LifecycleError>() {
            Ok(error) if matches!(*error, LifecycleError::ProtocolViolation { .. }) => {
                self.abort(*error)
            }
            Ok(error) => self.fail(module, FailureOrigin::Thrown, error),
            Err(cause) => self.fail(module, FailureOrigin::Thrown, cause),
        }
    }

    fn succeed(&self) {
        if self.finished.swap(true, Ordering::SeqCst) {
            return;
        }
        self.app.finish_run(self.phase);
        self.deliver(Ok(()));
    }

    fn fail(&self, module: &str, origin: FailureOrigin, cause: ModuleError) {
        if self.finished.load(Ordering::SeqCst) {
            self.app.emit(&LateCompletion {
                module,
                phase: self.phase,
                failed: true,
            });
            return;
        }

        self.app.emit(&ModuleFailed {
            module,
            phase: self.phase,
            origin,
            error: &*cause,
        });
        self.abort(LifecycleError::module_failure(self.phase, module, origin, cause));
    }

    fn abort(&self, error: LifecycleError) {
        if self.finished.swap(true, Ordering::SeqCst) {
            return;
        }
        self.app.mark_failed();
        self.app.emit(&AppFailed {
            phase: self.phase,
            error: &error,
        });
        self.deliver(Err(error));
    }

    fn deliver(&self, result: Result<(), LifecycleError>) {
        let callback = self
            .on_done
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(callback) = callback {
            self.app.defer(Box::new(move || callback(result)));
        }
    }
}

/// The handle a module uses to report that its start or stop step finished.
///
/// Exactly one call to [`complete`](Self::complete), [`ok`](Self::ok) or
/// [`fail`](Self::fail) is expected, from any thread, either before the hook
/// returns or at any point after. Clones share the same call count. Every call
/// past the first is rejected with
/// [`LifecycleError::ProtocolViolation`] and does not affect the run.
#[derive(Clone)]
pub struct Completion {
    inner: Arc<CompletionInner>,
}

struct CompletionInner {
    drive: Arc<Drive>,
    module: String,
    calls: AtomicUsize,
}

impl Completion {
    fn new(drive: Arc<Drive>, module: &str) -> Self {
        Self {
            inner: Arc::new(CompletionInner {
                drive,
                module: module.to_string(),
                calls: AtomicUsize::new(0),
            }),
        }
    }

    /// Module this handle belongs to
    pub fn module(&self) -> &str {
        &self.inner.module
    }

    pub fn phase(&self) -> Phase {
        self.inner.drive.phase
    }

    /// Report the module's outcome.
    pub fn complete(&self, result: Result<(), ModuleError>) -> Result<(), LifecycleError> {
        let calls = self.inner.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if calls > 1 {
            if calls == 2 {
                self.inner.drive.app.emit(&CompletionCalledTwice {
                    module: &self.inner.module,
                    phase: self.phase(),
                });
            }
            return Err(LifecycleError::ProtocolViolation {
                module: self.inner.module.clone(),
                phase: self.phase(),
                calls,
            });
        }

        self.inner.drive.on_complete(&self.inner.module, result);
        Ok(())
    }

    /// Report success.
    pub fn ok(&self) -> Result<(), LifecycleError> {
        self.complete(Ok(()))
    }

    /// Report failure with `cause`.
    pub fn fail(&self, cause: impl Into<ModuleError>) -> Result<(), LifecycleError> {
        self.complete(Err(cause.into()))
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("module", &self.inner.module)
            .field("phase", &self.phase())
            .field("calls", &self.inner.calls.load(Ordering::SeqCst))
            .finish()
    }
}
