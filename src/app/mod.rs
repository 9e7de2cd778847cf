// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The application container.
//!
//! An [`App`] owns a [`ModuleRegistry`], a lifecycle state machine and a log
//! sink. `start` resolves the requested modules into an initialization order
//! and starts them one by one; `stop` walks the same order backwards.
//!
//! `App` is a cheap handle: clones share the same underlying state, and every
//! hook receives one so modules can log, inspect the app, or reach the
//! scheduler.
//!
//! # Examples
//!
//! ```rust
//! use the_appwood::app::{App, AppState};
//! use the_appwood::modules::ModuleDescriptor;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let app = App::builder().build()?;
//!
//! app.register(ModuleDescriptor::new("config", |_app, done| {
//!     done.ok()?;
//!     Ok(())
//! }))?;
//! app.register(
//!     ModuleDescriptor::new("server", |app, done| {
//!         app.info("listening");
//!         done.ok()?;
//!         Ok(())
//!     })
//!     .with_deps(["config"]),
//! )?;
//!
//! app.start(["*"]).await?;
//! assert_eq!(app.state(), AppState::Running);
//! assert_eq!(app.init_order().unwrap(), vec!["config", "server"]);
//!
//! app.stop().await?;
//! assert!(app.is_stopped());
//! # Ok(())
//! # }
//! ```

mod state;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard};

use tokio::sync::oneshot;

use crate::config::consts::DEFAULT_SYNC_BATCH_LIMIT;
use crate::config::Config;
use crate::engine::{resolve, Drive, TokioScheduler};
use crate::errors::{LifecycleError, Phase, RegistrationError};
use crate::modules::{ModuleDescriptor, ModuleRef, ModuleRegistry};
use crate::observability::messages::lifecycle::{
    AppRunning, AppStarting, AppStopped, AppStopping, LifecycleMisuse, OrderResolved,
    ResolutionFailed,
};
use crate::observability::messages::module::ModuleRegistered;
use crate::observability::messages::StructuredLog;
use crate::observability::{BufferedSink, LogLevel, LogSink, SinkSlot};
use crate::traits::{Scheduler, Task};

pub(crate) use state::Lifecycle;
pub use state::{AppSnapshot, AppState};

/// Shared handle to an application container.
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

struct AppInner {
    registry: RwLock<ModuleRegistry>,
    lifecycle: Mutex<Lifecycle>,
    sink: SinkSlot,
    scheduler: Arc<dyn Scheduler>,
    sync_batch_limit: usize,
    settings: HashMap<String, serde_yaml::Value>,
    config: Option<Arc<Config>>,
}

impl App {
    pub fn builder() -> AppBuilder {
        AppBuilder::default()
    }

    // ---- registration ----

    /// Register one module, replacing any module of the same name.
    pub fn register(&self, descriptor: ModuleDescriptor) -> Result<(), RegistrationError> {
        let name = descriptor.name().to_string();
        let replaced = self.registry_mut().register(descriptor)?;
        self.emit(&ModuleRegistered {
            module: &name,
            replaced: replaced.is_some(),
        });
        Ok(())
    }

    /// Register a batch of modules. Nothing is registered if any is invalid.
    pub fn register_all<I>(&self, descriptors: I) -> Result<(), RegistrationError>
    where
        I: IntoIterator<Item = ModuleDescriptor>,
    {
        let descriptors: Vec<ModuleDescriptor> = descriptors.into_iter().collect();
        let names: Vec<String> = descriptors.iter().map(|d| d.name().to_string()).collect();

        let replaced = self.registry_mut().register_all(descriptors)?;
        for (name, previous) in names.iter().zip(replaced) {
            self.emit(&ModuleRegistered {
                module: name,
                replaced: previous.is_some(),
            });
        }
        Ok(())
    }

    // ---- lifecycle ----

    /// Start `required` modules (and their dependencies); `"*"` means all.
    ///
    /// Calling this outside `Pending` logs and returns a misuse error without
    /// touching the app, and `on_done` is never called. Otherwise the outcome
    /// is delivered to `on_done` exactly once, always through the scheduler.
    pub fn start_with<I, S, F>(&self, required: I, on_done: F) -> Result<(), LifecycleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnOnce(Result<(), LifecycleError>) + Send + 'static,
    {
        let required: Vec<String> = required.into_iter().map(Into::into).collect();

        let begun = self.lifecycle().begin_start();
        if let Err(kind) = begun {
            return Err(self.misuse(kind));
        }
        self.emit(&AppStarting {
            required: &required,
        });

        let resolved = resolve(&*self.registry(), &required);
        let order = match resolved {
            Ok(order) => order,
            Err(error) => {
                self.lifecycle().fail();
                self.emit(&ResolutionFailed { error: &error });
                let error = LifecycleError::from(error);
                self.defer(Box::new(move || on_done(Err(error))));
                return Ok(());
            }
        };

        self.emit(&OrderResolved { order: &order });
        {
            let mut lifecycle = self.lifecycle();
            lifecycle.init_order = Some(order.into());
            lifecycle.init_index = -1;
        }

        Drive::launch(
            self.clone(),
            Phase::Start,
            self.inner.sync_batch_limit,
            Box::new(on_done),
        );
        Ok(())
    }

    /// Stop every started module in reverse initialization order.
    ///
    /// Modules without a stop hook are skipped. Misuse is reported the same
    /// way as for [`start_with`](Self::start_with).
    pub fn stop_with<F>(&self, on_done: F) -> Result<(), LifecycleError>
    where
        F: FnOnce(Result<(), LifecycleError>) + Send + 'static,
    {
        let begun = self.lifecycle().begin_stop();
        if let Err(kind) = begun {
            return Err(self.misuse(kind));
        }
        self.emit(&AppStopping);

        Drive::launch(
            self.clone(),
            Phase::Stop,
            self.inner.sync_batch_limit,
            Box::new(on_done),
        );
        Ok(())
    }

    /// Async form of [`start_with`](Self::start_with).
    pub async fn start<I, S>(&self, required: I) -> Result<(), LifecycleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (tx, rx) = oneshot::channel();
        self.start_with(required, move |result| {
            let _ = tx.send(result);
        })?;
        rx.await.map_err(|_| LifecycleError::CompletionDropped)?
    }

    /// Async form of [`stop_with`](Self::stop_with).
    pub async fn stop(&self) -> Result<(), LifecycleError> {
        let (tx, rx) = oneshot::channel();
        self.stop_with(move |result| {
            let _ = tx.send(result);
        })?;
        rx.await.map_err(|_| LifecycleError::CompletionDropped)?
    }

    fn misuse(&self, kind: crate::errors::MisuseKind) -> LifecycleError {
        self.emit(&LifecycleMisuse { kind });
        LifecycleError::Misuse(kind)
    }

    // ---- introspection ----

    pub fn state(&self) -> AppState {
        self.lifecycle().state
    }

    pub fn is_running(&self) -> bool {
        self.state() == AppState::Running
    }

    pub fn is_stopped(&self) -> bool {
        self.state() == AppState::Stopped
    }

    /// Resolved initialization order, once `start` got past resolution.
    pub fn init_order(&self) -> Option<Vec<String>> {
        self.lifecycle().init_order.as_ref().map(|order| order.to_vec())
    }

    pub fn init_index(&self) -> isize {
        self.lifecycle().init_index
    }

    pub fn is_registered<R: ModuleRef + ?Sized>(&self, module: &R) -> bool {
        self.registry().is_registered(module)
    }

    /// Whether `module` has started and not yet stopped.
    pub fn is_running_module<R: ModuleRef + ?Sized>(&self, module: &R) -> bool {
        let name = module.module_name();
        self.lifecycle().running.iter().any(|m| m == name)
    }

    /// Registered descriptors, in registration order.
    pub fn registered_modules(&self) -> Vec<Arc<ModuleDescriptor>> {
        self.registry().iter().cloned().collect()
    }

    pub fn registered_names(&self) -> Vec<String> {
        self.registry().names().map(str::to_string).collect()
    }

    /// Running modules, in start order.
    pub fn running_modules(&self) -> Vec<String> {
        self.lifecycle().running.clone()
    }

    pub fn snapshot(&self) -> AppSnapshot {
        let registered = self.registered_names();
        let lifecycle = self.lifecycle();
        AppSnapshot {
            state: lifecycle.state,
            init_order: lifecycle.init_order.as_ref().map(|order| order.to_vec()),
            init_index: lifecycle.init_index,
            registered,
            running: lifecycle.running.clone(),
        }
    }

    // ---- logging ----

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.inner.sink.log(level, None, message);
    }

    pub fn silly(&self, message: impl Into<String>) {
        self.log(LogLevel::Silly, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Route logging to `sink`, replaying anything buffered so far.
    ///
    /// Returns the number of replayed records.
    pub fn switch_to_sink(&self, sink: Arc<dyn LogSink>) -> usize {
        self.inner.sink.switch_to(sink)
    }

    /// Go back to buffering records until the next [`switch_to_sink`](Self::switch_to_sink).
    pub fn switch_to_buffered(&self) {
        self.inner.sink.switch_to_buffered();
    }

    /// Write a structured message to the current sink.
    pub fn emit<M: StructuredLog + ?Sized>(&self, message: &M) {
        self.inner.sink.emit(message.to_record());
    }

    // ---- environment ----

    /// Run `task` later on the app's scheduler.
    pub fn defer(&self, task: Task) {
        self.inner.scheduler.defer(task);
    }

    /// Free-form setting supplied at build time.
    pub fn setting(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.inner.settings.get(key)
    }

    /// The config the app was built from, if any.
    pub fn config(&self) -> Option<&Config> {
        self.inner.config.as_deref()
    }

    // ---- drive hooks ----

    pub(crate) fn advance_cursor(
        &self,
        phase: Phase,
    ) -> Result<Option<Arc<ModuleDescriptor>>, LifecycleError> {
        let Some(name) = self.lifecycle().advance(phase) else {
            return Ok(None);
        };
        self.registry()
            .get(&name)
            .cloned()
            .map(Some)
            .ok_or_else(|| crate::errors::ResolveError::ModuleNotFound { name }.into())
    }

    pub(crate) fn record_module_done(&self, phase: Phase, module: &str) {
        self.lifecycle().record_done(phase, module);
    }

    pub(crate) fn finish_run(&self, phase: Phase) {
        let running = {
            let mut lifecycle = self.lifecycle();
            lifecycle.finish(phase);
            lifecycle.running.len()
        };
        match phase {
            Phase::Start => self.emit(&AppRunning {
                module_count: running,
            }),
            Phase::Stop => self.emit(&AppStopped),
        }
    }

    pub(crate) fn mark_failed(&self) {
        self.lifecycle().fail();
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.inner
            .lifecycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn registry(&self) -> RwLockReadGuard<'_, ModuleRegistry> {
        self.inner
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn registry_mut(&self) -> std::sync::RwLockWriteGuard<'_, ModuleRegistry> {
        self.inner
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("state", &self.state())
            .field("registered", &self.registered_names())
            .finish_non_exhaustive()
    }
}

/// Configures and builds an [`App`].
///
/// Without an explicit scheduler the app binds to the current tokio runtime;
/// without a sink it buffers records until one is attached.
pub struct AppBuilder {
    scheduler: Option<Arc<dyn Scheduler>>,
    sink: Option<Arc<dyn LogSink>>,
    sync_batch_limit: usize,
    settings: HashMap<String, serde_yaml::Value>,
    config: Option<Arc<Config>>,
    modules: Vec<ModuleDescriptor>,
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self {
            scheduler: None,
            sink: None,
            sync_batch_limit: DEFAULT_SYNC_BATCH_LIMIT,
            settings: HashMap::new(),
            config: None,
            modules: Vec::new(),
        }
    }
}

impl AppBuilder {
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Synchronous completions per drive frame before yielding; `0` never yields.
    pub fn sync_batch_limit(mut self, limit: usize) -> Self {
        self.sync_batch_limit = limit;
        self
    }

    pub fn settings(mut self, settings: HashMap<String, serde_yaml::Value>) -> Self {
        self.settings = settings;
        self
    }

    pub fn setting(mut self, key: impl Into<String>, value: serde_yaml::Value) -> Self {
        self.settings.insert(key.into(), value);
        self
    }

    /// Attach a loaded config; its settings are merged into the app's.
    pub fn config(mut self, config: Arc<Config>) -> Self {
        self.settings
            .extend(config.settings.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.config = Some(config);
        self
    }

    /// Modules registered, all-or-nothing, when the app is built.
    pub fn modules<I>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = ModuleDescriptor>,
    {
        self.modules.extend(modules);
        self
    }

    pub fn build(self) -> Result<App, LifecycleError> {
        let scheduler: Arc<dyn Scheduler> = match self.scheduler {
            Some(scheduler) => scheduler,
            None => Arc::new(TokioScheduler::current()?),
        };
        let sink = SinkSlot::new(
            self.sink
                .unwrap_or_else(|| Arc::new(BufferedSink::new()) as Arc<dyn LogSink>),
        );

        let app = App {
            inner: Arc::new(AppInner {
                registry: RwLock::new(ModuleRegistry::new()),
                lifecycle: Mutex::new(Lifecycle::new()),
                sink,
                scheduler,
                sync_batch_limit: self.sync_batch_limit,
                settings: self.settings,
                config: self.config,
            }),
        };

        if !self.modules.is_empty() {
            app.register_all(self.modules)?;
        }
        Ok(app)
    }
}
