// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;

use crate::app::App;
use crate::config::consts::{DEFAULT_PRIORITY, RESERVED_MODULE_NAMES};
use crate::engine::Completion;
use crate::errors::{ModuleError, Phase, RegistrationError};
use crate::traits::{AsyncLifecycle, LifecycleHook};

/// A named unit the app knows how to start and stop.
///
/// Descriptors are plain data plus two capabilities. They are immutable once
/// built; registering another descriptor with the same name replaces this one.
///
/// # Examples
///
/// ```
/// use the_appwood::modules::ModuleDescriptor;
///
/// let database = ModuleDescriptor::new("database", |_app, done| {
///     // open connections...
///     done.ok()?;
///     Ok(())
/// })
/// .with_deps(["config"])
/// .with_priority(1)
/// .with_stop(|_app, done| {
///     done.ok()?;
///     Ok(())
/// });
///
/// assert_eq!(database.name(), "database");
/// assert_eq!(database.deps(), ["config".to_string()]);
/// assert!(database.has_stop());
/// ```
#[derive(Clone)]
pub struct ModuleDescriptor {
    name: String,
    deps: Vec<String>,
    priority: i32,
    start: Arc<dyn LifecycleHook>,
    stop: Option<Arc<dyn LifecycleHook>>,
}

impl ModuleDescriptor {
    /// Create a descriptor with no dependencies, default priority and no stop hook.
    pub fn new<F>(name: impl Into<String>, start: F) -> Self
    where
        F: Fn(&App, Completion) -> Result<(), ModuleError> + Send + Sync + 'static,
    {
        Self::from_hook(name, Arc::new(start))
    }

    /// Create a descriptor from an already shared start hook.
    pub fn from_hook(name: impl Into<String>, start: Arc<dyn LifecycleHook>) -> Self {
        Self {
            name: name.into(),
            deps: Vec::new(),
            priority: DEFAULT_PRIORITY,
            start,
            stop: None,
        }
    }

    /// Adapt an async module. Each hook call spawns onto the current tokio
    /// runtime and reports the future's result through the completion handle.
    pub fn from_async<M: AsyncLifecycle>(name: impl Into<String>, module: M) -> Self {
        let module = Arc::new(module);
        let has_stop = module.has_stop();

        let start_module = module.clone();
        let descriptor = Self::new(name, move |app, done| {
            spawn_async_phase(start_module.clone(), Phase::Start, app, done)
        });

        if has_stop {
            descriptor.with_stop(move |app, done| spawn_async_phase(module.clone(), Phase::Stop, app, done))
        } else {
            descriptor
        }
    }

    pub fn with_deps<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deps = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_stop<F>(self, stop: F) -> Self
    where
        F: Fn(&App, Completion) -> Result<(), ModuleError> + Send + Sync + 'static,
    {
        self.with_stop_hook(Arc::new(stop))
    }

    pub fn with_stop_hook(mut self, stop: Arc<dyn LifecycleHook>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn deps(&self) -> &[String] {
        &self.deps
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn has_stop(&self) -> bool {
        self.stop.is_some()
    }

    /// Hook for `phase`; `None` only for a missing stop hook.
    pub fn hook(&self, phase: Phase) -> Option<&Arc<dyn LifecycleHook>> {
        match phase {
            Phase::Start => Some(&self.start),
            Phase::Stop => self.stop.as_ref(),
        }
    }

    /// Check the parts of a descriptor the type system can't.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        validate_module_name(&self.name)
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("name", &self.name)
            .field("deps", &self.deps)
            .field("priority", &self.priority)
            .field("has_stop", &self.has_stop())
            .finish()
    }
}

/// Reject empty, blank and reserved module names.
pub fn validate_module_name(name: &str) -> Result<(), RegistrationError> {
    if name.trim().is_empty() {
        return Err(RegistrationError::EmptyName { index: None });
    }
    if RESERVED_MODULE_NAMES.contains(&name) {
        return Err(RegistrationError::ReservedName {
            index: None,
            name: name.to_string(),
        });
    }
    Ok(())
}

fn spawn_async_phase<M: AsyncLifecycle>(
    module: Arc<M>,
    phase: Phase,
    app: &App,
    done: Completion,
) -> Result<(), ModuleError> {
    let handle = tokio::runtime::Handle::try_current()?;
    let app = app.clone();
    handle.spawn(async move {
        let result = match phase {
            Phase::Start => module.start(app).await,
            Phase::Stop => module.stop(app).await,
        };
        // A second completion can't happen here; the handle is used once.
        let _ = done.complete(result);
    });
    Ok(())
}

/// Anything that identifies a module by name.
pub trait ModuleRef {
    fn module_name(&self) -> &str;
}

impl ModuleRef for str {
    fn module_name(&self) -> &str {
        self
    }
}

impl ModuleRef for String {
    fn module_name(&self) -> &str {
        self
    }
}

impl ModuleRef for ModuleDescriptor {
    fn module_name(&self) -> &str {
        &self.name
    }
}
