use async_trait::async_trait;

use crate::app::App;
use crate::engine::Completion;
use crate::errors::ModuleError;

/// A module's start or stop capability.
///
/// The hook receives the app as context and a [`Completion`] handle. It must
/// eventually call the handle exactly once, either before returning
/// (synchronous completion) or later from any thread (asynchronous
/// completion). Returning `Err` instead counts as a thrown failure and the
/// handle must then be left alone.
pub trait LifecycleHook: Send + Sync {
    fn call(&self, app: &App, done: Completion) -> Result<(), ModuleError>;
}

impl<F> LifecycleHook for F
where
    F: Fn(&App, Completion) -> Result<(), ModuleError> + Send + Sync,
{
    fn call(&self, app: &App, done: Completion) -> Result<(), ModuleError> {
        self(app, done)
    }
}

/// A module written as async code.
///
/// Wrap it with [`ModuleDescriptor::from_async`](crate::modules::ModuleDescriptor::from_async);
/// each call is spawned on the current tokio runtime and its result is fed to
/// the completion handle.
#[async_trait]
pub trait AsyncLifecycle: Send + Sync + 'static {
    async fn start(&self, app: App) -> Result<(), ModuleError>;

    async fn stop(&self, _app: App) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Whether the module needs a teardown step at all
    fn has_stop(&self) -> bool {
        true
    }
}
