// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in module behaviours used by config-driven apps, the CLI demo and tests.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::app::App;
use crate::engine::Completion;
use crate::errors::{ModuleError, Phase};
use crate::traits::{AsyncLifecycle, LifecycleHook};

/// The cause reported by a [`FailingHook`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SimulatedFailure(pub String);

/// Completes inside the hook call.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateHook;

impl LifecycleHook for ImmediateHook {
    fn call(&self, app: &App, done: Completion) -> Result<(), ModuleError> {
        app.silly(format!("{} {}: immediate", done.module(), done.phase()));
        done.ok()?;
        Ok(())
    }
}

/// Completes after a delay, from a tokio task.
#[derive(Debug, Clone)]
pub struct DeferredModule {
    delay: Duration,
    stoppable: bool,
}

impl DeferredModule {
    pub fn new(delay: Duration, stoppable: bool) -> Self {
        Self { delay, stoppable }
    }
}

#[async_trait]
impl AsyncLifecycle for DeferredModule {
    async fn start(&self, _app: App) -> Result<(), ModuleError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn stop(&self, _app: App) -> Result<(), ModuleError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    fn has_stop(&self) -> bool {
        self.stoppable
    }
}

/// Reports a [`SimulatedFailure`] through its completion handle.
#[derive(Debug, Clone)]
pub struct FailingHook {
    message: String,
}

impl FailingHook {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn for_phase(phase: Phase) -> Self {
        Self::new(format!("Simulated {} failure", phase))
    }
}

impl LifecycleHook for FailingHook {
    fn call(&self, _app: &App, done: Completion) -> Result<(), ModuleError> {
        done.fail(SimulatedFailure(self.message.clone()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::app::AppState;
    use crate::errors::LifecycleError;
    use crate::modules::ModuleDescriptor;

    #[tokio::test]
    async fn test_immediate_and_deferred_modules() {
        let app = App::builder().build().unwrap();
        app.register(ModuleDescriptor::from_hook("fast", Arc::new(ImmediateHook)))
            .unwrap();
        app.register(
            ModuleDescriptor::from_async("slow", DeferredModule::new(Duration::from_millis(5), true))
                .with_deps(["fast"]),
        )
        .unwrap();

        app.start(["slow"]).await.unwrap();
        assert_eq!(app.running_modules(), vec!["fast", "slow"]);

        app.stop().await.unwrap();
        assert!(app.running_modules().is_empty());
        assert_eq!(app.state(), AppState::Stopped);
    }

    #[tokio::test]
    async fn test_failing_hook_reports_message() {
        let app = App::builder().build().unwrap();
        app.register(ModuleDescriptor::from_hook(
            "broken",
            Arc::new(FailingHook::for_phase(Phase::Start)),
        ))
        .unwrap();

        let err = app.start(["broken"]).await.unwrap_err();
        assert!(matches!(err, LifecycleError::ModuleStartFailure { .. }));
        assert_eq!(
            err.to_string(),
            "Module 'broken' failed to start (reported): Simulated start failure"
        );
    }

    #[test]
    fn test_deferred_has_stop_follows_flag() {
        assert!(DeferredModule::new(Duration::ZERO, true).has_stop());
        assert!(!DeferredModule::new(Duration::ZERO, false).has_stop());
    }
}
