// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while driving modules through start and stop.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::{RegistrationError, ResolveError};

/// The cause a module hands back when it cannot start or stop.
///
/// Anything that converts into a boxed error works, so hooks can use `?` on
/// `std::io::Error`, `anyhow::Error`, plain strings and so on.
pub type ModuleError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which half of the lifecycle a module call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Start,
    Stop,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Start => write!(f, "start"),
            Phase::Stop => write!(f, "stop"),
        }
    }
}

/// How a module failure surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOrigin {
    /// The hook itself returned an error before handing control back
    Thrown,
    /// The module passed an error to its completion handle
    Reported,
}

impl fmt::Display for FailureOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureOrigin::Thrown => write!(f, "thrown"),
            FailureOrigin::Reported => write!(f, "reported"),
        }
    }
}

/// The ways `start`/`stop` can be called in a state that forbids them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MisuseKind {
    /// `start` after the app already left `Pending`
    AlreadyStarted,
    /// `stop` before the app reached `Running`
    NotRunning,
    /// `stop` while stopping, after stopping, or after a failure
    AlreadyStopping,
}

impl fmt::Display for MisuseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MisuseKind::AlreadyStarted => write!(f, "Attempt to start app multiple times"),
            MisuseKind::NotRunning => write!(f, "Attempt to stop a non-running app"),
            MisuseKind::AlreadyStopping => write!(f, "Attempt to stop app multiple times"),
        }
    }
}

/// Everything that can go wrong during a `start` or `stop` run.
///
/// Module causes are kept behind an `Arc` so a failure can be both logged and
/// delivered to the caller without giving up ownership.
#[derive(Debug, Clone, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error("{0}")]
    Misuse(MisuseKind),

    #[error("Module '{module}' failed to start ({origin}): {source}")]
    ModuleStartFailure {
        module: String,
        origin: FailureOrigin,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Module '{module}' failed to stop ({origin}): {source}")]
    ModuleStopFailure {
        module: String,
        origin: FailureOrigin,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Module '{module}' callbacked {phase}() {calls} times")]
    ProtocolViolation {
        module: String,
        phase: Phase,
        calls: usize,
    },

    #[error("No async runtime available to schedule completions: {0}")]
    NoRuntime(String),

    #[error("Lifecycle completion channel closed before a result was delivered")]
    CompletionDropped,
}

impl LifecycleError {
    /// Wrap a module's cause into the failure variant matching `phase`.
    pub fn module_failure(phase: Phase, module: &str, origin: FailureOrigin, cause: ModuleError) -> Self {
        let source: Arc<dyn std::error::Error + Send + Sync + 'static> = Arc::from(cause);
        match phase {
            Phase::Start => LifecycleError::ModuleStartFailure {
                module: module.to_string(),
                origin,
                source,
            },
            Phase::Stop => LifecycleError::ModuleStopFailure {
                module: module.to_string(),
                origin,
                source,
            },
        }
    }

    /// Name of the module responsible, when the error came from one.
    pub fn module(&self) -> Option<&str> {
        match self {
            LifecycleError::ModuleStartFailure { module, .. }
            | LifecycleError::ModuleStopFailure { module, .. }
            | LifecycleError::ProtocolViolation { module, .. } => Some(module),
            _ => None,
        }
    }

    pub fn is_misuse(&self) -> bool {
        matches!(self, LifecycleError::Misuse(_))
    }
}
