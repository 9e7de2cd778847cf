// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for app-wide lifecycle transitions.
//!
//! This module contains message types for logging events related to:
//! * Start and stop runs beginning and completing
//! * Dependency resolution failures
//! * Misuse of `start`/`stop`
//! * Trampoline yields after long synchronous chains

use std::fmt::{Display, Formatter};

use crate::errors::{LifecycleError, MisuseKind, Phase, ResolveError};
use crate::observability::messages::StructuredLog;
use crate::observability::LogLevel;

/// A start run began.
///
/// # Log Level
/// `silly` - Routine progress
pub struct AppStarting<'a> {
    pub required: &'a [String],
}

impl Display for AppStarting<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Starting (required: {})", self.required.join(", "))
    }
}

impl StructuredLog for AppStarting<'_> {
    fn level(&self) -> LogLevel {
        LogLevel::Silly
    }
}

/// Initialization order was resolved.
///
/// # Log Level
/// `debug!` - Diagnostic detail
///
/// # Example
/// ```
/// use the_appwood::observability::messages::lifecycle::OrderResolved;
///
/// let order = vec!["config".to_string(), "database".to_string()];
/// let msg = OrderResolved { order: &order };
///
/// assert_eq!(msg.to_string(), "Resolved initialization order: config -> database");
/// ```
pub struct OrderResolved<'a> {
    pub order: &'a [String],
}

impl Display for OrderResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Resolved initialization order: {}", self.order.join(" -> "))
    }
}

impl StructuredLog for OrderResolved<'_> {
    fn level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

/// Dependency resolution failed, the app is now `Failed`.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ResolutionFailed<'a> {
    pub error: &'a ResolveError,
}

impl Display for ResolutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Failed to resolve dependencies: {}", self.error)
    }
}

impl StructuredLog for ResolutionFailed<'_> {
    fn level(&self) -> LogLevel {
        LogLevel::Error
    }
}

/// All required modules started.
///
/// # Log Level
/// `silly` - Routine progress
pub struct AppRunning {
    pub module_count: usize,
}

impl Display for AppRunning {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Running ({} modules started)", self.module_count)
    }
}

impl StructuredLog for AppRunning {
    fn level(&self) -> LogLevel {
        LogLevel::Silly
    }
}

/// A stop run began.
///
/// # Log Level
/// `silly` - Routine progress
pub struct AppStopping;

impl Display for AppStopping {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Stopping")
    }
}

impl StructuredLog for AppStopping {
    fn level(&self) -> LogLevel {
        LogLevel::Silly
    }
}

/// Every started module was torn down.
///
/// # Log Level
/// `silly` - Routine progress
pub struct AppStopped;

impl Display for AppStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Stopped")
    }
}

impl StructuredLog for AppStopped {
    fn level(&self) -> LogLevel {
        LogLevel::Silly
    }
}

/// A run ended in failure.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct AppFailed<'a> {
    pub phase: Phase,
    pub error: &'a LifecycleError,
}

impl Display for AppFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "App failed during {}: {}", self.phase, self.error)
    }
}

impl StructuredLog for AppFailed<'_> {
    fn level(&self) -> LogLevel {
        LogLevel::Error
    }

    fn module(&self) -> Option<&str> {
        self.error.module()
    }
}

/// `start`/`stop` was called in a state that forbids it.
///
/// # Log Level
/// `error!` - Programming error in the caller
pub struct LifecycleMisuse {
    pub kind: MisuseKind,
}

impl Display for LifecycleMisuse {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl StructuredLog for LifecycleMisuse {
    fn level(&self) -> LogLevel {
        LogLevel::Error
    }
}

/// The drive loop handed its continuation to the scheduler after a long
/// synchronous chain.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct SyncChainYielded {
    pub phase: Phase,
    pub completed: usize,
}

impl Display for SyncChainYielded {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Yielding {} sequence after {} synchronous completions",
            self.phase, self.completed
        )
    }
}

impl StructuredLog for SyncChainYielded {
    fn level(&self) -> LogLevel {
        LogLevel::Debug
    }
}
