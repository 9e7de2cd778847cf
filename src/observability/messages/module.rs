// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for per-module events.
//!
//! This module contains message types for logging events related to:
//! * Module registration
//! * Module start/stop progress
//! * Module failures, thrown or reported
//! * Completion protocol violations

use std::fmt::{Display, Formatter};

use crate::errors::{FailureOrigin, Phase};
use crate::observability::messages::StructuredLog;
use crate::observability::LogLevel;

/// A descriptor was added to the registry.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ModuleRegistered<'a> {
    pub module: &'a str,
    pub replaced: bool,
}

impl Display for ModuleRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.replaced {
            write!(f, "Module '{}' re-registered, previous descriptor replaced", self.module)
        } else {
            write!(f, "Module '{}' registered", self.module)
        }
    }
}

impl StructuredLog for ModuleRegistered<'_> {
    fn level(&self) -> LogLevel {
        LogLevel::Debug
    }

    fn module(&self) -> Option<&str> {
        Some(self.module)
    }
}

/// A module's start hook is about to run.
///
/// # Log Level
/// `silly` - Routine progress
///
/// # Example
/// ```
/// use the_appwood::observability::messages::module::ModuleStarting;
///
/// let msg = ModuleStarting { module: "database" };
/// assert_eq!(msg.to_string(), "Module 'database' starting");
/// ```
pub struct ModuleStarting<'a> {
    pub module: &'a str,
}

impl Display for ModuleStarting<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Module '{}' starting", self.module)
    }
}

impl StructuredLog for ModuleStarting<'_> {
    fn level(&self) -> LogLevel {
        LogLevel::Silly
    }

    fn module(&self) -> Option<&str> {
        Some(self.module)
    }
}

/// A module reported a successful start.
///
/// # Log Level
/// `silly` - Routine progress
pub struct ModuleStarted<'a> {
    pub module: &'a str,
}

impl Display for ModuleStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Module '{}' started", self.module)
    }
}

impl StructuredLog for ModuleStarted<'_> {
    fn level(&self) -> LogLevel {
        LogLevel::Silly
    }

    fn module(&self) -> Option<&str> {
        Some(self.module)
    }
}

/// A module is being torn down, or skipped when it has no stop hook.
///
/// # Log Level
/// `silly` - Routine progress
///
/// # Example
/// ```
/// use the_appwood::observability::messages::module::ModuleStopping;
///
/// let msg = ModuleStopping { module: "config", has_stop: false };
/// assert_eq!(msg.to_string(), "Module 'config' stopping (no stop hook)");
/// ```
pub struct ModuleStopping<'a> {
    pub module: &'a str,
    pub has_stop: bool,
}

impl Display for ModuleStopping<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.has_stop {
            write!(f, "Module '{}' stopping", self.module)
        } else {
            write!(f, "Module '{}' stopping (no stop hook)", self.module)
        }
    }
}

impl StructuredLog for ModuleStopping<'_> {
    fn level(&self) -> LogLevel {
        LogLevel::Silly
    }

    fn module(&self) -> Option<&str> {
        Some(self.module)
    }
}

/// A module reported a successful stop.
///
/// # Log Level
/// `silly` - Routine progress
pub struct ModuleStopped<'a> {
    pub module: &'a str,
}

impl Display for ModuleStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Module '{}' stopped", self.module)
    }
}

impl StructuredLog for ModuleStopped<'_> {
    fn level(&self) -> LogLevel {
        LogLevel::Silly
    }

    fn module(&self) -> Option<&str> {
        Some(self.module)
    }
}

/// A module failed to start or stop.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_appwood::errors::{FailureOrigin, Phase};
/// use the_appwood::observability::messages::module::ModuleFailed;
///
/// let cause = std::io::Error::new(std::io::ErrorKind::Other, "connection refused");
/// let msg = ModuleFailed {
///     module: "database",
///     phase: Phase::Start,
///     origin: FailureOrigin::Thrown,
///     error: &cause,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Module 'database' failed to start (thrown): connection refused"
/// );
/// ```
pub struct ModuleFailed<'a> {
    pub module: &'a str,
    pub phase: Phase,
    pub origin: FailureOrigin,
    pub error: &'a dyn std::error::Error,
}

impl Display for ModuleFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Module '{}' failed to {} ({}): {}",
            self.module, self.phase, self.origin, self.error
        )
    }
}

impl StructuredLog for ModuleFailed<'_> {
    fn level(&self) -> LogLevel {
        LogLevel::Error
    }

    fn module(&self) -> Option<&str> {
        Some(self.module)
    }
}

/// A module called its completion handle a second time.
///
/// # Log Level
/// `error!` - The module is broken
pub struct CompletionCalledTwice<'a> {
    pub module: &'a str,
    pub phase: Phase,
}

impl Display for CompletionCalledTwice<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Module '{}' callbacked {}() twice", self.module, self.phase)
    }
}

impl StructuredLog for CompletionCalledTwice<'_> {
    fn level(&self) -> LogLevel {
        LogLevel::Error
    }

    fn module(&self) -> Option<&str> {
        Some(self.module)
    }
}

/// A completion arrived after the run it belonged to had already ended.
///
/// # Log Level
/// `warn!` - Ignored, but worth noticing
pub struct LateCompletion<'a> {
    pub module: &'a str,
    pub phase: Phase,
    pub failed: bool,
}

impl Display for LateCompletion<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let outcome = if self.failed { "failure" } else { "success" };
        write!(
            f,
            "Ignoring {} completion of module '{}' after the {} sequence ended",
            outcome, self.module, self.phase
        )
    }
}

impl StructuredLog for LateCompletion<'_> {
    fn level(&self) -> LogLevel {
        LogLevel::Warn
    }

    fn module(&self) -> Option<&str> {
        Some(self.module)
    }
}
