// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for config validation warnings and errors.
//!
//! This module contains message types for logging events related to:
//! * Module graph validation start and outcome
//! * Cyclic dependency detection
//! * Unresolved dependency detection
//! * Duplicate module name detection

use std::fmt::{Display, Formatter};

use crate::observability::messages::StructuredLog;
use crate::observability::LogLevel;

/// Cyclic dependency detected in configuration.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_appwood::observability::messages::validation::CyclicDependencyDetected;
///
/// let cycle = vec!["api", "cache", "api"];
/// let msg = CyclicDependencyDetected { cycle: &cycle };
///
/// assert_eq!(msg.to_string(), "Cyclic dependency detected: api -> cache -> api");
/// ```
pub struct CyclicDependencyDetected<'a> {
    pub cycle: &'a [&'a str],
}

impl Display for CyclicDependencyDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cyclic dependency detected: {}", self.cycle.join(" -> "))
    }
}

impl StructuredLog for CyclicDependencyDetected<'_> {
    fn level(&self) -> LogLevel {
        LogLevel::Error
    }
}

/// Unresolved dependency detected in configuration.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct UnresolvedDependency<'a> {
    pub module: &'a str,
    pub missing_dependency: &'a str,
}

impl Display for UnresolvedDependency<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Module '{}' depends on missing module '{}'",
            self.module, self.missing_dependency
        )
    }
}

impl StructuredLog for UnresolvedDependency<'_> {
    fn level(&self) -> LogLevel {
        LogLevel::Error
    }

    fn module(&self) -> Option<&str> {
        Some(self.module)
    }
}

/// Duplicate module name detected in configuration.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct DuplicateModuleName<'a> {
    pub module: &'a str,
}

impl Display for DuplicateModuleName<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Duplicate module name: '{}'", self.module)
    }
}

impl StructuredLog for DuplicateModuleName<'_> {
    fn level(&self) -> LogLevel {
        LogLevel::Error
    }

    fn module(&self) -> Option<&str> {
        Some(self.module)
    }
}

/// Validation of a module graph started.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ValidationStarted {
    pub module_count: usize,
}

impl Display for ValidationStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Validating module graph: {} modules", self.module_count)
    }
}

impl StructuredLog for ValidationStarted {
    fn level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

/// Validation found problems.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ValidationFailed {
    pub error_count: usize,
}

impl Display for ValidationFailed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Module graph validation failed with {} error(s)", self.error_count)
    }
}

impl StructuredLog for ValidationFailed {
    fn level(&self) -> LogLevel {
        LogLevel::Error
    }
}
