// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors produced while turning a set of requested module names into an
/// initialization order.
///
/// Resolution never returns a partial order alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A requested name has no registered descriptor
    ModuleNotFound {
        /// The name that was asked for
        name: String,
    },
    /// A registered module declares a dependency that is not registered
    DependencyNotFound {
        /// The module declaring the dependency
        module: String,
        /// The dependency that couldn't be found
        dependency: String,
    },
    /// The required modules could not be ordered because they depend on each other
    CyclicDependency {
        /// Every module that was still unresolved when no progress could be made
        unresolved: Vec<String>,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::ModuleNotFound { name } => {
                write!(f, "Module '{}' not found", name)
            }
            ResolveError::DependencyNotFound { module, dependency } => {
                write!(f, "Module '{}' dependency '{}' not found", module, dependency)
            }
            ResolveError::CyclicDependency { unresolved } => {
                write!(
                    f,
                    "Cyclic dependency when resolving '{}'",
                    unresolved.join("', '")
                )
            }
        }
    }
}

impl std::error::Error for ResolveError {}
