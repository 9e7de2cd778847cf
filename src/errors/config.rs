// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while validating the module list of a config file
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A circular dependency was detected between configured modules
    CyclicDependency {
        /// The cycle path showing the circular dependency
        cycle: Vec<String>,
    },
    /// A module references a dependency that isn't configured
    UnresolvedDependency {
        /// The module that has the unresolved dependency
        module: String,
        /// The dependency that couldn't be resolved
        missing_dependency: String,
    },
    /// Two modules share a name
    DuplicateModuleName {
        /// The duplicate module name
        module: String,
    },
    /// A module name is empty or reserved
    InvalidModuleName {
        /// The offending name
        module: String,
        /// Why the name was rejected
        reason: String,
    },
    /// A name in `lifecycle.required` is neither `*` nor a configured module
    UnknownRequiredModule {
        /// The requested name
        module: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::CyclicDependency { cycle } => {
                write!(f, "Cyclic dependency detected: {}", cycle.join(" -> "))
            }
            ValidationError::UnresolvedDependency {
                module,
                missing_dependency,
            } => {
                write!(
                    f,
                    "Module '{}' depends on '{}' which does not exist",
                    module, missing_dependency
                )
            }
            ValidationError::DuplicateModuleName { module } => {
                write!(f, "Duplicate module name: '{}'", module)
            }
            ValidationError::InvalidModuleName { module, reason } => {
                write!(f, "Invalid module name '{}': {}", module, reason)
            }
            ValidationError::UnknownRequiredModule { module } => {
                write!(f, "Required module '{}' is not configured", module)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while reading a config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration validation failed:\n{}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
