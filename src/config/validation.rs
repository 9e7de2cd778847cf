// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pre-flight validation of a configured module graph.
//!
//! Resolution at `start` already rejects unknown modules and cycles, but only
//! one problem at a time and only for the modules actually requested. This
//! pass checks the whole config up front and reports everything it finds.
//!
//! # Validation Pipeline
//!
//! 1. **Name Validation**: no empty or reserved module names
//! 2. **Uniqueness Validation**: every module name appears once
//! 3. **Reference Validation**: every dependency and every entry of
//!    `lifecycle.required` names a configured module
//! 4. **Cycle Detection**: DFS over the dependency edges, reporting the exact
//!    cycle path
//!
//! Cycle detection only runs when stages 1-3 passed, since it needs a
//! structurally valid graph.
//!
//! # Examples
//!
//! ```rust
//! use the_appwood::config::{parse_config, validate_module_graph, ConfigFormat};
//! use the_appwood::errors::ValidationError;
//!
//! let cfg = parse_config(
//!     r#"
//! modules:
//!   - name: a
//!     deps: [b]
//!   - name: b
//!     deps: [a]
//! "#,
//!     ConfigFormat::Yaml,
//! )
//! .unwrap();
//!
//! let errors = validate_module_graph(&cfg).unwrap_err();
//! assert_eq!(
//!     errors,
//!     vec![ValidationError::CyclicDependency {
//!         cycle: vec!["a".into(), "b".into(), "a".into()],
//!     }]
//! );
//! ```

use std::collections::{HashMap, HashSet};

use crate::config::consts::WILDCARD;
use crate::config::Config;
use crate::errors::{RegistrationError, ValidationError};
use crate::modules::validate_module_name;
use crate::observability::messages::validation::{
    CyclicDependencyDetected, DuplicateModuleName, UnresolvedDependency, ValidationFailed,
    ValidationStarted,
};
use crate::observability::messages::StructuredLog;

/// Validate a config's module graph, collecting every problem found.
pub fn validate_module_graph(config: &Config) -> Result<(), Vec<ValidationError>> {
    ValidationStarted {
        module_count: config.modules.len(),
    }
    .log();

    let mut errors = Vec::new();
    errors.extend(validate_module_names(config));
    errors.extend(validate_unique_module_names(config));
    errors.extend(validate_dependency_references(config));
    errors.extend(validate_required_modules(config));

    if errors.is_empty() {
        if let Some(cycle) = find_cycle(config) {
            let path: Vec<&str> = cycle.iter().map(String::as_str).collect();
            CyclicDependencyDetected { cycle: &path }.log();
            errors.push(ValidationError::CyclicDependency { cycle });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        ValidationFailed {
            error_count: errors.len(),
        }
        .log();
        Err(errors)
    }
}

fn validate_module_names(config: &Config) -> Vec<ValidationError> {
    config
        .modules
        .iter()
        .filter_map(|module| {
            validate_module_name(&module.name)
                .err()
                .map(|err| ValidationError::InvalidModuleName {
                    module: module.name.clone(),
                    reason: match err {
                        RegistrationError::EmptyName { .. } => "name must not be empty".to_string(),
                        RegistrationError::ReservedName { .. } => "name is reserved".to_string(),
                    },
                })
        })
        .collect()
}

fn validate_unique_module_names(config: &Config) -> Vec<ValidationError> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for module in &config.modules {
        if !seen.insert(module.name.as_str()) {
            DuplicateModuleName {
                module: &module.name,
            }
            .log();
            errors.push(ValidationError::DuplicateModuleName {
                module: module.name.clone(),
            });
        }
    }

    errors
}

fn validate_dependency_references(config: &Config) -> Vec<ValidationError> {
    let names: HashSet<&str> = config.modules.iter().map(|m| m.name.as_str()).collect();
    let mut errors = Vec::new();

    for module in &config.modules {
        for dependency in &module.deps {
            if !names.contains(dependency.as_str()) {
                UnresolvedDependency {
                    module: &module.name,
                    missing_dependency: dependency,
                }
                .log();
                errors.push(ValidationError::UnresolvedDependency {
                    module: module.name.clone(),
                    missing_dependency: dependency.clone(),
                });
            }
        }
    }

    errors
}

fn validate_required_modules(config: &Config) -> Vec<ValidationError> {
    let names: HashSet<&str> = config.modules.iter().map(|m| m.name.as_str()).collect();

    config
        .lifecycle
        .required
        .iter()
        .filter(|name| name.as_str() != WILDCARD && !names.contains(name.as_str()))
        .map(|name| ValidationError::UnknownRequiredModule {
            module: name.clone(),
        })
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Depth-first search along `module -> dependency` edges.
///
/// Modules are visited in config order, so the reported cycle is stable.
/// Returns the cycle path closed by repeating its first module.
fn find_cycle(config: &Config) -> Option<Vec<String>> {
    let edges: HashMap<&str, Vec<&str>> = config
        .modules
        .iter()
        .map(|m| (m.name.as_str(), m.deps.iter().map(String::as_str).collect()))
        .collect();

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut path: Vec<&str> = Vec::new();

    for module in &config.modules {
        if !marks.contains_key(module.name.as_str()) {
            if let Some(cycle) = visit(module.name.as_str(), &edges, &mut marks, &mut path) {
                return Some(cycle);
            }
        }
    }
    None
}

fn visit<'a>(
    node: &'a str,
    edges: &HashMap<&'a str, Vec<&'a str>>,
    marks: &mut HashMap<&'a str, Mark>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    marks.insert(node, Mark::InProgress);
    path.push(node);

    for &next in edges.get(node).map(Vec::as_slice).unwrap_or_default() {
        match marks.get(next) {
            None => {
                if let Some(cycle) = visit(next, edges, marks, path) {
                    return Some(cycle);
                }
            }
            Some(Mark::InProgress) => {
                let start = path.iter().position(|&n| n == next).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
                cycle.push(next.to_string());
                return Some(cycle);
            }
            Some(Mark::Done) => {}
        }
    }

    marks.insert(node, Mark::Done);
    path.pop();
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LifecycleOptions, ModuleConfig, ModuleKind};

    fn create_test_module(name: &str, deps: Vec<&str>) -> ModuleConfig {
        ModuleConfig {
            name: name.to_string(),
            kind: ModuleKind::Immediate,
            deps: deps.iter().map(|s| s.to_string()).collect(),
            priority: None,
            delay_ms: None,
            fail_on: None,
            stoppable: true,
            options: HashMap::new(),
        }
    }

    fn config(modules: Vec<ModuleConfig>) -> Config {
        Config {
            modules,
            ..Config::default()
        }
    }

    #[test]
    fn test_valid_empty_config() {
        assert!(validate_module_graph(&config(vec![])).is_ok());
    }

    #[test]
    fn test_valid_diamond_dependency() {
        let cfg = config(vec![
            create_test_module("a", vec![]),
            create_test_module("b", vec!["a"]),
            create_test_module("c", vec!["a"]),
            create_test_module("d", vec!["b", "c"]),
        ]);
        assert!(validate_module_graph(&cfg).is_ok());
    }

    #[test]
    fn test_duplicate_module_names() {
        let cfg = config(vec![
            create_test_module("a", vec![]),
            create_test_module("a", vec![]),
        ]);

        let errors = validate_module_graph(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateModuleName {
                module: "a".to_string()
            }]
        );
    }

    #[test]
    fn test_invalid_module_names() {
        let cfg = config(vec![
            create_test_module("", vec![]),
            create_test_module("__proto__", vec![]),
        ]);

        let errors = validate_module_graph(&cfg).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ValidationError::InvalidModuleName { .. })));
    }

    #[test]
    fn test_unresolved_dependency() {
        let cfg = config(vec![
            create_test_module("a", vec![]),
            create_test_module("b", vec!["nonexistent"]),
        ]);

        let errors = validate_module_graph(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnresolvedDependency {
                module: "b".to_string(),
                missing_dependency: "nonexistent".to_string(),
            }]
        );
    }

    #[test]
    fn test_unknown_required_module() {
        let cfg = Config {
            lifecycle: LifecycleOptions {
                required: vec!["*".to_string(), "ghost".to_string()],
                sync_batch_limit: None,
            },
            ..config(vec![create_test_module("a", vec![])])
        };

        let errors = validate_module_graph(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnknownRequiredModule {
                module: "ghost".to_string()
            }]
        );
    }

    #[test]
    fn test_errors_accumulate() {
        let cfg = config(vec![
            create_test_module("a", vec!["x"]),
            create_test_module("a", vec!["y"]),
        ]);
        assert_eq!(validate_module_graph(&cfg).unwrap_err().len(), 3);
    }

    #[test]
    fn test_self_dependency() {
        let cfg = config(vec![create_test_module("a", vec!["a"])]);
        let errors = validate_module_graph(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::CyclicDependency {
                cycle: vec!["a".to_string(), "a".to_string()]
            }]
        );
    }

    #[test]
    fn test_complex_cycle_reports_exact_path() {
        // root -> b -> c -> d -> b
        let cfg = config(vec![
            create_test_module("root", vec!["b"]),
            create_test_module("b", vec!["c"]),
            create_test_module("c", vec!["d"]),
            create_test_module("d", vec!["b"]),
        ]);

        let errors = validate_module_graph(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::CyclicDependency {
                cycle: vec!["b", "c", "d", "b"].into_iter().map(String::from).collect()
            }]
        );
    }

    #[test]
    fn test_cycle_check_skipped_when_references_are_broken() {
        let cfg = config(vec![
            create_test_module("a", vec!["b", "missing"]),
            create_test_module("b", vec!["a"]),
        ]);

        let errors = validate_module_graph(&cfg).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::UnresolvedDependency { .. }));
    }
}
