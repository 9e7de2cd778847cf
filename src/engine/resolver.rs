// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dependency resolution: requested module names in, initialization order out.
//!
//! Resolution runs in two passes over a [`ModuleGraph`]:
//!
//! 1. **Closure**: the requested names (with `*` expanded to every registered
//!    module) are walked as a growing queue, pulling in each module's
//!    dependencies. Every required module ends up in the queue exactly once,
//!    in first-encounter order.
//! 2. **Waves**: the queue is scanned repeatedly. A module is ready when all
//!    of its dependencies were resolved in an *earlier* wave. Each wave is
//!    stable-sorted by priority (lower first) and appended to the result. A
//!    scan that finds nothing ready while modules remain means a cycle.
//!
//! The result is deterministic for a given graph and request, and every
//! module appears after all of its transitive dependencies.
//!
//! # Examples
//!
//! ```rust
//! use the_appwood::engine::resolve;
//! use the_appwood::modules::{ModuleDescriptor, ModuleRegistry};
//!
//! let noop = |name: &str| ModuleDescriptor::new(name, |_app, done| {
//!     done.ok()?;
//!     Ok(())
//! });
//!
//! let mut registry = ModuleRegistry::new();
//! registry.register(noop("api").with_deps(["db", "cache"])).unwrap();
//! registry.register(noop("db").with_deps(["config"])).unwrap();
//! registry.register(noop("cache").with_deps(["config"]).with_priority(-1)).unwrap();
//! registry.register(noop("config")).unwrap();
//!
//! let order = resolve(&registry, &["api"]).unwrap();
//! assert_eq!(order, vec!["config", "cache", "db", "api"]);
//! ```

use std::collections::HashSet;

use crate::config::consts::WILDCARD;
use crate::errors::ResolveError;
use crate::traits::ModuleGraph;

/// Resolve `requested` into a flat initialization order.
pub fn resolve<G, S>(graph: &G, requested: &[S]) -> Result<Vec<String>, ResolveError>
where
    G: ModuleGraph + ?Sized,
    S: AsRef<str>,
{
    Ok(resolve_waves(graph, requested)?.into_iter().flatten().collect())
}

/// Resolve `requested` into waves of modules that become ready together.
///
/// Wave 0 holds modules with no unresolved dependencies, wave N holds
/// modules whose dependencies all sit in waves `0..N`.
pub fn resolve_waves<G, S>(graph: &G, requested: &[S]) -> Result<Vec<Vec<String>>, ResolveError>
where
    G: ModuleGraph + ?Sized,
    S: AsRef<str>,
{
    let required = collect_required(graph, requested)?;
    order_in_waves(graph, required)
}

/// Build the transitive closure of `requested`, in first-encounter order.
fn collect_required<G, S>(graph: &G, requested: &[S]) -> Result<Vec<String>, ResolveError>
where
    G: ModuleGraph + ?Sized,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: Vec<String> = Vec::new();

    if requested.iter().any(|name| name.as_ref() == WILDCARD) {
        for name in graph.module_names() {
            if seen.insert(name.to_string()) {
                queue.push(name.to_string());
            }
        }
    }

    for name in requested.iter().map(AsRef::as_ref) {
        if name != WILDCARD && seen.insert(name.to_string()) {
            queue.push(name.to_string());
        }
    }

    // The queue grows while we walk it; only unseen names are appended.
    let mut cursor = 0;
    while cursor < queue.len() {
        let name = &queue[cursor];
        let deps = graph
            .dependencies(name)
            .ok_or_else(|| ResolveError::ModuleNotFound { name: name.clone() })?;

        let mut discovered = Vec::new();
        for dependency in deps {
            if seen.contains(dependency) {
                continue;
            }
            if !graph.contains(dependency) {
                return Err(ResolveError::DependencyNotFound {
                    module: name.clone(),
                    dependency: dependency.clone(),
                });
            }
            seen.insert(dependency.clone());
            discovered.push(dependency.clone());
        }

        queue.extend(discovered);
        cursor += 1;
    }

    Ok(queue)
}

fn order_in_waves<G>(graph: &G, required: Vec<String>) -> Result<Vec<Vec<String>>, ResolveError>
where
    G: ModuleGraph + ?Sized,
{
    let mut resolved: HashSet<String> = HashSet::with_capacity(required.len());
    let mut waves = Vec::new();
    let mut pending = required;

    while !pending.is_empty() {
        let (mut ready, blocked): (Vec<String>, Vec<String>) =
            pending.into_iter().partition(|name| {
                graph
                    .dependencies(name)
                    .unwrap_or_default()
                    .iter()
                    .all(|dependency| resolved.contains(dependency))
            });

        if ready.is_empty() {
            return Err(ResolveError::CyclicDependency { unresolved: blocked });
        }

        // Stable: equal priorities keep encounter order.
        ready.sort_by_key(|name| graph.priority(name));

        resolved.extend(ready.iter().cloned());
        waves.push(ready);
        pending = blocked;
    }

    Ok(waves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{ModuleDescriptor, ModuleRegistry};

    fn module(name: &str, deps: &[&str]) -> ModuleDescriptor {
        ModuleDescriptor::new(name, |_app, done| {
            done.ok()?;
            Ok(())
        })
        .with_deps(deps.iter().copied())
    }

    fn registry(modules: Vec<ModuleDescriptor>) -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        registry.register_all(modules).unwrap();
        registry
    }

    #[test]
    fn test_single_module() {
        let registry = registry(vec![module("a", &[])]);
        assert_eq!(resolve(&registry, &["a"]).unwrap(), vec!["a"]);
    }

    #[test]
    fn test_dependency_pulled_in_before_dependent() {
        let registry = registry(vec![module("a", &[]), module("b", &["a"])]);
        assert_eq!(resolve(&registry, &["b"]).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_linear_chain() {
        let registry = registry(vec![
            module("c", &["b"]),
            module("b", &["a"]),
            module("a", &[]),
        ]);
        assert_eq!(resolve(&registry, &["c"]).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_diamond_waves() {
        // a -> [b, c] -> d
        let registry = registry(vec![
            module("a", &[]),
            module("b", &["a"]),
            module("c", &["a"]),
            module("d", &["b", "c"]),
        ]);

        let waves = resolve_waves(&registry, &["d"]).unwrap();
        assert_eq!(waves.len(), 3);
        assert_eq!(waves[0], vec!["a"]);
        assert!(waves[1].contains(&"b".to_string()));
        assert!(waves[1].contains(&"c".to_string()));
        assert_eq!(waves[1].len(), 2);
        assert_eq!(waves[2], vec!["d"]);
    }

    #[test]
    fn test_unrequested_modules_are_left_out() {
        let registry = registry(vec![module("a", &[]), module("b", &[]), module("c", &["a"])]);
        assert_eq!(resolve(&registry, &["c"]).unwrap(), vec!["a", "c"]);
    }

    #[test]
    fn test_wildcard_includes_every_module_once() {
        let registry = registry(vec![module("x", &[]), module("y", &["x"]), module("z", &[])]);
        let order = resolve(&registry, &["*", "y", "x"]).unwrap();
        assert_eq!(order, vec!["x", "z", "y"]);
    }

    #[test]
    fn test_duplicate_requests_and_deps_are_tolerated() {
        let registry = registry(vec![module("a", &[]), module("b", &["a", "a"])]);
        assert_eq!(resolve(&registry, &["b", "b", "a"]).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_request() {
        let registry = registry(vec![module("a", &[])]);
        let none: [&str; 0] = [];
        assert!(resolve(&registry, &none).unwrap().is_empty());
    }

    #[test]
    fn test_priority_sorts_within_a_wave_only() {
        let registry = registry(vec![
            module("base", &[]).with_priority(10),
            module("late", &[]).with_priority(5),
            module("early", &[]).with_priority(-1),
            module("top", &["base"]).with_priority(-100),
        ]);

        let order = resolve(&registry, &["*"]).unwrap();
        // "top" has the lowest priority but sits in a later wave.
        assert_eq!(order, vec!["early", "late", "base", "top"]);
    }

    #[test]
    fn test_equal_priorities_keep_encounter_order() {
        let registry = registry(vec![
            module("p", &[]).with_priority(1),
            module("q", &[]),
            module("r", &[]).with_priority(1),
            module("s", &[]),
        ]);
        assert_eq!(resolve(&registry, &["*"]).unwrap(), vec!["q", "s", "p", "r"]);
    }

    #[test]
    fn test_requested_module_not_found() {
        let registry = registry(vec![module("a", &[])]);
        assert_eq!(
            resolve(&registry, &["a", "ghost"]).unwrap_err(),
            ResolveError::ModuleNotFound {
                name: "ghost".to_string()
            }
        );
    }

    #[test]
    fn test_dependency_not_found() {
        let registry = registry(vec![module("api", &["db"])]);
        assert_eq!(
            resolve(&registry, &["api"]).unwrap_err(),
            ResolveError::DependencyNotFound {
                module: "api".to_string(),
                dependency: "db".to_string(),
            }
        );
    }

    #[test]
    fn test_simple_cycle() {
        let registry = registry(vec![module("a", &["b"]), module("b", &["a"])]);
        let error = resolve(&registry, &["a"]).unwrap_err();
        match error {
            ResolveError::CyclicDependency { unresolved } => {
                assert_eq!(unresolved, vec!["a", "b"]);
            }
            other => panic!("expected a cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let registry = registry(vec![module("a", &["a"])]);
        assert!(matches!(
            resolve(&registry, &["a"]),
            Err(ResolveError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn test_cycle_reports_only_the_stuck_modules() {
        // entry -> a -> b -> c -> a
        let registry = registry(vec![
            module("entry", &[]),
            module("a", &["entry", "c"]),
            module("b", &["a"]),
            module("c", &["b"]),
        ]);

        match resolve(&registry, &["*"]).unwrap_err() {
            ResolveError::CyclicDependency { unresolved } => {
                assert_eq!(unresolved, vec!["a", "b", "c"]);
            }
            other => panic!("expected a cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_outside_the_request_is_ignored() {
        let registry = registry(vec![
            module("ok", &[]),
            module("x", &["y"]),
            module("y", &["x"]),
        ]);
        assert_eq!(resolve(&registry, &["ok"]).unwrap(), vec!["ok"]);
    }
}
