// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use std::time::Duration;

use super::stub::{DeferredModule, FailingHook, ImmediateHook};
use crate::config::consts::DEFAULT_PRIORITY;
use crate::config::{Config, ModuleConfig, ModuleKind};
use crate::errors::Phase;
use crate::modules::ModuleDescriptor;

/// Factory for turning configured modules into descriptors
pub struct ModuleFactory;

impl ModuleFactory {
    /// Create a descriptor from configuration
    ///
    /// The `type` field determines the behaviour:
    /// - "immediate" -> completes inside the hook call
    /// - "deferred" -> completes after `delay_ms` (default 0) from a tokio task
    /// - "failing" -> fails in `fail_on` (default start); `options.message`
    ///   overrides the failure text
    ///
    /// `stoppable: false` leaves the module without a stop hook, so a
    /// `failing` module with `fail_on: stop` and `stoppable: false` never fails.
    pub fn create_module(config: &ModuleConfig) -> ModuleDescriptor {
        let name = config.name.as_str();

        let descriptor = match config.kind {
            ModuleKind::Immediate => {
                let descriptor = ModuleDescriptor::from_hook(name, Arc::new(ImmediateHook));
                if config.stoppable {
                    descriptor.with_stop_hook(Arc::new(ImmediateHook))
                } else {
                    descriptor
                }
            }
            ModuleKind::Deferred => {
                let delay = Duration::from_millis(config.delay_ms.unwrap_or(0));
                ModuleDescriptor::from_async(name, DeferredModule::new(delay, config.stoppable))
            }
            ModuleKind::Failing => {
                let phase = config.fail_on.unwrap_or(Phase::Start);
                let failing = match config.options.get("message").and_then(|v| v.as_str()) {
                    Some(message) => FailingHook::new(message),
                    None => FailingHook::for_phase(phase),
                };

                match phase {
                    Phase::Start => {
                        let descriptor = ModuleDescriptor::from_hook(name, Arc::new(failing));
                        if config.stoppable {
                            descriptor.with_stop_hook(Arc::new(ImmediateHook))
                        } else {
                            descriptor
                        }
                    }
                    Phase::Stop => {
                        let descriptor = ModuleDescriptor::from_hook(name, Arc::new(ImmediateHook));
                        if config.stoppable {
                            descriptor.with_stop_hook(Arc::new(failing))
                        } else {
                            descriptor
                        }
                    }
                }
            }
        };

        descriptor
            .with_deps(config.deps.iter().cloned())
            .with_priority(config.priority.unwrap_or(DEFAULT_PRIORITY))
    }

    /// Create descriptors for every configured module, in config order
    pub fn create_all(config: &Config) -> Vec<ModuleDescriptor> {
        config.modules.iter().map(Self::create_module).collect()
    }

    /// List all available module types
    pub fn list_available_kinds() -> Vec<&'static str> {
        vec!["immediate", "deferred", "failing"]
    }
}
