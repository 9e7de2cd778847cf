// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::RegistrationError;
use crate::modules::{ModuleDescriptor, ModuleRef};
use crate::traits::ModuleGraph;

/// Name-keyed store of module descriptors.
///
/// Registration order is remembered so that expanding the wildcard is
/// deterministic. Re-registering a name replaces the descriptor but keeps
/// its original position.
#[derive(Clone, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, Arc<ModuleDescriptor>>,
    order: Vec<String>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register one descriptor.
    ///
    /// Returns the descriptor it replaced, if the name was already taken.
    pub fn register(
        &mut self,
        descriptor: ModuleDescriptor,
    ) -> Result<Option<Arc<ModuleDescriptor>>, RegistrationError> {
        descriptor.validate()?;
        Ok(self.insert(descriptor))
    }

    /// Validate every descriptor, then register them all.
    ///
    /// Nothing is registered if any element is invalid; the error names the
    /// index of the first bad one. The result lists, per input element, the
    /// descriptor it replaced.
    pub fn register_all<I>(
        &mut self,
        descriptors: I,
    ) -> Result<Vec<Option<Arc<ModuleDescriptor>>>, RegistrationError>
    where
        I: IntoIterator<Item = ModuleDescriptor>,
    {
        let descriptors: Vec<ModuleDescriptor> = descriptors.into_iter().collect();
        for (index, descriptor) in descriptors.iter().enumerate() {
            descriptor.validate().map_err(|e| e.at_index(index))?;
        }
        Ok(descriptors.into_iter().map(|d| self.insert(d)).collect())
    }

    fn insert(&mut self, descriptor: ModuleDescriptor) -> Option<Arc<ModuleDescriptor>> {
        let name = descriptor.name().to_string();
        let previous = self.modules.insert(name.clone(), Arc::new(descriptor));
        if previous.is_none() {
            self.order.push(name);
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ModuleDescriptor>> {
        self.modules.get(name)
    }

    pub fn is_registered<R: ModuleRef + ?Sized>(&self, module: &R) -> bool {
        self.modules.contains_key(module.module_name())
    }

    /// Names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ModuleDescriptor>> {
        self.order.iter().filter_map(|name| self.modules.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl ModuleGraph for ModuleRegistry {
    fn module_names(&self) -> Vec<&str> {
        self.names().collect()
    }

    fn dependencies(&self, name: &str) -> Option<&[String]> {
        self.modules.get(name).map(|m| m.deps())
    }

    fn priority(&self, name: &str) -> i32 {
        self.modules.get(name).map(|m| m.priority()).unwrap_or_default()
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("module_count", &self.order.len())
            .field("modules", &self.order)
            .finish()
    }
}
