// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod descriptor;
mod registry;

pub use descriptor::{validate_module_name, ModuleDescriptor, ModuleRef};
pub use registry::ModuleRegistry;
