// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod lifecycle;
mod registration;
mod resolve;

pub use config::{ConfigError, ValidationError};
pub use lifecycle::{FailureOrigin, LifecycleError, MisuseKind, ModuleError, Phase};
pub use registration::RegistrationError;
pub use resolve::ResolveError;
