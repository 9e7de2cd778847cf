// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Module implementations that can be declared in a config file.
//!
//! # Available Behaviours
//!
//! - **Immediate**: completes synchronously inside the hook call
//! - **Deferred**: completes from a tokio task after a configurable delay
//! - **Failing**: reports a failure in the start or stop phase
//!
//! # Architecture
//!
//! ```text
//! ModuleConfig → ModuleFactory → ModuleDescriptor → App
//! ```
//!
//! # Examples
//!
//! ```rust
//! use the_appwood::backends::ModuleFactory;
//! use the_appwood::config::{parse_config, ConfigFormat};
//!
//! let cfg = parse_config(
//!     r#"
//! modules:
//!   - name: cache
//!     type: deferred
//!     delay_ms: 5
//!     stoppable: false
//! "#,
//!     ConfigFormat::Yaml,
//! )
//! .unwrap();
//!
//! let descriptor = ModuleFactory::create_module(&cfg.modules[0]);
//! assert_eq!(descriptor.name(), "cache");
//! assert!(!descriptor.has_stop());
//! ```

pub mod factory;
pub mod stub;

pub use factory::ModuleFactory;
