// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Every diagnostic the orchestrator emits is a small struct implementing
//! `Display` plus [`StructuredLog`], which fixes its level and the module it
//! concerns. That keeps wording out of the control flow and gives sinks a
//! consistent shape.
//!
//! # Organization
//!
//! * `lifecycle` - app-wide state transitions and misuse
//! * `module` - per-module start/stop progress and failures
//! * `validation` - config validation findings
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_appwood::observability::messages::module::ModuleStarting;
//! use the_appwood::observability::messages::StructuredLog;
//! use the_appwood::observability::LogLevel;
//!
//! let msg = ModuleStarting { module: "database" };
//! let record = msg.to_record();
//!
//! assert_eq!(record.level, LogLevel::Silly);
//! assert_eq!(record.module.as_deref(), Some("database"));
//! ```

pub mod lifecycle;
pub mod module;
pub mod validation;

use std::fmt::Display;

use crate::observability::{LogLevel, LogRecord};

/// A message with a fixed level that can be routed to a sink or to `tracing`.
pub trait StructuredLog: Display {
    fn level(&self) -> LogLevel;

    fn module(&self) -> Option<&str> {
        None
    }

    fn to_record(&self) -> LogRecord {
        LogRecord::new(self.level(), self.module(), self.to_string())
    }

    /// Emit straight to `tracing`, bypassing any app sink.
    fn log(&self) {
        let module = self.module().unwrap_or("");
        match self.level() {
            LogLevel::Silly => tracing::trace!(module, "{}", self),
            LogLevel::Debug => tracing::debug!(module, "{}", self),
            LogLevel::Info => tracing::info!(module, "{}", self),
            LogLevel::Warn => tracing::warn!(module, "{}", self),
            LogLevel::Error => tracing::error!(module, "{}", self),
        }
    }
}
