// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pluggable log sinks.
//!
//! An [`App`](crate::app::App) writes every lifecycle event as a [`LogRecord`]
//! into whatever sink is currently attached. Until the host installs a real
//! sink the records land in a [`BufferedSink`], which keeps them in call order.
//! Switching to another sink replays the buffer into it exactly once.
//!
//! ```rust
//! use std::sync::Arc;
//! use the_appwood::observability::{BufferedSink, LogLevel, SinkSlot};
//!
//! let slot = SinkSlot::default();
//! slot.log(LogLevel::Info, None, "registered before logging was ready");
//!
//! let target = Arc::new(BufferedSink::new());
//! let replayed = slot.switch_to(target.clone());
//!
//! assert_eq!(replayed, 1);
//! assert_eq!(target.records()[0].message, "registered before logging was ready");
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::Serialize;

/// Recognised log levels, least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Silly,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Silly => "silly",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

/// One log call, as seen by a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub level: LogLevel,
    /// Module the event concerns, if any
    pub module: Option<String>,
    pub message: String,
}

impl LogRecord {
    pub fn new(level: LogLevel, module: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            level,
            module: module.map(str::to_string),
            message: message.into(),
        }
    }
}

/// Destination for leveled log records.
pub trait LogSink: Send + Sync {
    fn log(&self, record: LogRecord);

    /// Hand over any records held back for a later sink.
    ///
    /// Only buffering sinks return anything; the default is empty.
    fn drain(&self) -> Vec<LogRecord> {
        Vec::new()
    }
}

/// Holds records in call order until they are drained.
#[derive(Debug, Default)]
pub struct BufferedSink {
    records: Mutex<Vec<LogRecord>>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the buffered records, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for BufferedSink {
    fn log(&self, record: LogRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    fn drain(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Forwards records to the `tracing` ecosystem.
///
/// `silly` has no tracing equivalent and is emitted at TRACE.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, record: LogRecord) {
        let module = record.module.as_deref().unwrap_or("");
        match record.level {
            LogLevel::Silly => tracing::trace!(module, "{}", record.message),
            LogLevel::Debug => tracing::debug!(module, "{}", record.message),
            LogLevel::Info => tracing::info!(module, "{}", record.message),
            LogLevel::Warn => tracing::warn!(module, "{}", record.message),
            LogLevel::Error => tracing::error!(module, "{}", record.message),
        }
    }
}

/// The currently attached sink, swappable at runtime.
pub struct SinkSlot {
    current: RwLock<Arc<dyn LogSink>>,
}

impl SinkSlot {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            current: RwLock::new(sink),
        }
    }

    pub fn log(&self, level: LogLevel, module: Option<&str>, message: impl Into<String>) {
        self.emit(LogRecord::new(level, module, message));
    }

    pub fn emit(&self, record: LogRecord) {
        let sink = self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        sink.log(record);
    }

    /// Attach `sink`, replaying whatever the previous sink buffered.
    ///
    /// Returns how many records were replayed. The write lock is held across
    /// the replay so that no concurrent record can overtake the buffered ones.
    pub fn switch_to(&self, sink: Arc<dyn LogSink>) -> usize {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *current, sink.clone());
        let pending = previous.drain();
        let replayed = pending.len();
        for record in pending {
            sink.log(record);
        }
        replayed
    }

    /// Go back to buffering into a fresh [`BufferedSink`].
    pub fn switch_to_buffered(&self) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(BufferedSink::new());
    }
}

impl Default for SinkSlot {
    fn default() -> Self {
        Self::new(Arc::new(BufferedSink::new()))
    }
}

impl fmt::Debug for SinkSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkSlot").finish_non_exhaustive()
    }
}
