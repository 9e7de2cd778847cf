// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability: log sinks, structured messages and subscriber setup.
//!
//! The orchestrator never formats log lines inline. Each event is a message
//! struct from [`messages`] that knows its own level, and is written to the
//! app's current [`LogSink`]. Before a real sink is attached records are
//! buffered, and [`SinkSlot::switch_to`] replays them in call order.
//!
//! # Architecture
//!
//! * `sink` - `LogLevel`, `LogRecord`, `LogSink`, buffering and tracing sinks
//! * `messages` - message structs grouped by subsystem
//! * `logging` - `tracing-subscriber` initialisation
//!
//! # Usage
//!
//! ```rust
//! use the_appwood::errors::{FailureOrigin, Phase};
//! use the_appwood::observability::messages::module::ModuleFailed;
//! use the_appwood::observability::messages::StructuredLog;
//!
//! let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
//! let msg = ModuleFailed {
//!     module: "my_module",
//!     phase: Phase::Start,
//!     origin: FailureOrigin::Reported,
//!     error: &error,
//! };
//!
//! msg.log();
//! ```

mod logging;
pub mod messages;
mod sink;

pub use logging::{build_env_filter, init_logging, DEFAULT_LOG_FILTER};
pub use sink::{BufferedSink, LogLevel, LogRecord, LogSink, SinkSlot, TracingSink};
