// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod resolver;
pub mod scheduler;
mod trampoline;

pub use resolver::{resolve, resolve_waves};
pub use scheduler::{ManualScheduler, TokioScheduler};
pub use trampoline::{Completion, DoneCallback};

pub(crate) use trampoline::Drive;
