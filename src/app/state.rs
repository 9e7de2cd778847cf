// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::errors::{MisuseKind, Phase};

/// Where an app is in its lifecycle.
///
/// ```text
/// Pending -> Starting -> Running -> Stopping -> Stopped
///               |                      |
///               +------> Failed <------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppState {
    Pending,
    Starting,
    Running,
    Stopping,
    Stopped,
    Failed,
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppState::Pending => "pending",
            AppState::Starting => "starting",
            AppState::Running => "running",
            AppState::Stopping => "stopping",
            AppState::Stopped => "stopped",
            AppState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Mutable lifecycle bookkeeping, guarded by the app's mutex.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    pub(crate) state: AppState,
    /// Set once dependency resolution succeeded
    pub(crate) init_order: Option<Arc<[String]>>,
    /// Position in `init_order`; `-1` before the first module, `len` after the last
    pub(crate) init_index: isize,
    /// Modules that reported a successful start and have not stopped since, in start order
    pub(crate) running: Vec<String>,
}

impl Lifecycle {
    pub(crate) fn new() -> Self {
        Self {
            state: AppState::Pending,
            init_order: None,
            init_index: -1,
            running: Vec::new(),
        }
    }

    pub(crate) fn begin_start(&mut self) -> Result<(), MisuseKind> {
        match self.state {
            AppState::Pending => {
                self.state = AppState::Starting;
                Ok(())
            }
            _ => Err(MisuseKind::AlreadyStarted),
        }
    }

    pub(crate) fn begin_stop(&mut self) -> Result<(), MisuseKind> {
        match self.state {
            AppState::Running => {
                self.state = AppState::Stopping;
                Ok(())
            }
            AppState::Pending | AppState::Starting | AppState::Failed => Err(MisuseKind::NotRunning),
            AppState::Stopping | AppState::Stopped => Err(MisuseKind::AlreadyStopping),
        }
    }

    /// Move the cursor one step in `phase`'s direction and return the module
    /// now under it, or `None` once the order is exhausted.
    pub(crate) fn advance(&mut self, phase: Phase) -> Option<String> {
        let order = self.init_order.as_ref()?;
        let len = order.len() as isize;

        match phase {
            Phase::Start => {
                self.init_index = (self.init_index + 1).min(len);
            }
            Phase::Stop => {
                self.init_index = (self.init_index - 1).max(-1);
            }
        }

        if (0..len).contains(&self.init_index) {
            Some(order[self.init_index as usize].clone())
        } else {
            None
        }
    }

    pub(crate) fn record_done(&mut self, phase: Phase, module: &str) {
        match phase {
            Phase::Start => {
                if !self.running.iter().any(|m| m == module) {
                    self.running.push(module.to_string());
                }
            }
            Phase::Stop => self.running.retain(|m| m != module),
        }
    }

    pub(crate) fn finish(&mut self, phase: Phase) {
        self.state = match phase {
            Phase::Start => AppState::Running,
            Phase::Stop => AppState::Stopped,
        };
    }

    /// Only an in-flight run can fail.
    pub(crate) fn fail(&mut self) {
        if matches!(self.state, AppState::Starting | AppState::Stopping) {
            self.state = AppState::Failed;
        }
    }
}

/// Point-in-time view of an app, suitable for logging or JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppSnapshot {
    pub state: AppState,
    pub init_order: Option<Vec<String>>,
    pub init_index: isize,
    pub registered: Vec<String>,
    pub running: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_order(names: &[&str]) -> Lifecycle {
        let mut lifecycle = Lifecycle::new();
        let order: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        lifecycle.init_order = Some(order.into());
        lifecycle
    }

    #[test]
    fn test_start_transitions() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.begin_stop(), Err(MisuseKind::NotRunning));
        assert!(lifecycle.begin_start().is_ok());
        assert_eq!(lifecycle.state, AppState::Starting);
        assert_eq!(lifecycle.begin_start(), Err(MisuseKind::AlreadyStarted));
        assert_eq!(lifecycle.begin_stop(), Err(MisuseKind::NotRunning));
    }

    #[test]
    fn test_stop_transitions() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.state = AppState::Running;
        assert!(lifecycle.begin_stop().is_ok());
        assert_eq!(lifecycle.begin_stop(), Err(MisuseKind::AlreadyStopping));

        lifecycle.finish(Phase::Stop);
        assert_eq!(lifecycle.state, AppState::Stopped);
        assert_eq!(lifecycle.begin_stop(), Err(MisuseKind::AlreadyStopping));
        assert_eq!(lifecycle.begin_start(), Err(MisuseKind::AlreadyStarted));
    }

    #[test]
    fn test_cursor_walks_forward_then_back() {
        let mut lifecycle = with_order(&["a", "b"]);

        assert_eq!(lifecycle.advance(Phase::Start).as_deref(), Some("a"));
        assert_eq!(lifecycle.advance(Phase::Start).as_deref(), Some("b"));
        assert_eq!(lifecycle.advance(Phase::Start), None);
        assert_eq!(lifecycle.init_index, 2);

        assert_eq!(lifecycle.advance(Phase::Stop).as_deref(), Some("b"));
        assert_eq!(lifecycle.advance(Phase::Stop).as_deref(), Some("a"));
        assert_eq!(lifecycle.advance(Phase::Stop), None);
        assert_eq!(lifecycle.init_index, -1);
        assert_eq!(lifecycle.advance(Phase::Stop), None);
        assert_eq!(lifecycle.init_index, -1);
    }

    #[test]
    fn test_stop_after_partial_start_walks_from_cursor() {
        let mut lifecycle = with_order(&["a", "b", "c"]);
        lifecycle.advance(Phase::Start);
        lifecycle.advance(Phase::Start);

        assert_eq!(lifecycle.advance(Phase::Stop).as_deref(), Some("a"));
        assert_eq!(lifecycle.advance(Phase::Stop), None);
    }

    #[test]
    fn test_running_set() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.record_done(Phase::Start, "a");
        lifecycle.record_done(Phase::Start, "b");
        lifecycle.record_done(Phase::Start, "a");
        assert_eq!(lifecycle.running, vec!["a", "b"]);

        lifecycle.record_done(Phase::Stop, "a");
        assert_eq!(lifecycle.running, vec!["b"]);
    }

    #[test]
    fn test_fail_only_from_in_flight_states() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.fail();
        assert_eq!(lifecycle.state, AppState::Pending);

        lifecycle.state = AppState::Stopping;
        lifecycle.fail();
        assert_eq!(lifecycle.state, AppState::Failed);
    }
}
