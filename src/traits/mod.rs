pub mod graph;
pub mod hook;
pub mod scheduler;

pub use graph::ModuleGraph;
pub use hook::{AsyncLifecycle, LifecycleHook};
pub use scheduler::{Scheduler, Task};
