/// A unit of work handed to a [`Scheduler`].
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// The host's "run this on a later turn" primitive.
///
/// The orchestrator never calls a caller's completion callback from inside
/// the `start`/`stop` call that triggered it; it always goes through `defer`.
/// Implementations must run each task exactly once and must not run it
/// before `defer` has returned on the calling thread's stack.
pub trait Scheduler: Send + Sync {
    fn defer(&self, task: Task);
}
