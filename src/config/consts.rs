/// Requested-module token meaning "every registered module"
pub const WILDCARD: &str = "*";
/// Names a module may never take (map-poisoning keys and the wildcard)
pub const RESERVED_MODULE_NAMES: &[&str] = &["__proto__", WILDCARD];
/// Priority of a module that doesn't declare one
pub const DEFAULT_PRIORITY: i32 = 0;
/// Consecutive synchronous completions before the drive loop yields to the scheduler
pub const DEFAULT_SYNC_BATCH_LIMIT: usize = 1024;
