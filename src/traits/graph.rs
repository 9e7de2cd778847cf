/// Read-only view of registered modules, as the resolver sees them.
///
/// Only names, dependency lists and priorities matter for ordering, so
/// anything that can answer these three questions can be resolved: the live
/// registry, a config file's module list, or a test fixture.
pub trait ModuleGraph {
    /// All module names, in registration order
    fn module_names(&self) -> Vec<&str>;

    /// Declared dependencies of `name`, or `None` if it isn't known
    fn dependencies(&self, name: &str) -> Option<&[String]>;

    /// Tie-break priority of `name`; unknown modules and modules without an
    /// explicit priority report 0
    fn priority(&self, name: &str) -> i32;

    fn contains(&self, name: &str) -> bool {
        self.dependencies(name).is_some()
    }
}
