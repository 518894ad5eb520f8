//! Module graph port.

use async_trait::async_trait;

use crate::module::ModuleDescriptor;

/// Extra information requested from the module graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Attach the newest available version as `update`.
    pub updates: bool,
    /// Attach the list of known versions.
    pub versions: bool,
}

/// Turns user patterns into resolved module descriptors.
///
/// Implementations may perform network calls to build the dependency graph.
/// A pattern that cannot be resolved is reported as a descriptor carrying an
/// `error`, never as a failure of the whole call.
///
/// # Usage
///
/// ```ignore
/// let graph: Arc<dyn ModuleGraphPort> = /* ... */;
/// let mods = graph.list_modules(&["all".to_string()], ListOptions::default()).await;
/// ```
#[async_trait]
pub trait ModuleGraphPort: Send + Sync {
    /// Resolve `patterns` into descriptors, in pattern order.
    async fn list_modules(&self, patterns: &[String], options: ListOptions)
    -> Vec<ModuleDescriptor>;
}
