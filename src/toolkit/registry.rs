use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;

use super::harness::ToolSignal;

/// Callable entry point for one console script exposed by the toolkit.
///
/// An entry point reads its invocation context (argument tokens, stdin
/// bytes) and writes its output through the accessor functions in
/// [`crate::toolkit`]; the harness installs that context before the call
/// and tears it down afterwards.
pub type ToolEntryPoint = Arc<dyn Fn() -> ToolSignal + Send + Sync>;

/// Named-operation lookup service consumed by the invocation harness.
///
/// `resolve` answers "which callable implements console script X";
/// `has_function` answers "does the extraction toolkit ship function Y".
/// The capability probe memoizes the latter per function name.
pub trait Toolkit: Send + Sync {
    fn resolve(&self, script: &str) -> Option<ToolEntryPoint>;
    fn has_function(&self, function: &str) -> bool;
}

/// In-memory toolkit registry populated by the embedding environment.
#[derive(Default)]
pub struct ToolRegistry {
    scripts: RwLock<HashMap<String, ToolEntryPoint>>,
    functions: RwLock<HashSet<String>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the callable behind a console script name. A later
    /// registration under the same name replaces the earlier one.
    pub fn register_script<F>(&self, name: &str, entry: F)
    where
        F: Fn() -> ToolSignal + Send + Sync + 'static,
    {
        self.scripts
            .write()
            .expect("script table poisoned")
            .insert(name.to_string(), Arc::new(entry));
    }

    /// Declare an extraction function as present in this toolkit.
    pub fn register_function(&self, name: &str) {
        self.functions
            .write()
            .expect("function table poisoned")
            .insert(name.to_string());
    }

    /// Declare a batch of extraction functions.
    pub fn register_functions<'a>(&self, names: impl IntoIterator<Item = &'a str>) {
        let mut table = self.functions.write().expect("function table poisoned");
        for name in names {
            table.insert(name.to_string());
        }
    }
}

impl Toolkit for ToolRegistry {
    fn resolve(&self, script: &str) -> Option<ToolEntryPoint> {
        self.scripts
            .read()
            .expect("script table poisoned")
            .get(script)
            .cloned()
    }

    fn has_function(&self, function: &str) -> bool {
        self.functions
            .read()
            .expect("function table poisoned")
            .contains(function)
    }
}

lazy_static! {
    static ref GLOBAL_REGISTRY: ToolRegistry = ToolRegistry::new();
}

/// Process-wide registry used by the CLI binary. Embedders register their
/// toolkit entry points here during startup.
pub fn global_registry() -> &'static ToolRegistry {
    &GLOBAL_REGISTRY
}
