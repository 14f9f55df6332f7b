use std::collections::HashMap;
use std::sync::Mutex;

use log::debug;

use super::registry::Toolkit;

/// Memoizing view over the toolkit's extraction-function inventory.
///
/// One probe is shared across a whole run; each function name hits the
/// toolkit at most once and the verdict is cached for the probe's
/// lifetime. The underlying capability set is assumed stable for the
/// process, so a probe may be kept across runs against the same toolkit.
pub struct CapabilityProbe<'a> {
    toolkit: &'a dyn Toolkit,
    cache: Mutex<HashMap<String, bool>>,
}

impl<'a> CapabilityProbe<'a> {
    pub fn new(toolkit: &'a dyn Toolkit) -> Self {
        CapabilityProbe {
            toolkit,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Whether the named extraction function is available. Presets without
    /// a function descriptor pass `None` and are always available.
    pub fn is_available(&self, function: Option<&str>) -> bool {
        let Some(name) = function else {
            return true;
        };

        let mut cache = self.cache.lock().expect("capability cache poisoned");
        if let Some(&known) = cache.get(name) {
            return known;
        }

        let available = self.toolkit.has_function(name);
        debug!("capability probe: '{}' available={}", name, available);
        cache.insert(name.to_string(), available);
        available
    }
}
