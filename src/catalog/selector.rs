use log::warn;

use super::categories::Category;
use super::presets::{Preset, CATALOG};
use crate::models::SkippedPreset;
use crate::toolkit::CapabilityProbe;

/// Resolve a normalized category set into the matching catalog presets.
///
/// The wildcard selects the whole catalog. Otherwise a preset is included
/// when any of its declared categories intersects the requested set
/// (OR-matching); catalog order is preserved and each entry appears at
/// most once. A preset with no declared category is only reachable
/// through the wildcard.
pub fn resolve_presets(scopes: &[Category]) -> Vec<Preset> {
    if scopes.contains(&Category::Everything) {
        return CATALOG.clone();
    }

    CATALOG
        .iter()
        .filter(|preset| preset.categories.iter().any(|c| scopes.contains(c)))
        .cloned()
        .collect()
}

/// A preset cleared for execution, with its resolved function descriptor.
#[derive(Debug, Clone)]
pub struct ScheduledPreset {
    pub preset: Preset,
    pub plugin: Option<String>,
}

/// Partition presets into executable and skipped sets based on which
/// extraction functions the toolkit actually ships. Skipped presets never
/// fail the run by themselves.
pub fn classify_presets(
    probe: &CapabilityProbe<'_>,
    presets: Vec<Preset>,
) -> (Vec<ScheduledPreset>, Vec<SkippedPreset>) {
    let mut available = Vec::new();
    let mut skipped = Vec::new();

    for preset in presets {
        let plugin = preset.plugin().map(str::to_string);
        if probe.is_available(plugin.as_deref()) {
            available.push(ScheduledPreset { preset, plugin });
        } else {
            warn!(
                "skipping preset '{}': function '{}' is not available",
                preset.name,
                plugin.as_deref().unwrap_or("<none>")
            );
            skipped.push(SkippedPreset {
                preset: preset.name.clone(),
                plugin,
            });
        }
    }

    (available, skipped)
}
