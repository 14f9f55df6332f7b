// Re-export all items from the submodules
mod categories;
mod custom_rules;
mod presets;
mod selector;

// Re-export scope handling
pub use categories::{normalize_scopes, Category};

// Re-export the preset catalog
pub use presets::{Preset, Transform, CATALOG};

// Re-export selection
pub use selector::{classify_presets, resolve_presets, ScheduledPreset};

// Re-export the custom-rule injector
pub use custom_rules::{
    build_custom_rule_preset, normalize_rule_paths, CustomRuleOutcome, CustomRulePreset,
};
