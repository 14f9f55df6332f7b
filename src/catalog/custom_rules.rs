//! Ad-hoc Yara preset built from user-supplied rules.
//!
//! Inline rule text and/or rule file paths become at most one synthetic
//! preset that runs the pattern-matching function against their union.
//! The generated temporary rule file lives exactly as long as the handle
//! returned here, so it is removed however the run ends.

use std::io::Write;
use std::path::Path;

use log::{debug, warn};
use tempfile::NamedTempFile;

use super::presets::{Preset, Transform};
use crate::constants::{
    FUNCTION_FLAG, QUERY_SCRIPT, YARA_FUNCTION, YARA_PRESET_NAME, YARA_RULE_SUFFIX,
};
use crate::errors::Result;
use crate::models::{SkippedPreset, StringList};
use crate::toolkit::CapabilityProbe;

/// Outcome of attempting to build the ad-hoc Yara preset.
pub enum CustomRuleOutcome {
    /// No inline text and no rule paths were supplied.
    NotRequested,
    /// The preset is ready to schedule.
    Built(CustomRulePreset),
    /// Rules were supplied but the pattern-matching function is missing.
    Unavailable(SkippedPreset),
}

/// The synthesized preset plus the scoped temporary rule file backing it.
pub struct CustomRulePreset {
    pub preset: Preset,
    rule_file: Option<NamedTempFile>,
}

impl CustomRulePreset {
    /// Path of the generated rule file, when inline text was supplied.
    pub fn rule_file_path(&self) -> Option<&Path> {
        self.rule_file.as_ref().map(NamedTempFile::path)
    }

    /// Split into the schedulable preset and the rule-file guard. The
    /// guard must be kept alive until every invocation of the preset has
    /// finished.
    pub fn into_parts(self) -> (Preset, Option<NamedTempFile>) {
        (self.preset, self.rule_file)
    }
}

/// Split raw rule-path input on commas and newlines, trimming and
/// de-duplicating while preserving first-seen order.
pub fn normalize_rule_paths(raw: Option<&StringList>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let mut normalized: Vec<String> = Vec::new();
    for item in raw.items() {
        for segment in item.split([',', '\n']) {
            let cleaned = segment.trim();
            if cleaned.is_empty() || normalized.iter().any(|seen| seen.as_str() == cleaned) {
                continue;
            }
            normalized.push(cleaned.to_string());
        }
    }
    normalized
}

/// Build the ad-hoc Yara preset from inline rule text and/or rule paths.
///
/// Returns [`CustomRuleOutcome::NotRequested`] when neither is supplied
/// after trimming. A missing pattern-matching function is recorded as a
/// skip, never an error. Inline text is persisted to a temporary `.yar`
/// file that is deleted when the returned handle drops.
pub fn build_custom_rule_preset(
    probe: &CapabilityProbe<'_>,
    inline_rule: Option<&str>,
    rule_paths: &[String],
) -> Result<CustomRuleOutcome> {
    let inline = inline_rule.map(str::trim).filter(|text| !text.is_empty());
    if inline.is_none() && rule_paths.is_empty() {
        return Ok(CustomRuleOutcome::NotRequested);
    }

    if !probe.is_available(Some(YARA_FUNCTION)) {
        warn!("skipping custom Yara execution: function is not available");
        return Ok(CustomRuleOutcome::Unavailable(SkippedPreset {
            preset: YARA_PRESET_NAME.to_string(),
            plugin: Some(YARA_FUNCTION.to_string()),
        }));
    }

    let mut rule_arguments: Vec<String> = Vec::new();
    let mut rule_file = None;

    if let Some(text) = inline {
        let mut file = tempfile::Builder::new()
            .suffix(YARA_RULE_SUFFIX)
            .tempfile()?;
        file.write_all(text.as_bytes())?;
        file.flush()?;
        debug!("wrote inline rule to {}", file.path().display());
        rule_arguments.push(file.path().to_string_lossy().into_owned());
        rule_file = Some(file);
    }
    rule_arguments.extend(rule_paths.iter().cloned());

    let mut arguments = vec![
        FUNCTION_FLAG.to_string(),
        YARA_FUNCTION.to_string(),
        "-r".to_string(),
    ];
    arguments.extend(rule_arguments);

    let preset = Preset {
        name: YARA_PRESET_NAME.to_string(),
        script: QUERY_SCRIPT.to_string(),
        arguments,
        output_suffix: YARA_FUNCTION.to_string(),
        categories: Vec::new(),
        transform: Transform::Default,
        output_extension: None,
        data_type: None,
        decode_output: false,
    };

    Ok(CustomRuleOutcome::Built(CustomRulePreset { preset, rule_file }))
}
