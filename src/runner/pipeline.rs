//! The sweep pipeline: preset selection, two-stage invocation, export
//! fork and result aggregation.
//!
//! Execution is strictly sequential. The invocation harness mutates
//! process-wide state, so no two invocations may overlap; the orchestrator
//! blocks on each one and aborts the whole run on the first fatal error.

use std::fs;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::catalog::{
    build_custom_rule_preset, classify_presets, normalize_rule_paths, normalize_scopes,
    resolve_presets, CustomRuleOutcome, ScheduledPreset, Transform,
};
use crate::constants::{
    CSV_DATA_TYPE, CSV_EXTENSION, DEFAULT_RDUMP_ARGS, QUERY_SCRIPT, RDUMP_SCRIPT, TEXT_DATA_TYPE,
    TEXT_EXTENSION,
};
use crate::errors::{Result, SweepError};
use crate::models::{InputArtifact, RunEntry, RunReport, StringList};
use crate::mount::PathMaterializer;
use crate::runner::export::{resolve_export, ExportTarget};
use crate::runner::report::ReportBuilder;
use crate::storage::OutputStore;
use crate::toolkit::{self, CapabilityProbe, Toolkit};
use crate::util::quote_command;

/// Everything the caller configures for one sweep run.
///
/// `scopes` left absent means the legacy "run everything" default; an
/// explicit empty list means no category-based selection (only a custom
/// rule preset can run). The export flag, when absent, follows the
/// presence of an explicit `export_uri`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepRequest {
    #[serde(default)]
    pub inputs: Vec<InputArtifact>,
    #[serde(default)]
    pub scopes: Option<StringList>,
    #[serde(default)]
    pub rule_text: Option<String>,
    #[serde(default)]
    pub rule_paths: Option<StringList>,
    #[serde(default)]
    pub export_uri: Option<String>,
    #[serde(default)]
    pub case_id: Option<String>,
    #[serde(default)]
    pub export_enabled: Option<bool>,
}

/// Run the preset sweep described by `request` against every input.
///
/// Returns the aggregated run report, or the first fatal error. Presets
/// whose extraction function is missing are skipped and reported; every
/// other failure aborts the run immediately.
pub fn run_sweep(
    toolkit: &dyn Toolkit,
    store: &dyn OutputStore,
    materializer: &dyn PathMaterializer,
    request: &SweepRequest,
) -> Result<RunReport> {
    info!(
        "starting artifact sweep over {} input(s)",
        request.inputs.len()
    );

    if request.inputs.is_empty() {
        return Err(SweepError::Configuration(
            "no input artifacts were supplied".to_string(),
        ));
    }

    let scopes = normalize_scopes(request.scopes.as_ref(), true);
    debug!(
        "selected scopes: [{}]",
        scopes
            .iter()
            .map(|s| s.id())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let rule_text = request
        .rule_text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());
    let rule_paths = normalize_rule_paths(request.rule_paths.as_ref());
    let rules_requested = rule_text.is_some() || !rule_paths.is_empty();

    // Resolved before any invocation: a misconfigured export destination
    // must fail the run up front.
    let export = resolve_export(
        request.export_enabled,
        request.export_uri.as_deref(),
        request.case_id.as_deref(),
    )?;

    let selected = resolve_presets(&scopes);
    if selected.is_empty() && !rules_requested {
        return Err(SweepError::Configuration(
            "no presets match the selected scope".to_string(),
        ));
    }

    let probe = CapabilityProbe::new(toolkit);
    let (mut scheduled, skipped) = classify_presets(&probe, selected);

    if scheduled.is_empty() && !rules_requested {
        return Err(SweepError::Configuration(
            "no presets are available in this toolkit".to_string(),
        ));
    }

    let mut report = ReportBuilder::new(scopes);
    report.record_skips(skipped);

    // The temporary rule file must outlive the whole preset loop; the
    // guard drops (and deletes it) when this function returns, success or
    // not.
    let _rule_file_guard = match build_custom_rule_preset(&probe, rule_text, &rule_paths)? {
        CustomRuleOutcome::NotRequested => None,
        CustomRuleOutcome::Unavailable(skip) => {
            report.record_skip(skip);
            None
        }
        CustomRuleOutcome::Built(custom) => {
            let (preset, guard) = custom.into_parts();
            let plugin = preset.plugin().map(str::to_string);
            scheduled.push(ScheduledPreset { preset, plugin });
            guard
        }
    };

    for item in &scheduled {
        report.record_executed(&item.preset.name);
    }

    for input in &request.inputs {
        let working = materializer.materialize(&input.path)?;
        let working_path = working.path().to_string_lossy().into_owned();
        let base_name = input.base_name();

        for item in &scheduled {
            run_preset(
                toolkit,
                store,
                export.as_ref(),
                input,
                &working_path,
                &base_name,
                item,
                &mut report,
            )?;
        }
        // `working` drops here, releasing the materialized path before
        // the next image starts.
    }

    info!("sweep produced {} artifact(s)", report.artifact_count());
    let command = format!(
        "{} presets: {}",
        QUERY_SCRIPT,
        report.executed().join(", ")
    );
    report.finish(command)
}

#[allow(clippy::too_many_arguments)]
fn run_preset(
    toolkit: &dyn Toolkit,
    store: &dyn OutputStore,
    export: Option<&ExportTarget>,
    input: &InputArtifact,
    working_path: &str,
    base_name: &str,
    scheduled: &ScheduledPreset,
    report: &mut ReportBuilder,
) -> Result<()> {
    let preset = &scheduled.preset;

    let mut query_args = preset.arguments.clone();
    query_args.push(working_path.to_string());
    let query_command = quote_command(
        std::iter::once(preset.script.as_str()).chain(query_args.iter().map(String::as_str)),
    );
    info!("running {}", query_command);

    let primary = toolkit::invoke(
        toolkit,
        &preset.script,
        &query_args,
        None,
        preset.decode_output,
    )?;
    progress_tick(&preset.name);

    if !primary.succeeded() {
        return Err(stage_failure(
            &primary.stderr,
            format!(
                "{} preset '{}' failed for {}",
                preset.script, preset.name, input.display_name
            ),
        ));
    }

    let (body, rdump_command, rdump_stderr, extension, data_type) = match &preset.transform {
        Transform::Disabled => (
            primary.stdout.to_text(),
            String::new(),
            String::new(),
            preset
                .output_extension
                .clone()
                .unwrap_or_else(|| TEXT_EXTENSION.to_string()),
            preset
                .data_type
                .clone()
                .unwrap_or_else(|| TEXT_DATA_TYPE.to_string()),
        ),
        transform => {
            let rdump_args: Vec<String> = match transform {
                Transform::Override(args) => args.clone(),
                _ => DEFAULT_RDUMP_ARGS.iter().map(|a| a.to_string()).collect(),
            };
            let rdump_command = quote_command(
                std::iter::once(RDUMP_SCRIPT).chain(rdump_args.iter().map(String::as_str)),
            );
            debug!("converting records: {}", rdump_command);

            let converted = toolkit::invoke(
                toolkit,
                RDUMP_SCRIPT,
                &rdump_args,
                Some(primary.stdout.as_bytes()),
                true,
            )?;
            progress_tick(&preset.name);

            if !converted.succeeded() {
                return Err(stage_failure(
                    &converted.stderr,
                    format!("{} failed for preset '{}'", RDUMP_SCRIPT, preset.name),
                ));
            }

            (
                converted.stdout.to_text(),
                rdump_command,
                converted.stderr.trim().to_string(),
                preset
                    .output_extension
                    .clone()
                    .unwrap_or_else(|| CSV_EXTENSION.to_string()),
                preset
                    .data_type
                    .clone()
                    .unwrap_or_else(|| CSV_DATA_TYPE.to_string()),
            )
        }
    };

    // Export is a parallel consumer of the primary output, not a
    // transformation of the tabular result.
    let mut export_target = None;
    if let Some(target) = export {
        if preset.exports_records() {
            let plugin = scheduled.plugin.as_deref().unwrap_or(&preset.script);
            let export_args = target.rdump_args(plugin, &input.display_name);
            info!(
                "exporting records: {}",
                quote_command(
                    std::iter::once(RDUMP_SCRIPT).chain(export_args.iter().map(String::as_str))
                )
            );

            let sent = toolkit::invoke(
                toolkit,
                RDUMP_SCRIPT,
                &export_args,
                Some(primary.stdout.as_bytes()),
                true,
            )?;
            progress_tick(&preset.name);

            if !sent.succeeded() {
                return Err(stage_failure(
                    &sent.stderr,
                    format!("record export failed for preset '{}'", preset.name),
                ));
            }
            export_target = Some(target.uri().to_string());
        }
    }

    let handle = store.create(
        &format!("{base_name}-{}", preset.output_suffix),
        &extension,
        &data_type,
    )?;
    fs::write(&handle.path, &body)?;

    report.record_result(
        handle.clone().into_artifact(),
        RunEntry {
            input: input.display_name.clone(),
            preset: preset.name.clone(),
            plugin: scheduled.plugin.clone(),
            query_command,
            rdump_command,
            query_stderr: primary.stderr.trim().to_string(),
            rdump_stderr,
            export_target,
        },
    );
    Ok(())
}

/// Non-zero stage exit: the tool's own diagnostics win, a synthesized
/// message naming the preset and input fills in when they are empty.
fn stage_failure(stderr: &str, fallback: String) -> SweepError {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        SweepError::ToolExecution(fallback)
    } else {
        SweepError::ToolExecution(trimmed.to_string())
    }
}

fn progress_tick(preset: &str) {
    debug!("progress: invocation finished for '{}'", preset);
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::catalog::Preset;
    use crate::runner::export::resolve_export_with_ambient;
    use crate::storage::LocalOutputStore;
    use crate::toolkit::{ToolRegistry, ToolSignal};

    fn text_preset() -> ScheduledPreset {
        ScheduledPreset {
            preset: Preset {
                name: "Target info".to_string(),
                script: "target-info".to_string(),
                arguments: Vec::new(),
                output_suffix: "info".to_string(),
                categories: Vec::new(),
                transform: Transform::Disabled,
                output_extension: None,
                data_type: None,
                decode_output: true,
            },
            plugin: None,
        }
    }

    fn info_registry() -> ToolRegistry {
        let registry = ToolRegistry::new();
        registry.register_script("target-info", || {
            toolkit::write_stdout(b"hostname: box\n");
            ToolSignal::Unit
        });
        registry
    }

    #[test]
    fn disabled_transform_persists_primary_output_as_text() {
        let registry = info_registry();
        let out_dir = TempDir::new().unwrap();
        let store = LocalOutputStore::new(out_dir.path());
        let input = InputArtifact::new("/cases/disk.E01", "disk.E01");
        let mut report = ReportBuilder::new(Vec::new());

        run_preset(
            &registry,
            &store,
            None,
            &input,
            "/cases/disk.E01",
            "disk",
            &text_preset(),
            &mut report,
        )
        .unwrap();

        let report = report.finish("target-info".to_string()).unwrap();
        assert_eq!(report.artifacts[0].display_name, "disk-info");
        assert_eq!(report.artifacts[0].extension, TEXT_EXTENSION);
        assert_eq!(report.artifacts[0].data_type, TEXT_DATA_TYPE);
        assert_eq!(report.results[0].rdump_command, "");

        let body = std::fs::read_to_string(&report.artifacts[0].path).unwrap();
        assert_eq!(body, "hostname: box\n");
    }

    #[test]
    fn export_skips_presets_without_a_record_stream() {
        // rdump is deliberately unregistered: an attempted export would
        // fail resolution, so success proves the fork never ran.
        let registry = info_registry();
        let out_dir = TempDir::new().unwrap();
        let store = LocalOutputStore::new(out_dir.path());
        let input = InputArtifact::new("/cases/disk.E01", "disk.E01");
        let mut report = ReportBuilder::new(Vec::new());

        let target =
            resolve_export_with_ambient(None, Some("elastic://sink:9200/idx"), None, None)
                .unwrap()
                .unwrap();

        run_preset(
            &registry,
            &store,
            Some(&target),
            &input,
            "/cases/disk.E01",
            "disk",
            &text_preset(),
            &mut report,
        )
        .unwrap();

        let report = report.finish("target-info".to_string()).unwrap();
        assert!(report.results[0].export_target.is_none());
    }
}
