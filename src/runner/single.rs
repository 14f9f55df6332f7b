//! Single-script runner: one arbitrary toolkit console script per input.
//!
//! The lightweight sibling of the preset sweep: no catalog, no transform
//! stage, text output captured straight into one artifact per input.

use std::fs;

use log::{info, warn};

use crate::constants::QUERY_RESULT_DATA_TYPE;
use crate::errors::{Result, SweepError};
use crate::models::{InputArtifact, RunEntry, RunReport};
use crate::mount::PathMaterializer;
use crate::runner::report::ReportBuilder;
use crate::storage::OutputStore;
use crate::toolkit::{self, Toolkit};
use crate::util::{quote_command, split_arguments};

/// Configuration for one single-script run.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub inputs: Vec<InputArtifact>,
    /// Console script to execute (e.g. `target-info`).
    pub script: String,
    /// Extra arguments, shell-style, passed before the input path.
    pub arguments: Option<String>,
}

/// Run `request.script` against every input and persist the textual
/// output, one artifact per input. Fail-fast on the first non-zero exit.
pub fn run_single_query(
    toolkit: &dyn Toolkit,
    store: &dyn OutputStore,
    materializer: &dyn PathMaterializer,
    request: &QueryRequest,
) -> Result<RunReport> {
    let script = request.script.trim();
    if script.is_empty() {
        return Err(SweepError::Configuration(
            "no toolkit console script provided".to_string(),
        ));
    }

    let tokens = match request.arguments.as_deref() {
        Some(raw) => split_arguments(raw).map_err(|reason| {
            SweepError::Configuration(format!("unable to parse script arguments: {reason}"))
        })?,
        None => Vec::new(),
    };

    if request.inputs.is_empty() {
        return Err(SweepError::Configuration(
            "no input artifacts were supplied".to_string(),
        ));
    }

    let mut report = ReportBuilder::new(Vec::new());
    report.record_executed(script);

    for input in &request.inputs {
        let working = materializer.materialize(&input.path)?;

        let mut args = tokens.clone();
        args.push(working.path().to_string_lossy().into_owned());
        let command =
            quote_command(std::iter::once(script).chain(args.iter().map(String::as_str)));
        info!("running {}", command);

        let invocation = toolkit::invoke(toolkit, script, &args, None, true)?;
        if !invocation.succeeded() {
            let trimmed = invocation.stderr.trim();
            let message = if trimmed.is_empty() {
                format!(
                    "toolkit script '{}' failed for {} with exit code {}",
                    script, input.display_name, invocation.exit_code
                )
            } else {
                trimmed.to_string()
            };
            return Err(SweepError::ToolExecution(message));
        }

        if !invocation.stderr.trim().is_empty() {
            warn!(
                "script '{}' reported warnings for {}: {}",
                script,
                input.display_name,
                invocation.stderr.trim()
            );
        }

        let handle = store.create(
            &format!("{}-{}", input.base_name(), script),
            "txt",
            QUERY_RESULT_DATA_TYPE,
        )?;
        fs::write(&handle.path, invocation.stdout.to_text())?;

        report.record_result(
            handle.clone().into_artifact(),
            RunEntry {
                input: input.display_name.clone(),
                preset: script.to_string(),
                plugin: None,
                query_command: command,
                rdump_command: String::new(),
                query_stderr: invocation.stderr.trim().to_string(),
                rdump_stderr: String::new(),
                export_target: None,
            },
        );
    }

    let command = quote_command(std::iter::once(script).chain(tokens.iter().map(String::as_str)));
    report.finish(command)
}
