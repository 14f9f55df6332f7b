//! Integration tests for the single-script runner.

mod common;

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use rust_sweeper::errors::SweepError;
use rust_sweeper::models::InputArtifact;
use rust_sweeper::mount::DirectMaterializer;
use rust_sweeper::runner::{run_single_query, QueryRequest};
use rust_sweeper::storage::LocalOutputStore;
use rust_sweeper::toolkit::{self, ToolRegistry, ToolSignal};

use common::{calls_for, new_call_log, CallLog, RecordedCall};

fn info_registry(log: &CallLog) -> ToolRegistry {
    let registry = ToolRegistry::new();
    let calls = Arc::clone(log);
    registry.register_script("target-info", move || {
        let args = toolkit::current_args();
        calls.lock().unwrap().push(RecordedCall {
            script: "target-info".to_string(),
            args: args.clone(),
            stdin: Vec::new(),
        });
        toolkit::print_stdout(&format!("hostname: host-{}", args.len()));
        ToolSignal::Unit
    });
    registry
}

fn inputs_fixture(dir: &TempDir, names: &[&str]) -> Vec<InputArtifact> {
    names
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            fs::write(&path, b"image").unwrap();
            InputArtifact::from_path(path)
        })
        .collect()
}

#[test]
fn runs_one_script_per_input_and_persists_text() {
    let log = new_call_log();
    let registry = info_registry(&log);

    let input_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let store = LocalOutputStore::new(out_dir.path());

    let request = QueryRequest {
        inputs: inputs_fixture(&input_dir, &["disk.E01", "laptop.E01"]),
        script: "target-info".to_string(),
        arguments: None,
    };

    let report = run_single_query(&registry, &store, &DirectMaterializer, &request).unwrap();

    assert_eq!(report.presets, vec!["target-info"]);
    assert_eq!(report.artifacts.len(), 2);
    assert_eq!(report.artifacts[0].display_name, "disk-target-info");
    assert_eq!(report.artifacts[1].display_name, "laptop-target-info");
    assert_eq!(report.artifacts[0].extension, "txt");
    assert!(report.selection.is_empty());
    assert_eq!(report.command, "target-info");

    let body = fs::read_to_string(&report.artifacts[0].path).unwrap();
    assert_eq!(body, "hostname: host-1\n");

    assert_eq!(calls_for(&log, "target-info").len(), 2);
}

#[test]
fn parses_shell_style_arguments_before_the_input_path() {
    let log = new_call_log();
    let registry = info_registry(&log);

    let input_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let store = LocalOutputStore::new(out_dir.path());

    let request = QueryRequest {
        inputs: inputs_fixture(&input_dir, &["disk.E01"]),
        script: "target-info".to_string(),
        arguments: Some("--json -s 'a b'".to_string()),
    };

    let report = run_single_query(&registry, &store, &DirectMaterializer, &request).unwrap();
    assert_eq!(report.command, "target-info --json -s 'a b'");

    let calls = calls_for(&log, "target-info");
    let call = &calls[0];
    assert_eq!(call.args[0], "--json");
    assert_eq!(call.args[1], "-s");
    assert_eq!(call.args[2], "a b");
    assert!(call.args[3].ends_with("disk.E01"));
}

#[test]
fn unparsable_arguments_are_a_configuration_error() {
    let log = new_call_log();
    let registry = info_registry(&log);

    let input_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let store = LocalOutputStore::new(out_dir.path());

    let request = QueryRequest {
        inputs: inputs_fixture(&input_dir, &["disk.E01"]),
        script: "target-info".to_string(),
        arguments: Some("--broken 'quote".to_string()),
    };

    let error = run_single_query(&registry, &store, &DirectMaterializer, &request).unwrap_err();
    assert!(matches!(error, SweepError::Configuration(_)));
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn blank_script_name_is_a_configuration_error() {
    let registry = ToolRegistry::new();
    let out_dir = TempDir::new().unwrap();
    let store = LocalOutputStore::new(out_dir.path());

    let request = QueryRequest {
        inputs: Vec::new(),
        script: "   ".to_string(),
        arguments: None,
    };

    let error = run_single_query(&registry, &store, &DirectMaterializer, &request).unwrap_err();
    match error {
        SweepError::Configuration(message) => {
            assert!(message.contains("no toolkit console script"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn script_failure_carries_its_diagnostics() {
    let registry = ToolRegistry::new();
    registry.register_script("target-info", || {
        toolkit::write_stderr(b"cannot open container");
        ToolSignal::Code(1)
    });

    let input_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let store = LocalOutputStore::new(out_dir.path());

    let request = QueryRequest {
        inputs: inputs_fixture(&input_dir, &["disk.E01"]),
        script: "target-info".to_string(),
        arguments: None,
    };

    let error = run_single_query(&registry, &store, &DirectMaterializer, &request).unwrap_err();
    match error {
        SweepError::ToolExecution(message) => assert_eq!(message, "cannot open container"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn silent_script_failure_names_script_input_and_exit_code() {
    let registry = ToolRegistry::new();
    registry.register_script("target-info", || ToolSignal::Code(4));

    let input_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let store = LocalOutputStore::new(out_dir.path());

    let request = QueryRequest {
        inputs: inputs_fixture(&input_dir, &["disk.E01"]),
        script: "target-info".to_string(),
        arguments: None,
    };

    let error = run_single_query(&registry, &store, &DirectMaterializer, &request).unwrap_err();
    match error {
        SweepError::ToolExecution(message) => {
            assert!(message.contains("target-info"));
            assert!(message.contains("disk.E01"));
            assert!(message.contains('4'));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn warnings_on_stderr_do_not_fail_the_run() {
    let registry = ToolRegistry::new();
    registry.register_script("target-info", || {
        toolkit::print_stdout("ok");
        toolkit::print_stderr("minor complaint");
        ToolSignal::Unit
    });

    let input_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let store = LocalOutputStore::new(out_dir.path());

    let request = QueryRequest {
        inputs: inputs_fixture(&input_dir, &["disk.E01"]),
        script: "target-info".to_string(),
        arguments: None,
    };

    let report = run_single_query(&registry, &store, &DirectMaterializer, &request).unwrap();
    assert_eq!(report.artifacts.len(), 1);
    assert_eq!(report.results[0].query_stderr, "minor complaint");
}
