//! # rust_sweeper
//!
//! A reproducible, scriptable sweep of forensic artifacts across disk
//! images, driving an embedded analysis toolkit through a curated preset
//! catalog.
//!
//! ## Overview
//!
//! rust_sweeper runs dozens of artifact-extraction operations (event
//! logs, shortcut files, browser history, registry hives, ...) against
//! each input image without spawning external processes: toolkit console
//! scripts are registered as in-process entry points and executed behind
//! an invocation harness that redirects their argument vector and I/O
//! streams. Record-formatted output is converted to tabular form by a
//! second stage, and can additionally be forked to an external record
//! sink.
//!
//! ## Features
//!
//! - **Preset catalog**: a curated table of extraction operations, tagged
//!   by category (application execution, browser activity, ...)
//! - **Scope selection**: category ids, display labels and aliases, with
//!   an "everything" wildcard
//! - **Capability filtering**: presets whose extraction function is not
//!   shipped by the toolkit are skipped and reported, never fatal
//! - **Custom Yara rules**: inline rule text and rule paths become one
//!   ad-hoc preset with a scoped temporary rule file
//! - **Record export**: the same record stream that feeds the tabular
//!   stage can be sent to a URI-addressed sink
//! - **Fail-fast policy**: the first non-zero tool exit aborts the run
//!   with the tool's own diagnostics
//!
//! ## Usage
//!
//! ```no_run
//! use rust_sweeper::models::InputArtifact;
//! use rust_sweeper::mount::DirectMaterializer;
//! use rust_sweeper::runner::{run_sweep, SweepRequest};
//! use rust_sweeper::storage::LocalOutputStore;
//! use rust_sweeper::toolkit::{self, global_registry, ToolSignal};
//!
//! # fn main() -> anyhow::Result<()> {
//! // The embedding environment registers the toolkit's entry points.
//! let registry = global_registry();
//! registry.register_script("target-query", || {
//!     toolkit::write_stdout(b"...records...");
//!     ToolSignal::Unit
//! });
//! registry.register_script("rdump", || ToolSignal::Unit);
//! registry.register_functions(["evtx", "mft.records"]);
//!
//! let request = SweepRequest {
//!     inputs: vec![InputArtifact::from_path("/cases/disk.E01")],
//!     scopes: Some("all_event_logs".into()),
//!     ..SweepRequest::default()
//! };
//!
//! let report = run_sweep(
//!     registry,
//!     &LocalOutputStore::new("/tmp/sweep"),
//!     &DirectMaterializer,
//!     &request,
//! )?;
//! println!("produced {} artifact(s)", report.artifacts.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`toolkit`]: entry-point registry, invocation harness, capability probe
//! - [`catalog`]: categories, the preset table, selection, custom rules
//! - [`runner`]: the sweep pipeline, export resolution, report assembly
//! - [`storage`]: output artifact creation
//! - [`mount`]: path materialization for archive/image inputs
//! - [`models`]: shared data models, including the run report
//! - [`errors`]: the failure taxonomy
//! - [`cli`]: command-line interface definitions
//!
//! ## Concurrency
//!
//! The invocation harness substitutes process-wide state for the duration
//! of each call, so invocations are strictly serialized; the orchestrator
//! runs single-threaded and blocks on every stage.

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Application constants: tool names, default arguments, output conventions
pub mod constants;

/// Failure taxonomy for sweep runs
pub mod errors;

/// Core data models shared across the pipeline
pub mod models;

/// Path materialization boundary for archive and image inputs
pub mod mount;

/// Preset catalog: categories, selection and the custom-rule injector
pub mod catalog;

/// Sweep orchestration: pipeline, export resolution, report assembly
pub mod runner;

/// Output storage boundary
pub mod storage;

/// Toolkit boundary: registry, invocation harness, capability probe
pub mod toolkit;

/// Command-line rendering and parsing helpers
pub mod util;
