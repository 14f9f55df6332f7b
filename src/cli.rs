use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::constants::DEFAULT_QUERY_SCRIPT;

/// Command-line arguments for the artifact sweep tool.
///
/// The default invocation runs the preset sweep; subcommands cover the
/// single-script runner and catalog inspection.
#[derive(Parser, Debug)]
#[clap(
    name = "rust-artifact-sweep",
    about = "Sweep forensic disk images with a curated catalog of toolkit presets"
)]
pub struct Args {
    /// Disk image or extracted directory to analyze (repeatable)
    #[clap(short, long = "input")]
    pub inputs: Vec<PathBuf>,

    /// Directory where output artifacts are written
    #[clap(short, long, default_value = "sweep-output")]
    pub output: PathBuf,

    /// Preset scope to run: category id, display label or alias
    /// (comma-separated, repeatable)
    #[clap(short, long = "scope")]
    pub scopes: Vec<String>,

    /// Inline Yara rule text applied to each input
    #[clap(long)]
    pub rule: Option<String>,

    /// File containing Yara rule text applied to each input
    #[clap(long)]
    pub rule_file: Option<PathBuf>,

    /// Existing Yara rule files or directories (comma-separated, repeatable)
    #[clap(long = "rule-path")]
    pub rule_paths: Vec<String>,

    /// Record export destination URI (e.g. elastic://host:9200/index)
    #[clap(long)]
    pub export_uri: Option<String>,

    /// Case identifier attached to exported records
    #[clap(long)]
    pub case_id: Option<String>,

    /// Force record export on
    #[clap(long, conflicts_with = "no_export")]
    pub export: bool,

    /// Force record export off
    #[clap(long)]
    pub no_export: bool,

    /// Load the whole sweep request from a YAML file (flags above are
    /// ignored except as input fallback)
    #[clap(long)]
    pub request: Option<PathBuf>,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

impl Args {
    /// Tri-state export enablement: forced on, forced off, or absent
    /// (follows the presence of an explicit destination URI).
    pub fn export_enabled(&self) -> Option<bool> {
        if self.export {
            Some(true)
        } else if self.no_export {
            Some(false)
        } else {
            None
        }
    }
}

/// Available subcommands for the sweep tool.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single toolkit console script against every input
    Query {
        /// Console script name (e.g. target-info, target-query)
        #[clap(long, default_value = DEFAULT_QUERY_SCRIPT)]
        tool: String,

        /// Extra arguments passed to the script, shell-style
        #[clap(long, allow_hyphen_values = true)]
        args: Option<String>,
    },

    /// List the preset catalog with categories and extraction functions
    ListPresets,
}
