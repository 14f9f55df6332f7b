//! Global constants for the rust_sweeper application.
//!
//! This module centralizes tool names, default argument sets and output
//! conventions so the pipeline and the catalog agree on them.

// Toolkit console scripts
/// Script that runs one extraction function against an image.
pub const QUERY_SCRIPT: &str = "target-query";

/// Script that converts record-formatted output to tabular form or routes
/// it to a record sink.
pub const RDUMP_SCRIPT: &str = "rdump";

/// Default script for the single-query runner.
pub const DEFAULT_QUERY_SCRIPT: &str = "target-info";

/// Flag that selects the extraction function on the query command line.
pub const FUNCTION_FLAG: &str = "-f";

// Transform stage
/// Default transform arguments: CSV output, one row per timestamp.
pub const DEFAULT_RDUMP_ARGS: &[&str] = &["-C", "--multi-timestamp"];

/// Flag that routes transform output to an external record sink.
pub const RDUMP_WRITE_FLAG: &str = "-w";

// Record export
/// Environment variable holding the ambient default export destination.
pub const EXPORT_URI_ENV: &str = "RUST_SWEEPER_EXPORT_URI";

/// URI schemes accepted for the record export sink.
pub const EXPORT_SCHEMES: &[&str] = &["elastic", "elasticsearch", "es"];

// Output conventions
/// Extension for tabular stage output.
pub const CSV_EXTENSION: &str = "csv";

/// Extension for plain-text stage output.
pub const TEXT_EXTENSION: &str = "txt";

/// Data type tag for tabular preset output.
pub const CSV_DATA_TYPE: &str = "sweeper:target-query:csv";

/// Data type tag for text preset output.
pub const TEXT_DATA_TYPE: &str = "sweeper:target-query:text";

/// Data type tag for single-query runner output.
pub const QUERY_RESULT_DATA_TYPE: &str = "sweeper:query-result";

// Dynamic Yara preset
/// Display name of the synthesized Yara preset.
pub const YARA_PRESET_NAME: &str = "Yara (custom rule)";

/// Extraction function backing the synthesized Yara preset.
pub const YARA_FUNCTION: &str = "yara";

/// Suffix for the generated temporary rule file.
pub const YARA_RULE_SUFFIX: &str = ".yar";
