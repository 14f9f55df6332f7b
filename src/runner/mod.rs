// Re-export all items from the submodules
mod export;
mod pipeline;
mod report;
mod single;

// Re-export the sweep orchestrator
pub use pipeline::{run_sweep, SweepRequest};

// Re-export the single-script runner
pub use single::{run_single_query, QueryRequest};

// Re-export export resolution and report assembly
pub use export::{resolve_export, ExportTarget};
pub use report::ReportBuilder;
