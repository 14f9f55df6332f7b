use thiserror::Error;

/// Failure taxonomy for a sweep run.
///
/// Every variant is fatal: the orchestrator halts on the first occurrence
/// and the message surfaces to the caller verbatim. Presets whose
/// extraction function is missing are not errors; they land on the run
/// report's skip list instead.
#[derive(Debug, Error)]
pub enum SweepError {
    /// No toolkit entry point is registered under the requested script name.
    #[error("no toolkit entry point registered for '{0}'")]
    CapabilityNotFound(String),

    /// A primary, transform or export invocation finished with a non-zero
    /// exit status. Carries the tool's own diagnostics when it wrote any.
    #[error("{0}")]
    ToolExecution(String),

    /// The run request cannot be executed as configured.
    #[error("{0}")]
    Configuration(String),

    /// The run finished without producing a single output artifact.
    #[error("sweep completed without producing any output artifacts")]
    EmptyResult,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SweepError>;
