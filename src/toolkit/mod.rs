// Re-export all items from the submodules
mod capability;
mod harness;
mod registry;

// Re-export the invocation harness surface
pub use harness::{
    current_args, exit_tool, invoke, print_stderr, print_stdout, read_stdin, write_stderr,
    write_stdout, Invocation, ToolOutput, ToolSignal,
};

// Re-export the registry and capability probe
pub use capability::CapabilityProbe;
pub use registry::{global_registry, ToolEntryPoint, ToolRegistry, Toolkit};
