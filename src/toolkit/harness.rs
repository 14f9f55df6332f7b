//! In-process invocation of toolkit console scripts.
//!
//! Runs a registered entry point as if it were a standalone command line:
//! the harness installs the argument vector, an optional stdin buffer and
//! capture buffers for stdout/stderr into process-wide slots, calls the
//! entry point, and restores the previous state on every exit path. The
//! slots are process-wide state, so invocations are serialized behind a
//! single gate; at most one is in flight at any moment.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;

use lazy_static::lazy_static;
use log::debug;

use super::registry::Toolkit;
use crate::errors::{Result, SweepError};

/// Completion signal returned by a tool entry point.
///
/// Mirrors the ways a command-line program finishes: an explicit exit
/// code, a plain return (success), or a final message where any non-empty
/// text means failure.
#[derive(Debug)]
pub enum ToolSignal {
    Unit,
    Code(i32),
    Text(String),
}

/// Captured primary output of one invocation, in the decoding mode the
/// caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutput {
    Bytes(Vec<u8>),
    Text(String),
}

impl ToolOutput {
    /// Raw bytes regardless of decoding mode.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ToolOutput::Bytes(bytes) => bytes,
            ToolOutput::Text(text) => text.as_bytes(),
        }
    }

    /// Text form; raw bytes are decoded lossily.
    pub fn to_text(&self) -> String {
        match self {
            ToolOutput::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            ToolOutput::Text(text) => text.clone(),
        }
    }
}

/// Result of one harness invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub exit_code: i32,
    pub stdout: ToolOutput,
    pub stderr: String,
}

impl Invocation {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

struct IoSlots {
    args: Vec<String>,
    stdin: Vec<u8>,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

lazy_static! {
    // Serializes invocations: the slots below are shared by the whole
    // process and must never be overlapped or re-entered.
    static ref INVOCATION_GATE: Mutex<()> = Mutex::new(());
    static ref SLOTS: Mutex<Option<IoSlots>> = Mutex::new(None);
}

/// Typed payload a tool throws to terminate early with an explicit status,
/// the in-process analogue of `exit()`.
struct EarlyExit(i32);

/// Terminate the current invocation immediately with `code`.
///
/// Only meaningful while a harness invocation is in flight; the harness
/// unwinds to the call site, restores the redirected state and reports
/// `code` as the exit status.
pub fn exit_tool(code: i32) -> ! {
    panic::panic_any(EarlyExit(code));
}

fn with_slots<T>(f: impl FnOnce(&mut IoSlots) -> T) -> T {
    let mut guard = SLOTS.lock().unwrap_or_else(|e| e.into_inner());
    let slots = guard
        .as_mut()
        .expect("toolkit accessor used outside an invocation");
    f(slots)
}

/// Argument tokens of the in-flight invocation, argv-style (script name
/// excluded).
pub fn current_args() -> Vec<String> {
    with_slots(|slots| slots.args.clone())
}

/// Consume the bytes supplied on the invocation's standard input. Empty
/// when the caller supplied none, or on a second read.
pub fn read_stdin() -> Vec<u8> {
    with_slots(|slots| std::mem::take(&mut slots.stdin))
}

/// Append bytes to the invocation's captured standard output.
pub fn write_stdout(bytes: &[u8]) {
    with_slots(|slots| slots.stdout.extend_from_slice(bytes));
}

/// Append bytes to the invocation's captured standard error.
pub fn write_stderr(bytes: &[u8]) {
    with_slots(|slots| slots.stderr.extend_from_slice(bytes));
}

/// Line-oriented convenience writer for text-producing tools.
pub fn print_stdout(line: &str) {
    with_slots(|slots| {
        slots.stdout.extend_from_slice(line.as_bytes());
        slots.stdout.push(b'\n');
    });
}

/// Line-oriented convenience writer for diagnostics.
pub fn print_stderr(line: &str) {
    with_slots(|slots| {
        slots.stderr.extend_from_slice(line.as_bytes());
        slots.stderr.push(b'\n');
    });
}

// Restores the slots to their empty state on every exit path, including
// unwinds out of the entry point.
struct RedirectGuard;

impl RedirectGuard {
    fn install(args: Vec<String>, stdin: Option<Vec<u8>>) -> Self {
        let mut guard = SLOTS.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(IoSlots {
            args,
            stdin: stdin.unwrap_or_default(),
            stdout: Vec::new(),
            stderr: Vec::new(),
        });
        RedirectGuard
    }

    fn capture(self) -> (Vec<u8>, Vec<u8>) {
        let slots = SLOTS
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .expect("invocation slots vanished");
        std::mem::forget(self);
        (slots.stdout, slots.stderr)
    }
}

impl Drop for RedirectGuard {
    fn drop(&mut self) {
        *SLOTS.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

/// Execute the console script `script` with `args`, feeding `stdin` when
/// supplied, and capture its exit status and output.
///
/// Resolution failures surface as [`SweepError::CapabilityNotFound`].
/// `decode_stdout` selects the primary-output form: `true` decodes UTF-8
/// with invalid bytes replaced, `false` keeps raw bytes for binary-aware
/// downstream stages. Diagnostics are always decoded as text.
///
/// Exit-status normalization: an explicit code passes through, a plain
/// return and an empty final message count as 0, any other final message
/// counts as 1.
pub fn invoke(
    toolkit: &dyn Toolkit,
    script: &str,
    args: &[String],
    stdin: Option<&[u8]>,
    decode_stdout: bool,
) -> Result<Invocation> {
    let entry = toolkit
        .resolve(script)
        .ok_or_else(|| SweepError::CapabilityNotFound(script.to_string()))?;

    let _serial = INVOCATION_GATE.lock().unwrap_or_else(|e| e.into_inner());

    let guard = RedirectGuard::install(args.to_vec(), stdin.map(<[u8]>::to_vec));

    // Tool unwinds are normalized below; they must not reach the default
    // panic hook while the gate is held.
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| entry()));
    panic::set_hook(previous_hook);

    let (stdout_raw, stderr_raw) = guard.capture();

    let exit_code = match outcome {
        Ok(ToolSignal::Code(code)) => code,
        Ok(ToolSignal::Unit) => 0,
        Ok(ToolSignal::Text(text)) => {
            if text.is_empty() {
                0
            } else {
                1
            }
        }
        Err(payload) => match payload.downcast::<EarlyExit>() {
            Ok(exit) => exit.0,
            Err(payload) => {
                let detail = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                return Err(SweepError::ToolExecution(format!(
                    "tool '{script}' aborted: {detail}"
                )));
            }
        },
    };

    debug!("invoked '{}', exit code {}", script, exit_code);

    let stdout = if decode_stdout {
        ToolOutput::Text(String::from_utf8_lossy(&stdout_raw).into_owned())
    } else {
        ToolOutput::Bytes(stdout_raw)
    };

    Ok(Invocation {
        exit_code,
        stdout,
        stderr: String::from_utf8_lossy(&stderr_raw).into_owned(),
    })
}
