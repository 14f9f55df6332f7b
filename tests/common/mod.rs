//! Shared fixtures for integration tests: a scripted fake toolkit.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use rust_sweeper::toolkit::{self, ToolRegistry, ToolSignal};

/// Chronological record of one invocation served by the fake toolkit.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub script: String,
    pub args: Vec<String>,
    pub stdin: Vec<u8>,
}

pub type CallLog = Arc<Mutex<Vec<RecordedCall>>>;

pub fn new_call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls_for(log: &CallLog, script: &str) -> Vec<RecordedCall> {
    log.lock()
        .unwrap()
        .iter()
        .filter(|call| call.script == script)
        .cloned()
        .collect()
}

/// Registry with well-behaved `target-query` and `rdump` fakes.
///
/// The query fake echoes its argument vector as pseudo records. The rdump
/// fake wraps its stdin in `csv<...>`, unless invoked with the `-w` write
/// flag, in which case it swallows the records like a record sink would.
pub fn scripted_registry(log: &CallLog) -> ToolRegistry {
    let registry = ToolRegistry::new();

    let calls = Arc::clone(log);
    registry.register_script("target-query", move || {
        let args = toolkit::current_args();
        calls.lock().unwrap().push(RecordedCall {
            script: "target-query".to_string(),
            args: args.clone(),
            stdin: Vec::new(),
        });
        toolkit::write_stdout(format!("records[{}]", args.join(" ")).as_bytes());
        ToolSignal::Unit
    });

    let calls = Arc::clone(log);
    registry.register_script("rdump", move || {
        let args = toolkit::current_args();
        let stdin = toolkit::read_stdin();
        calls.lock().unwrap().push(RecordedCall {
            script: "rdump".to_string(),
            args: args.clone(),
            stdin: stdin.clone(),
        });
        if args.first().map(String::as_str) != Some("-w") {
            toolkit::write_stdout(
                format!("csv<{}>", String::from_utf8_lossy(&stdin)).as_bytes(),
            );
        }
        ToolSignal::Unit
    });

    registry
}
