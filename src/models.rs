use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Raw multi-valued text input from the configuration surface: a single
/// string or a list of strings, each possibly comma- or newline-delimited.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    One(String),
    Many(Vec<String>),
}

impl StringList {
    /// The raw items before any splitting or trimming.
    pub fn items(&self) -> Vec<&str> {
        match self {
            StringList::One(value) => vec![value.as_str()],
            StringList::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for StringList {
    fn from(value: &str) -> Self {
        StringList::One(value.to_string())
    }
}

impl From<Vec<String>> for StringList {
    fn from(values: Vec<String>) -> Self {
        StringList::Many(values)
    }
}

/// One disk image (or already-extracted directory) handed to the
/// orchestrator. Supplied externally; the sweep only reads from the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputArtifact {
    pub path: PathBuf,
    pub display_name: String,
}

impl InputArtifact {
    pub fn new(path: impl Into<PathBuf>, display_name: impl Into<String>) -> Self {
        InputArtifact {
            path: path.into(),
            display_name: display_name.into(),
        }
    }

    /// Build an input from a bare path, deriving the display name from the
    /// file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        InputArtifact { path, display_name }
    }

    /// Stem of the display name, used to derive output display names.
    pub fn base_name(&self) -> String {
        Path::new(&self.display_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.display_name.clone())
    }
}

/// Output artifact written for one successful (input, preset) pair. The
/// backing file is owned by the storage collaborator and outlives the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProducedArtifact {
    pub id: String,
    pub path: PathBuf,
    pub display_name: String,
    pub extension: String,
    pub data_type: String,
}

/// Catalog preset recorded as skipped because its extraction function is
/// missing from the toolkit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPreset {
    pub preset: String,
    pub plugin: Option<String>,
}

/// Per-(input, preset) execution record kept on the run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEntry {
    pub input: String,
    pub preset: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    pub query_command: String,
    pub rdump_command: String,
    pub query_stderr: String,
    pub rdump_stderr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_target: Option<String>,
}

/// Aggregated, structured result of one orchestration run. The sole return
/// value; the caller serializes it into its own result envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub started: String,
    pub command: String,
    pub artifacts: Vec<ProducedArtifact>,
    pub presets: Vec<String>,
    pub skipped_presets: Vec<SkippedPreset>,
    pub results: Vec<RunEntry>,
    pub selection: Vec<String>,
    pub selection_labels: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_display_name_from_path() {
        let input = InputArtifact::from_path("/cases/disk.E01");
        assert_eq!(input.display_name, "disk.E01");
        assert_eq!(input.base_name(), "disk");
    }

    #[test]
    fn base_name_without_extension() {
        let input = InputArtifact::new("/cases/extracted", "extracted");
        assert_eq!(input.base_name(), "extracted");
    }

    #[test]
    fn string_list_accepts_string_or_list() {
        let one: StringList = serde_json::from_str("\"browser\"").unwrap();
        assert_eq!(one.items(), vec!["browser"]);

        let many: StringList = serde_json::from_str("[\"browser\", \"usb\"]").unwrap();
        assert_eq!(many.items(), vec!["browser", "usb"]);
    }
}
