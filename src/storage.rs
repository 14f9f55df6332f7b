//! Output storage boundary.
//!
//! One output artifact is created per successful (input, preset) pair.
//! The storage collaborator owns the backing files; they persist after
//! the orchestration run ends.

use std::fs;
use std::path::PathBuf;

use log::debug;
use uuid::Uuid;

use crate::errors::Result;
use crate::models::ProducedArtifact;

/// Handle to a newly created, writable output artifact.
#[derive(Debug, Clone)]
pub struct OutputHandle {
    pub id: String,
    pub path: PathBuf,
    pub display_name: String,
    pub extension: String,
    pub data_type: String,
}

impl OutputHandle {
    pub fn into_artifact(self) -> ProducedArtifact {
        ProducedArtifact {
            id: self.id,
            path: self.path,
            display_name: self.display_name,
            extension: self.extension,
            data_type: self.data_type,
        }
    }
}

/// Creates output artifacts for the pipeline to write into.
pub trait OutputStore: Send + Sync {
    fn create(&self, display_name: &str, extension: &str, data_type: &str)
        -> Result<OutputHandle>;
}

/// Stores artifacts as uuid-named files under one output directory.
#[derive(Debug, Clone)]
pub struct LocalOutputStore {
    root: PathBuf,
}

impl LocalOutputStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalOutputStore { root: root.into() }
    }
}

impl OutputStore for LocalOutputStore {
    fn create(
        &self,
        display_name: &str,
        extension: &str,
        data_type: &str,
    ) -> Result<OutputHandle> {
        fs::create_dir_all(&self.root)?;

        let id = Uuid::new_v4().to_string();
        let path = self.root.join(format!("{id}.{extension}"));
        // Claim the backing location up front so a failed run never leaves
        // a dangling handle.
        fs::File::create(&path)?;

        debug!("created output artifact '{}' at {}", display_name, path.display());
        Ok(OutputHandle {
            id,
            path,
            display_name: display_name.to_string(),
            extension: extension.to_string(),
            data_type: data_type.to_string(),
        })
    }
}
