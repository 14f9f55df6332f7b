//! Path materialization boundary.
//!
//! Inputs may arrive as archives or forensic containers that an external
//! collaborator mounts or extracts before analysis. The orchestrator only
//! sees the resulting working path, scoped to one image's preset loop and
//! released before the next image starts.

use std::path::{Path, PathBuf};

use crate::errors::Result;

/// A working path plus its release obligation.
///
/// Dropping the handle releases whatever the materializer acquired
/// (unmount, temp-extraction cleanup). The passthrough implementation
/// holds nothing.
pub struct WorkingPath {
    path: PathBuf,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl WorkingPath {
    /// A working path with no release obligation.
    pub fn direct(path: PathBuf) -> Self {
        WorkingPath {
            path,
            release: None,
        }
    }

    /// A working path released by `release` when the handle drops.
    pub fn with_release(path: PathBuf, release: impl FnOnce() + Send + 'static) -> Self {
        WorkingPath {
            path,
            release: Some(Box::new(release)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkingPath {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Turns an input artifact's source path into an analyzable working path.
pub trait PathMaterializer: Send + Sync {
    fn materialize(&self, source: &Path) -> Result<WorkingPath>;
}

/// Uses the source path as-is; suits inputs that are already extracted.
#[derive(Debug, Default)]
pub struct DirectMaterializer;

impl PathMaterializer for DirectMaterializer {
    fn materialize(&self, source: &Path) -> Result<WorkingPath> {
        Ok(WorkingPath::direct(source.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn direct_materializer_passes_the_path_through() {
        let working = DirectMaterializer
            .materialize(Path::new("/cases/disk.E01"))
            .unwrap();
        assert_eq!(working.path(), Path::new("/cases/disk.E01"));
    }

    #[test]
    fn release_runs_exactly_once_on_drop() {
        let released = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&released);

        let working = WorkingPath::with_release(PathBuf::from("/mnt/image"), move || {
            flag.store(true, Ordering::SeqCst);
        });
        assert!(!released.load(Ordering::SeqCst));

        drop(working);
        assert!(released.load(Ordering::SeqCst));
    }
}
