//! Scratch workspace for in-flight conversions

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::progress::ProgressSink;

/// Transient drop zone for the generated cleaning script and the
/// intermediate cleaned mesh.
///
/// One pipeline owns one scratch directory and processes files strictly one
/// at a time, so entries never outlive the file that produced them. Swept at
/// the end of every per-file run. Two concurrent batches sharing one scratch
/// directory are unsupported and would corrupt results.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    /// Scratch rooted at an explicit location.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Scratch under the system temp directory.
    pub fn default_location() -> Self {
        Self::new(std::env::temp_dir().join("meshprep"))
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Create the directory if absent.
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Scratch path for the cleaned counterpart of `input`.
    pub fn cleaned_mesh_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("mesh");
        self.root.join(format!("{}_cleaned.obj", stem))
    }

    /// Delete every entry in the scratch directory.
    ///
    /// A failed deletion is reported and skipped; the sweep never fails the
    /// conversion that triggered it.
    pub fn sweep(&self, progress: &dyn ProgressSink) {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            // Nothing was created, nothing to sweep
            Err(_) => return,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let removed = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            if let Err(err) = removed {
                tracing::warn!("failed to remove scratch entry {:?}: {}", path, err);
                progress.log(&format!(
                    "Warning: failed to clean scratch file {}: {}",
                    path.display(),
                    err
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Discard;

    #[test]
    fn test_cleaned_mesh_path_uses_input_stem() {
        let scratch = ScratchDir::new("/tmp/scratch");
        let path = scratch.cleaned_mesh_path(Path::new("/models/robot.obj"));
        assert_eq!(path, Path::new("/tmp/scratch/robot_cleaned.obj"));
    }

    #[test]
    fn test_sweep_removes_all_entries() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::new(dir.path());
        fs::write(dir.path().join("clean_mesh.py"), "pass").unwrap();
        fs::write(dir.path().join("robot_cleaned.obj"), "o arm").unwrap();
        fs::create_dir(dir.path().join("leftover")).unwrap();

        scratch.sweep(&Discard);

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_sweep_on_missing_dir_is_noop() {
        let scratch = ScratchDir::new("/nonexistent/meshprep-scratch");
        scratch.sweep(&Discard);
    }
}
