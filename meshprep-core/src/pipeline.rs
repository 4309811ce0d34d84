//! Conversion pipeline orchestration
//!
//! Sequences clean -> deduplicate -> finalize -> artifacts for each request,
//! reporting milestones to a progress sink and sweeping scratch space after
//! every file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::artifacts;
use crate::cleaner::MeshCleaner;
use crate::dedup;
use crate::error::{ConvertError, Result};
use crate::progress::ProgressSink;
use crate::scratch::ScratchDir;

/// Everything needed to convert one OBJ file. Immutable per run.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Raw exported OBJ. Never mutated.
    pub input: PathBuf,
    /// Directory receiving the final mesh and companion artifacts.
    pub output_dir: PathBuf,
    /// Base name of the final mesh (and listing) file.
    pub output_name: String,
    /// Emit `<class>.java` with one constant per group.
    pub java_class: Option<String>,
    /// Emit `<output_name>.txt` with one group per line.
    pub write_listing: bool,
    /// Reorient/rescale/ground the mesh to engine conventions.
    pub apply_transform: bool,
}

/// Paths and groups produced by one successful conversion.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub mesh_path: PathBuf,
    pub java_path: Option<PathBuf>,
    pub listing_path: Option<PathBuf>,
    /// Final group names, sorted.
    pub groups: Vec<String>,
}

/// Outcome of one file within a batch.
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: Result<ConversionResult>,
}

/// Per-file outcomes of one batch, in input order.
#[derive(Debug)]
pub struct BatchSummary {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchSummary {
    /// True when at least one file failed.
    pub fn had_errors(&self) -> bool {
        self.outcomes.iter().any(|o| o.result.is_err())
    }
}

/// Orchestrates the per-file conversion sequence.
///
/// Owns its scratch directory; run one batch at a time against it.
pub struct Pipeline<C: MeshCleaner> {
    cleaner: C,
    scratch: ScratchDir,
}

impl<C: MeshCleaner> Pipeline<C> {
    pub fn new(cleaner: C, scratch: ScratchDir) -> Self {
        Self { cleaner, scratch }
    }

    /// Convert one file.
    ///
    /// The scratch directory is swept before returning, whether the
    /// conversion succeeded or not.
    pub fn process(
        &self,
        request: &ConversionRequest,
        progress: &dyn ProgressSink,
    ) -> Result<ConversionResult> {
        let result = self.run_stages(request, progress);
        self.scratch.sweep(progress);
        result
    }

    fn run_stages(
        &self,
        request: &ConversionRequest,
        progress: &dyn ProgressSink,
    ) -> Result<ConversionResult> {
        if !request.input.is_file() {
            return Err(ConvertError::InputNotFound(request.input.clone()));
        }

        progress.log("Cleaning mesh with Blender...");
        let cleaned = self
            .cleaner
            .clean(&request.input, request.apply_transform)?;
        if !cleaned.is_file() {
            return Err(ConvertError::ExternalStage(
                "cleaning stage reported success but the cleaned mesh is missing".to_string(),
            ));
        }

        progress.log("Deduplicating group names...");
        let report = dedup::deduplicate_groups(&cleaned)?;

        if report.renames.is_empty() {
            progress.log("No duplicate groups found.");
        } else {
            progress.log(&format!("Renamed {} group(s).", report.renames.len()));
            for rename in &report.renames {
                progress.log(&format!("  {} -> {}", rename.from, rename.to));
            }
        }
        progress.log(&format!(
            "Found {} group(s) after processing.",
            report.groups.len()
        ));

        fs::create_dir_all(&request.output_dir)?;
        let mesh_path = request
            .output_dir
            .join(format!("{}.obj", request.output_name));
        move_file(&cleaned, &mesh_path)?;
        progress.log(&format!("Final OBJ saved to: {}", mesh_path.display()));

        let java_path = match &request.java_class {
            Some(class_name) => {
                let path =
                    artifacts::write_java_class(class_name, &report.groups, &request.output_dir)?;
                progress.log(&format!("Java mapping saved to: {}", path.display()));
                Some(path)
            }
            None => None,
        };

        let listing_path = if request.write_listing {
            let path = artifacts::write_group_listing(
                &report.groups,
                &request.output_dir,
                &request.output_name,
            )?;
            progress.log(&format!("Group list saved to: {}", path.display()));
            Some(path)
        } else {
            None
        };

        Ok(ConversionResult {
            mesh_path,
            java_path,
            listing_path,
            groups: report.groups,
        })
    }

    /// Convert every request in order, capturing per-file failures.
    ///
    /// Fails outright only when the cleaning stage is unavailable; that is
    /// checked before any file work starts, so a missing tool never leaves
    /// scratch state behind. Everything else is recorded per file and the
    /// batch runs to completion.
    pub fn process_batch(
        &self,
        requests: &[ConversionRequest],
        progress: &dyn ProgressSink,
    ) -> Result<BatchSummary> {
        self.cleaner.ensure_available()?;

        let mut outcomes = Vec::with_capacity(requests.len());
        for request in requests {
            progress.log(&format!("Processing: {}", request.input.display()));
            let result = self.process(request, progress);
            if let Err(err) = &result {
                progress.log(&format!(
                    "Error processing {}: {}",
                    request.input.display(),
                    err
                ));
                tracing::error!("conversion failed for {:?}: {}", request.input, err);
            }
            outcomes.push(FileOutcome {
                input: request.input.clone(),
                result,
            });
        }

        let summary = BatchSummary { outcomes };
        if summary.had_errors() {
            progress.log("Some conversions failed. Check the log above.");
        } else {
            progress.log("All conversions complete.");
        }
        Ok(summary)
    }
}

/// Move, falling back to copy+delete when source and target sit on
/// different filesystems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}
