//! Batch command - run every job in a meshprep.toml manifest
//!
//! Each job gets its own subdirectory under the output directory, named
//! after the input file, so artifacts from different models never clobber
//! each other.

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use meshprep_core::{BlenderCleaner, ConversionRequest, Pipeline, ScratchDir};

use crate::manifest::MeshprepManifest;

/// Arguments for the batch command
#[derive(Args)]
pub struct BatchArgs {
    /// Path to meshprep.toml manifest
    #[arg(default_value = "meshprep.toml")]
    pub manifest: PathBuf,

    /// Output directory (overrides manifest)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Scratch directory for intermediate files
    #[arg(long)]
    pub scratch: Option<PathBuf>,
}

/// Execute the batch command
pub fn execute(args: BatchArgs) -> Result<()> {
    let manifest = MeshprepManifest::load(&args.manifest)?;
    manifest.validate()?;

    // Manifest paths are relative to its directory
    let base_dir = args
        .manifest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let output_root = args
        .output
        .clone()
        .unwrap_or_else(|| base_dir.join(&manifest.output.dir));

    let requests: Vec<ConversionRequest> = manifest
        .jobs
        .iter()
        .map(|job| {
            let output_name = job.output_name();
            let subdir = Path::new(&job.input)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(&output_name)
                .to_string();
            ConversionRequest {
                input: base_dir.join(&job.input),
                output_dir: output_root.join(subdir),
                output_name,
                java_class: job.java_class.clone(),
                write_listing: job.listing,
                apply_transform: job.transform,
            }
        })
        .collect();

    let scratch = match &args.scratch {
        Some(dir) => ScratchDir::new(dir),
        None => ScratchDir::default_location(),
    };
    let blender_path = manifest.tools.blender.as_ref().map(PathBuf::from);
    let blender = BlenderCleaner::locate(blender_path.as_deref())?;
    let pipeline = Pipeline::new(BlenderCleaner::new(blender, scratch.clone()), scratch);

    println!(
        "Running {} job(s) from {}",
        requests.len(),
        args.manifest.display()
    );

    let sink = |message: &str| println!("{}", message);
    let summary = pipeline.process_batch(&requests, &sink)?;

    let failed = summary
        .outcomes
        .iter()
        .filter(|o| o.result.is_err())
        .count();
    if failed > 0 {
        anyhow::bail!("{} of {} conversions failed", failed, summary.outcomes.len());
    }

    println!("{} conversion(s) complete.", summary.outcomes.len());
    Ok(())
}
