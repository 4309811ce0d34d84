//! Check command - verify tooling and manifest without converting

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use meshprep_core::BlenderCleaner;

use crate::manifest::MeshprepManifest;

/// Arguments for the check command
#[derive(Args)]
pub struct CheckArgs {
    /// Path to meshprep.toml manifest
    #[arg(default_value = "meshprep.toml")]
    pub manifest: PathBuf,

    /// Path to the Blender executable
    #[arg(long)]
    pub blender: Option<PathBuf>,
}

/// Execute the check command
pub fn execute(args: CheckArgs) -> Result<()> {
    let mut blender_path = args.blender.clone();

    if args.manifest.is_file() {
        let manifest = MeshprepManifest::load(&args.manifest)?;
        manifest.validate()?;
        println!(
            "Manifest OK: {} job(s) in {}",
            manifest.jobs.len(),
            args.manifest.display()
        );
        if blender_path.is_none() {
            blender_path = manifest.tools.blender.map(PathBuf::from);
        }
    } else {
        println!(
            "No manifest at {} (skipping job checks)",
            args.manifest.display()
        );
    }

    let exe = BlenderCleaner::locate(blender_path.as_deref())?;
    println!("Blender: {}", exe.display());
    println!("Ready to convert.");
    Ok(())
}
