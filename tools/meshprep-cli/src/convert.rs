//! Convert command - clean and convert a single OBJ file

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use meshprep_core::{BlenderCleaner, ConversionRequest, Pipeline, ScratchDir};

/// Arguments for the convert command
#[derive(Args)]
pub struct ConvertArgs {
    /// Input OBJ file
    pub input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Output base name (defaults to the input file stem)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Generate <CLASS>.java with one constant per group
    #[arg(long, value_name = "CLASS")]
    pub java_class: Option<String>,

    /// Write a .txt listing with one group per line
    #[arg(long)]
    pub listing: bool,

    /// Reorient/rescale the mesh to engine conventions
    #[arg(long)]
    pub transform: bool,

    /// Path to the Blender executable
    #[arg(long)]
    pub blender: Option<PathBuf>,

    /// Scratch directory for intermediate files
    #[arg(long)]
    pub scratch: Option<PathBuf>,
}

/// Execute the convert command
pub fn execute(args: ConvertArgs) -> Result<()> {
    let scratch = match &args.scratch {
        Some(dir) => ScratchDir::new(dir),
        None => ScratchDir::default_location(),
    };
    let blender = BlenderCleaner::locate(args.blender.as_deref())?;
    let pipeline = Pipeline::new(BlenderCleaner::new(blender, scratch.clone()), scratch);

    let output_name = args.name.clone().unwrap_or_else(|| {
        args.input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string()
    });

    let request = ConversionRequest {
        input: args.input.clone(),
        output_dir: args.output.clone(),
        output_name,
        java_class: args.java_class.clone(),
        write_listing: args.listing,
        apply_transform: args.transform,
    };

    let sink = |message: &str| println!("{}", message);
    let result = pipeline.process(&request, &sink)?;

    println!(
        "Converted {} group(s) -> {}",
        result.groups.len(),
        result.mesh_path.display()
    );
    Ok(())
}
