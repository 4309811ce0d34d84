//! Init command - create a template meshprep.toml

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

const TEMPLATE: &str = r#"# meshprep manifest
# Run every job below with: meshprep batch

[tools]
# Pin a Blender executable; otherwise MESHPREP_BLENDER or PATH is used.
# blender = "/opt/blender/blender"

[output]
dir = "out"

[[jobs]]
input = "exports/example.obj"
name = "example"
# java_class = "ExampleGroups"
listing = false
transform = false
"#;

/// Arguments for the init command
#[derive(Args)]
pub struct InitArgs {
    /// Where to write the manifest
    #[arg(default_value = "meshprep.toml")]
    pub path: PathBuf,

    /// Overwrite an existing manifest
    #[arg(long)]
    pub force: bool,
}

/// Execute the init command
pub fn execute(args: InitArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        );
    }

    std::fs::write(&args.path, TEMPLATE)
        .with_context(|| format!("Failed to write {}", args.path.display()))?;
    println!("Created {}", args.path.display());
    println!("Edit the [[jobs]] entries, then run: meshprep batch");
    Ok(())
}
