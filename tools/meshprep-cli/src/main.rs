//! meshprep - Blockbench OBJ asset prep tool
//!
//! # Commands
//!
//! - `meshprep convert` - clean and convert a single OBJ file
//! - `meshprep batch` - run every job in a meshprep.toml manifest
//! - `meshprep check` - verify Blender and validate the manifest
//! - `meshprep init` - create a template meshprep.toml
//!
//! # Usage
//!
//! ```bash
//! # One-off conversion with a Java constants class
//! meshprep convert exports/robot.obj -o assets/robot --java-class RobotGroups
//!
//! # Everything declared in meshprep.toml
//! meshprep batch
//! ```
//!
//! # Manifest (meshprep.toml)
//!
//! ```toml
//! [tools]
//! blender = "/opt/blender/blender"
//!
//! [output]
//! dir = "out"
//!
//! [[jobs]]
//! input = "exports/robot.obj"
//! name = "robot"
//! java_class = "RobotGroups"
//! listing = true
//! ```

mod batch;
mod check;
mod convert;
mod init;
mod manifest;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// meshprep - Blockbench OBJ asset prep tool
#[derive(Parser)]
#[command(name = "meshprep")]
#[command(about = "Cleans and deduplicates Blockbench OBJ exports for engine import")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean and convert a single OBJ file
    Convert(convert::ConvertArgs),

    /// Run every job in a meshprep.toml manifest
    Batch(batch::BatchArgs),

    /// Verify Blender availability and validate the manifest
    Check(check::CheckArgs),

    /// Create a template meshprep.toml manifest
    Init(init::InitArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert(args) => convert::execute(args),
        Commands::Batch(args) => batch::execute(args),
        Commands::Check(args) => check::execute(args),
        Commands::Init(args) => init::execute(args),
    }
}
