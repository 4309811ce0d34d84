//! meshprep.toml manifest parsing
//!
//! Shared manifest structures used by the batch and check commands.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// meshprep.toml manifest structure
#[derive(Debug, Deserialize)]
pub struct MeshprepManifest {
    #[serde(default)]
    pub tools: ToolsSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub jobs: Vec<JobEntry>,
}

/// External tool locations
#[derive(Debug, Default, Deserialize)]
pub struct ToolsSection {
    /// Path to the Blender executable.
    /// Falls back to MESHPREP_BLENDER and then PATH when absent.
    pub blender: Option<String>,
}

/// Output configuration
#[derive(Debug, Deserialize)]
pub struct OutputSection {
    /// Directory receiving one subdirectory per job
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "out".to_string()
}

/// Single conversion job
#[derive(Debug, Deserialize)]
pub struct JobEntry {
    /// Input OBJ path, relative to the manifest
    pub input: String,

    /// Output base name (defaults to the input file stem)
    #[serde(default)]
    pub name: Option<String>,

    /// Java class to generate for this job's groups
    #[serde(default)]
    pub java_class: Option<String>,

    /// Also write a plain .txt group listing
    #[serde(default)]
    pub listing: bool,

    /// Reorient/rescale the mesh to engine conventions
    #[serde(default)]
    pub transform: bool,
}

impl JobEntry {
    /// Output base name: explicit `name` or the input file stem.
    pub fn output_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => Path::new(&self.input)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("model")
                .to_string(),
        }
    }
}

impl MeshprepManifest {
    /// Load manifest from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse manifest from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse meshprep.toml")
    }

    /// Validate manifest fields
    pub fn validate(&self) -> Result<()> {
        if self.jobs.is_empty() {
            anyhow::bail!("No jobs in meshprep.toml (add a [[jobs]] entry)");
        }

        for job in &self.jobs {
            if job.input.trim().is_empty() {
                anyhow::bail!("Job with empty input path in meshprep.toml");
            }
            if !job.input.to_lowercase().ends_with(".obj") {
                anyhow::bail!(
                    "Job input {} is not an .obj file (only Wavefront OBJ is supported)",
                    job.input
                );
            }
            if let Some(class) = &job.java_class {
                if !is_java_identifier(class) {
                    anyhow::bail!(
                        "Invalid Java class name `{}` for job {} (must be a valid identifier)",
                        class,
                        job.input
                    );
                }
            }
        }

        Ok(())
    }
}

fn is_java_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
