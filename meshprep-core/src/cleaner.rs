//! External Blender cleaning stage
//!
//! Geometry work (normal fixup, triangulation, vertex welding, optional
//! reorientation to engine conventions) is delegated to a headless Blender
//! subprocess. The pipeline only depends on the `MeshCleaner` seam, so tests
//! substitute their own implementation and the invocation mechanism stays
//! swappable.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{ConvertError, Result};
use crate::scratch::ScratchDir;

/// Environment variable overriding Blender discovery.
pub const BLENDER_ENV_VAR: &str = "MESHPREP_BLENDER";

/// Python script run by headless Blender.
///
/// Receives `<input> <output> <transform>` after the `--` separator. Cleans
/// every mesh object in the scene; exits non-zero when the import yields no
/// mesh objects. Transform mode reorients, rescales, and grounds the
/// combined geometry to the engine's coordinate and scale conventions.
const CLEAN_SCRIPT: &str = r#"
import bpy
import sys
import math
import addon_utils
from mathutils import Vector

addon_utils.enable("io_scene_obj")

# Engine convention: 16 Blockbench pixel units per engine unit, meshes rest
# just above the ground plane.
TARGET_SCALE = 0.0625
GROUND_CLEARANCE = 0.01

argv = sys.argv
argv = argv[argv.index("--") + 1:]
input_path = argv[0]
output_path = argv[1]
apply_transform = argv[2] == "1"

bpy.ops.wm.read_factory_settings(use_empty=True)
bpy.ops.import_scene.obj(filepath=input_path)

mesh_objects = [obj for obj in bpy.context.scene.objects if obj.type == 'MESH']
if not mesh_objects:
    print("No mesh objects found.")
    sys.exit(1)

for obj in mesh_objects:
    obj.select_set(True)
bpy.context.view_layer.objects.active = mesh_objects[0]

bpy.ops.object.transform_apply(location=True, rotation=True, scale=True)
bpy.ops.object.mode_set(mode='EDIT')
bpy.ops.mesh.select_all(action='SELECT')
bpy.ops.mesh.normals_make_consistent(inside=False)
bpy.ops.mesh.quads_convert_to_tris()
bpy.ops.mesh.remove_doubles(threshold=0.0001)
bpy.ops.object.mode_set(mode='OBJECT')

if apply_transform:
    bpy.ops.transform.rotate(value=math.pi, orient_axis='X')
    bpy.ops.transform.rotate(value=math.pi, orient_axis='Z')
    bpy.ops.transform.resize(value=(TARGET_SCALE, TARGET_SCALE, TARGET_SCALE))
    bpy.ops.object.transform_apply(location=True, rotation=True, scale=True)

    corners = [obj.matrix_world @ Vector(c) for obj in mesh_objects for c in obj.bound_box]
    min_x = min(c.x for c in corners)
    max_x = max(c.x for c in corners)
    min_y = min(c.y for c in corners)
    max_y = max(c.y for c in corners)
    min_z = min(c.z for c in corners)
    offset = Vector((-(min_x + max_x) / 2.0, -(min_y + max_y) / 2.0, GROUND_CLEARANCE - min_z))
    for obj in mesh_objects:
        obj.location += offset
    bpy.ops.object.transform_apply(location=True, rotation=True, scale=True)

bpy.ops.export_scene.obj(filepath=output_path, use_selection=True)
"#;

/// Cleaning stage contract: raw mesh in, cleaned mesh path out.
pub trait MeshCleaner {
    /// Verify the stage can run at all. Checked once before batch work.
    fn ensure_available(&self) -> Result<()>;

    /// Clean `input`, blocking until the stage finishes; returns the path
    /// of the cleaned mesh in scratch space.
    fn clean(&self, input: &Path, apply_transform: bool) -> Result<PathBuf>;
}

/// Production cleaner driving a headless Blender subprocess.
pub struct BlenderCleaner {
    exe: PathBuf,
    scratch: ScratchDir,
}

impl BlenderCleaner {
    pub fn new(exe: impl Into<PathBuf>, scratch: ScratchDir) -> Self {
        Self {
            exe: exe.into(),
            scratch,
        }
    }

    /// Locate the Blender executable.
    ///
    /// Resolution order: explicit path, `MESHPREP_BLENDER`, then `PATH`.
    pub fn locate(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.is_file() {
                return Ok(path.to_path_buf());
            }
            return Err(ConvertError::MissingDependency(format!(
                "Blender not found at {}",
                path.display()
            )));
        }

        if let Ok(value) = std::env::var(BLENDER_ENV_VAR) {
            let path = PathBuf::from(value);
            if path.is_file() {
                return Ok(path);
            }
            return Err(ConvertError::MissingDependency(format!(
                "{} points to {}, which does not exist",
                BLENDER_ENV_VAR,
                path.display()
            )));
        }

        if let Ok(path) = which::which("blender") {
            return Ok(path);
        }

        Err(ConvertError::MissingDependency(
            "Blender executable not found.\n\
             Options:\n\
             - Install Blender and make sure `blender` is on PATH\n\
             - Set MESHPREP_BLENDER to the executable\n\
             - Pass an explicit path with --blender"
                .to_string(),
        ))
    }

    fn run_blender(
        &self,
        script: &Path,
        input: &Path,
        output: &Path,
        apply_transform: bool,
    ) -> Result<()> {
        tracing::debug!("running {:?} on {:?}", self.exe, input);
        let run = Command::new(&self.exe)
            .arg("--background")
            .arg("--python")
            .arg(script)
            .arg("--")
            .arg(input)
            .arg(output)
            .arg(if apply_transform { "1" } else { "0" })
            .output()?;

        if !run.status.success() {
            let stderr = String::from_utf8_lossy(&run.stderr);
            let stdout = String::from_utf8_lossy(&run.stdout);
            // Blender reports import/ops failures on stdout
            let detail = if stderr.trim().is_empty() {
                tail(&stdout, 5)
            } else {
                tail(&stderr, 5)
            };
            return Err(ConvertError::ExternalStage(format!(
                "Blender exited with {}: {}",
                run.status, detail
            )));
        }
        Ok(())
    }
}

impl MeshCleaner for BlenderCleaner {
    fn ensure_available(&self) -> Result<()> {
        if self.exe.is_file() {
            Ok(())
        } else {
            Err(ConvertError::MissingDependency(format!(
                "Blender not found at {}",
                self.exe.display()
            )))
        }
    }

    fn clean(&self, input: &Path, apply_transform: bool) -> Result<PathBuf> {
        self.ensure_available()?;
        self.scratch.ensure()?;

        let script_path = self.scratch.path().join("clean_mesh.py");
        fs::write(&script_path, CLEAN_SCRIPT)?;

        // Absolute path for the subprocess; its working directory is ours,
        // but Blender resolves some paths against the blend file
        let input = input.canonicalize().unwrap_or_else(|_| input.to_path_buf());
        let output = self.scratch.cleaned_mesh_path(&input);

        let run = self.run_blender(&script_path, &input, &output, apply_transform);
        // Sweep catches this too when the run errors out
        let _ = fs::remove_file(&script_path);
        run?;

        if !output.exists() {
            return Err(ConvertError::ExternalStage(
                "Blender exited cleanly but produced no cleaned mesh".to_string(),
            ));
        }
        Ok(output)
    }
}

/// Last `n` non-empty lines of subprocess output.
fn tail(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_explicit_missing_path() {
        let err = BlenderCleaner::locate(Some(Path::new("/nonexistent/blender"))).unwrap_err();
        assert!(matches!(err, ConvertError::MissingDependency(_)));
    }

    #[test]
    fn test_ensure_available_missing_exe() {
        let cleaner = BlenderCleaner::new(
            "/nonexistent/blender",
            ScratchDir::new("/tmp/meshprep-test-scratch"),
        );
        assert!(matches!(
            cleaner.ensure_available(),
            Err(ConvertError::MissingDependency(_))
        ));
    }

    #[test]
    fn test_tail_keeps_last_lines() {
        assert_eq!(tail("a\nb\n\nc\nd\ne\nf\ng\n", 5), "c\nd\ne\nf\ng");
        assert_eq!(tail("only\n", 5), "only");
        assert_eq!(tail("", 5), "");
    }
}
