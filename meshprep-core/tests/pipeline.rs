//! Pipeline integration tests
//!
//! Drives the full pipeline with a scripted cleaner standing in for Blender:
//! generate an OBJ, convert, verify every output artifact.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use meshprep_core::{
    ConversionRequest, ConvertError, MeshCleaner, Pipeline, ProgressSink, Result, ScratchDir,
};
use tempfile::tempdir;

/// Copies the input into scratch the way the Blender stage would.
///
/// Inputs whose file stem is `broken` get a success report with no output
/// file, mimicking a cleaning run that exits zero without exporting.
struct CopyCleaner {
    scratch: ScratchDir,
}

impl MeshCleaner for CopyCleaner {
    fn ensure_available(&self) -> Result<()> {
        Ok(())
    }

    fn clean(&self, input: &Path, _apply_transform: bool) -> Result<PathBuf> {
        self.scratch.ensure()?;
        let out = self.scratch.cleaned_mesh_path(input);
        if input.file_stem().and_then(|s| s.to_str()) != Some("broken") {
            fs::copy(input, &out)?;
        }
        Ok(out)
    }
}

/// Cleaner whose tool is not installed.
struct MissingBlender;

impl MeshCleaner for MissingBlender {
    fn ensure_available(&self) -> Result<()> {
        Err(ConvertError::MissingDependency(
            "blender not installed".to_string(),
        ))
    }

    fn clean(&self, _input: &Path, _apply_transform: bool) -> Result<PathBuf> {
        panic!("clean must not run when the dependency check fails");
    }
}

/// Sink collecting every message for assertions.
struct Capture(Mutex<Vec<String>>);

impl Capture {
    fn new() -> Self {
        Self(Mutex::new(Vec::new()))
    }

    fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl ProgressSink for Capture {
    fn log(&self, message: &str) {
        self.0.lock().unwrap().push(message.to_string());
    }
}

const SAMPLE_OBJ: &str = "\
# Blockbench export
o arm
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o leg
v 0 0 1
v 1 0 1
v 0 1 1
f 4 5 6
o head
v 0 0 2
v 1 0 2
v 0 1 2
f 7 8 9
";

fn pipeline_in(dir: &Path) -> Pipeline<CopyCleaner> {
    let scratch = ScratchDir::new(dir.join("scratch"));
    Pipeline::new(
        CopyCleaner {
            scratch: scratch.clone(),
        },
        scratch,
    )
}

fn request(input: &Path, output_dir: &Path) -> ConversionRequest {
    ConversionRequest {
        input: input.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        output_name: "robot".to_string(),
        java_class: Some("RobotGroups".to_string()),
        write_listing: true,
        apply_transform: false,
    }
}

#[test]
fn test_end_to_end_three_groups() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("robot.obj");
    fs::write(&input, SAMPLE_OBJ).unwrap();
    let out = dir.path().join("out");

    let pipeline = pipeline_in(dir.path());
    let result = pipeline
        .process(&request(&input, &out), &meshprep_core::Discard)
        .expect("conversion failed");

    assert_eq!(result.groups, ["arm", "head", "leg"]);
    assert!(result.mesh_path.exists());
    assert!(result.java_path.as_ref().unwrap().exists());
    assert!(result.listing_path.as_ref().unwrap().exists());

    let listing = fs::read_to_string(result.listing_path.unwrap()).unwrap();
    assert_eq!(listing.lines().count(), 3);

    let java = fs::read_to_string(result.java_path.unwrap()).unwrap();
    assert!(java.contains("public class RobotGroups {"));
    assert!(java.contains("public static final String ARM = \"arm\";"));
}

#[test]
fn test_raw_input_never_mutated() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("robot.obj");
    fs::write(&input, SAMPLE_OBJ).unwrap();

    let pipeline = pipeline_in(dir.path());
    pipeline
        .process(&request(&input, &dir.path().join("out")), &meshprep_core::Discard)
        .unwrap();

    assert_eq!(fs::read_to_string(&input).unwrap(), SAMPLE_OBJ);
}

#[test]
fn test_duplicate_groups_renamed_in_final_mesh() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("robot.obj");
    fs::write(&input, "o arm\nv 0 0 0\no arm\no bone.001\n").unwrap();

    let pipeline = pipeline_in(dir.path());
    let result = pipeline
        .process(&request(&input, &dir.path().join("out")), &meshprep_core::Discard)
        .unwrap();

    assert_eq!(result.groups, ["arm", "arm_1", "bone_001"]);
    let mesh = fs::read_to_string(&result.mesh_path).unwrap();
    let names: Vec<&str> = mesh.lines().filter_map(|l| l.strip_prefix("o ")).collect();
    assert_eq!(names, ["arm", "arm_1", "bone_001"]);
}

#[test]
fn test_missing_input_fails() {
    let dir = tempdir().unwrap();
    let pipeline = pipeline_in(dir.path());

    let err = pipeline
        .process(
            &request(&dir.path().join("absent.obj"), &dir.path().join("out")),
            &meshprep_core::Discard,
        )
        .unwrap_err();
    assert!(matches!(err, ConvertError::InputNotFound(_)));
}

#[test]
fn test_cleaner_without_output_is_external_stage_failure() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.obj");
    fs::write(&input, SAMPLE_OBJ).unwrap();

    let pipeline = pipeline_in(dir.path());
    let err = pipeline
        .process(&request(&input, &dir.path().join("out")), &meshprep_core::Discard)
        .unwrap_err();
    assert!(matches!(err, ConvertError::ExternalStage(_)));
}

#[test]
fn test_scratch_swept_after_success_and_failure() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("robot.obj");
    let bad = dir.path().join("broken.obj");
    fs::write(&good, SAMPLE_OBJ).unwrap();
    fs::write(&bad, SAMPLE_OBJ).unwrap();
    let scratch_root = dir.path().join("scratch");

    let pipeline = pipeline_in(dir.path());
    pipeline
        .process(&request(&good, &dir.path().join("out")), &meshprep_core::Discard)
        .unwrap();
    assert_eq!(fs::read_dir(&scratch_root).unwrap().count(), 0);

    pipeline
        .process(&request(&bad, &dir.path().join("out")), &meshprep_core::Discard)
        .unwrap_err();
    assert_eq!(fs::read_dir(&scratch_root).unwrap().count(), 0);
}

#[test]
fn test_batch_continues_after_failure() {
    let dir = tempdir().unwrap();
    let bad = dir.path().join("broken.obj");
    let good = dir.path().join("robot.obj");
    fs::write(&bad, SAMPLE_OBJ).unwrap();
    fs::write(&good, SAMPLE_OBJ).unwrap();

    let requests = vec![
        request(&bad, &dir.path().join("out").join("broken")),
        request(&good, &dir.path().join("out").join("robot")),
    ];

    let pipeline = pipeline_in(dir.path());
    let summary = pipeline
        .process_batch(&requests, &meshprep_core::Discard)
        .expect("batch itself must not fail");

    assert!(summary.had_errors());
    assert_eq!(summary.outcomes.len(), 2);
    assert_eq!(summary.outcomes[0].input, bad);
    assert!(summary.outcomes[0].result.is_err());
    assert!(summary.outcomes[1].result.is_ok());
    assert!(dir
        .path()
        .join("out")
        .join("robot")
        .join("robot.obj")
        .exists());
}

#[test]
fn test_missing_dependency_halts_before_any_file_work() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("robot.obj");
    fs::write(&input, SAMPLE_OBJ).unwrap();
    let scratch_root = dir.path().join("scratch");

    let pipeline = Pipeline::new(MissingBlender, ScratchDir::new(&scratch_root));
    let err = pipeline
        .process_batch(
            &[request(&input, &dir.path().join("out"))],
            &meshprep_core::Discard,
        )
        .unwrap_err();

    assert!(matches!(err, ConvertError::MissingDependency(_)));
    assert!(!scratch_root.exists(), "no scratch files may be created");
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_progress_milestones_reach_sink() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("robot.obj");
    fs::write(&input, SAMPLE_OBJ).unwrap();

    let capture = Capture::new();
    let pipeline = pipeline_in(dir.path());
    pipeline
        .process(&request(&input, &dir.path().join("out")), &capture)
        .unwrap();

    let messages = capture.messages();
    assert!(messages.iter().any(|m| m.contains("Cleaning mesh")));
    assert!(messages.iter().any(|m| m.contains("Deduplicating")));
    assert!(messages.iter().any(|m| m.contains("Found 3 group(s)")));
    assert!(messages.iter().any(|m| m.contains("Final OBJ saved to")));
}
