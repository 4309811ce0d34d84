//! meshprep conversion core
//!
//! Turns raw Blockbench OBJ exports into engine-ready assets: a headless
//! Blender stage cleans the geometry, group names are normalized and
//! deduplicated, and companion artifacts (a Java constants class, a plain
//! listing) give downstream code stable identifiers.

pub mod artifacts;
pub mod cleaner;
pub mod dedup;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod scratch;

pub use artifacts::{write_group_listing, write_java_class};
pub use cleaner::{BlenderCleaner, MeshCleaner, BLENDER_ENV_VAR};
pub use dedup::{deduplicate_groups, normalize_group_name, DedupReport, Rename};
pub use error::{ConvertError, Result};
pub use pipeline::{BatchSummary, ConversionRequest, ConversionResult, FileOutcome, Pipeline};
pub use progress::{Discard, ProgressSink};
pub use scratch::ScratchDir;
