//! Conversion error taxonomy

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the conversion pipeline.
///
/// `MissingDependency` is fatal to a whole run and checked eagerly before
/// any batch work begins; every other variant is fatal only to the file
/// being processed, and batches continue past it.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Required external tool is not installed where expected.
    #[error("missing external tool: {0}")]
    MissingDependency(String),

    /// Requested input file does not exist.
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The cleaning process exited non-zero, found no mesh objects, or
    /// produced no output file.
    #[error("mesh cleaning failed: {0}")]
    ExternalStage(String),

    /// Two group names derive the same Java constant identifier.
    #[error("groups `{first}` and `{second}` both derive constant `{derived}`")]
    ConstantCollision {
        first: String,
        second: String,
        derived: String,
    },

    /// Read/write failure during deduplication or artifact writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
