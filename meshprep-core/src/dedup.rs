//! OBJ group deduplication
//!
//! Blockbench exports declare one `o <name>` line per element, and duplicate
//! element names survive the export. Downstream code treats group names as
//! stable identifiers, so every name emitted into the final mesh must be
//! unique within the file.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::Result;

/// Prefix of an OBJ object declaration line.
const GROUP_PREFIX: &str = "o ";

/// One group rename performed during deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// Outcome of one deduplication pass.
#[derive(Debug, Clone)]
pub struct DedupReport {
    /// Every emitted group name, sorted lexicographically.
    ///
    /// The file itself keeps first-seen order; the sorted order here is a
    /// contract so artifact generation stays deterministic.
    pub groups: Vec<String>,
    /// Every declaration whose emitted name differs from its raw name.
    pub renames: Vec<Rename>,
}

/// Canonicalize a raw group name into identifier form.
///
/// Blender disambiguates duplicate object names with a `.NNN` suffix; the
/// target identifier scheme uses `_NNN`. Every `.` immediately followed by
/// decimal digits is rewritten, keeping the digits (`bone.001` becomes
/// `bone_001`), so Blender's suffixing and our own numeric suffixing can
/// never collide. Idempotent.
pub fn normalize_group_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '.' && matches!(chars.peek(), Some(d) if d.is_ascii_digit()) {
            out.push('_');
        } else {
            out.push(c);
        }
    }
    out
}

/// Rewrite duplicate group declarations in `path`, in place.
///
/// Only `o ` lines change; every other line passes through unmodified
/// (line endings are normalized by text I/O). The first occurrence of a
/// normalized name keeps it; the second gets `_1`, the third `_2`, and so
/// on. A failure mid-write leaves the file in an undefined state, which
/// callers treat as fatal for that file.
pub fn deduplicate_groups(path: &Path) -> Result<DedupReport> {
    let reader = BufReader::new(File::open(path)?);

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut emitted: Vec<String> = Vec::new();
    let mut renames: Vec<Rename> = Vec::new();
    let mut lines: Vec<String> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if let Some(rest) = line.strip_prefix(GROUP_PREFIX) {
            let raw = rest.trim();
            let normalized = normalize_group_name(raw);
            let count = counts.entry(normalized.clone()).or_insert(0);
            let name = if *count == 0 {
                normalized
            } else {
                format!("{}_{}", normalized, count)
            };
            *count += 1;

            if name != raw {
                renames.push(Rename {
                    from: raw.to_string(),
                    to: name.clone(),
                });
            }
            lines.push(format!("{}{}", GROUP_PREFIX, name));
            emitted.push(name);
        } else {
            lines.push(line);
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    for line in &lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;

    tracing::debug!(
        "deduplicated {:?}: {} group(s), {} renamed",
        path,
        emitted.len(),
        renames.len()
    );

    emitted.sort();
    Ok(DedupReport {
        groups: emitted,
        renames,
    })
}
