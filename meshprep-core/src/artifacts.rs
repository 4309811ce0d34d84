//! Companion artifact generation
//!
//! Game code refers to mesh groups by name; these writers emit the stable
//! identifiers it compiles against. Both writers are idempotent: rerunning
//! overwrites the previous output.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

/// Derive a Java constant identifier from a group name.
fn constant_ident(name: &str) -> String {
    name.to_uppercase().replace('-', "_").replace('.', "_")
}

/// Write `<class_name>.java` defining one string constant per group.
///
/// Output is byte-deterministic for a given class name and group list. Two
/// groups that derive the same constant identifier (`a.b` and `a_b` both
/// yield `A_B`) are a hard error, never a silent overwrite.
pub fn write_java_class(
    class_name: &str,
    groups: &[String],
    output_dir: &Path,
) -> Result<PathBuf> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut source = format!("public class {} {{\n", class_name);
    for name in groups {
        let ident = constant_ident(name);
        if let Some(first) = seen.insert(ident.clone(), name) {
            return Err(ConvertError::ConstantCollision {
                first: first.to_string(),
                second: name.clone(),
                derived: ident,
            });
        }
        source.push_str(&format!(
            "    public static final String {} = \"{}\";\n",
            ident, name
        ));
    }
    source.push_str("}\n");

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{}.java", class_name));
    fs::write(&path, source)?;
    Ok(path)
}

/// Write `<base_name>.txt`, one group per line, in caller order.
pub fn write_group_listing(
    groups: &[String],
    output_dir: &Path,
    base_name: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{}.txt", base_name));

    let mut content = String::new();
    for group in groups {
        content.push_str(group);
        content.push('\n');
    }
    fs::write(&path, content)?;
    Ok(path)
}
