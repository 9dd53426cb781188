//! Where generated artifacts land on disk.

use std::path::{Path, PathBuf};

use crate::naming;

pub const SCRIPT_EXT: &str = "hwl";
pub const META_FILE: &str = "!Class.hwl-meta";
pub const ENUM_DATA_FILE: &str = "!DataC.hwl";
pub const ENUM_CTOR_FILE: &str = "!()C.hwl";
pub const STRUCT_CTOR_FILE: &str = "!().hwl";
pub const STRUCT_COPY_FILE: &str = "!copy().hwl";
pub const STRUCT_ASSIGN_FILE: &str = "assign().hwl";
pub const STRUCT_DTOR_FILE: &str = "!!().hwl";
pub const GLUE_PREFIX: &str = "HwFg";
pub const MASTER_GLUE_FILE: &str = "HwFg.generated.inl";

/// Mirrors an inheritance chain into directory segments. Chains deeper than
/// `depth` keep `depth - 1` real directories and collapse the rest into one
/// dotted segment, so deep hierarchies stay browsable.
pub fn mirrored_dir_segments(mut names: Vec<String>, depth: usize) -> Vec<String> {
    if depth == 0 || names.len() <= depth {
        return names;
    }
    let tail = names.split_off(depth - 1);
    names.push(tail.join("."));
    names
}

pub fn join_segments(root: &Path, segments: &[String]) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in segments {
        path.push(segment);
    }
    path
}

/// Script stub file for a bound method or property accessor. Static scope
/// gets the `C` marker; `?` mangles to `-Q`.
pub fn member_file_name(script_name: &str, is_static: bool) -> String {
    let scope = if is_static { "C" } else { "" };
    format!(
        "{}(){}.{}",
        naming::file_symbol(script_name),
        scope,
        SCRIPT_EXT
    )
}

pub fn glue_header_name(script_class_name: &str) -> String {
    format!("{}{}.generated.hpp", GLUE_PREFIX, script_class_name)
}

pub fn glue_source_name(script_class_name: &str) -> String {
    format!("{}{}.generated.inl", GLUE_PREFIX, script_class_name)
}
