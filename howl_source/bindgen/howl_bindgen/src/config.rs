//! Generator configuration, read from `howl_bindgen.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use toml::Value;

use crate::error::{GenError, Result};

pub const DEFAULT_SCRIPTS_DEPTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindgenConfig {
    /// Root directory for generated Howl script stubs.
    pub scripts_dir: PathBuf,
    /// Directory for generated native glue (`HwFg*.generated.*`).
    pub glue_dir: PathBuf,
    /// Optional prefix prepended to engine header includes in generated glue.
    pub include_root: String,
    /// Reflected class names that are never exported.
    pub skip_classes: Vec<String>,
    /// Classes whose defining header contains one of these fragments are
    /// never exported (third-party plugin headers and the like).
    pub skip_header_fragments: Vec<String>,
    /// Maximum directory depth mirrored from the superclass chain; deeper
    /// ancestors collapse into one dotted segment.
    pub scripts_depth: usize,
}

impl BindgenConfig {
    pub fn new(scripts_dir: impl Into<PathBuf>, glue_dir: impl Into<PathBuf>) -> Self {
        Self {
            scripts_dir: scripts_dir.into(),
            glue_dir: glue_dir.into(),
            include_root: String::new(),
            skip_classes: Vec::new(),
            skip_header_fragments: Vec::new(),
            scripts_depth: DEFAULT_SCRIPTS_DEPTH,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let value: Value = contents.parse::<Value>()?;

        let output_table = value
            .get("output")
            .and_then(Value::as_table)
            .ok_or(GenError::MissingField("output"))?;

        let scripts_dir = output_table
            .get("scripts_dir")
            .and_then(Value::as_str)
            .ok_or(GenError::MissingField("output.scripts_dir"))?;
        let glue_dir = output_table
            .get("glue_dir")
            .and_then(Value::as_str)
            .ok_or(GenError::MissingField("output.glue_dir"))?;
        let include_root = output_table
            .get("include_root")
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim_matches('/')
            .to_string();

        let mut config = Self::new(scripts_dir, glue_dir);
        config.include_root = include_root;

        if let Some(export_table) = value.get("export").and_then(Value::as_table) {
            if let Some(raw) = export_table.get("skip_classes") {
                config.skip_classes = string_array("export.skip_classes", raw)?;
            }
            if let Some(raw) = export_table.get("skip_header_fragments") {
                config.skip_header_fragments = string_array("export.skip_header_fragments", raw)?;
            }
            if let Some(raw) = export_table.get("scripts_depth") {
                let depth = raw.as_integer().ok_or(GenError::InvalidField {
                    field: "export.scripts_depth",
                    reason: "must be an integer".to_string(),
                })?;
                if depth < 1 {
                    return Err(GenError::InvalidField {
                        field: "export.scripts_depth",
                        reason: "must be at least 1".to_string(),
                    });
                }
                config.scripts_depth = depth as usize;
            }
        }

        Ok(config)
    }

    pub fn is_skipped_class(&self, name: &str) -> bool {
        self.skip_classes.iter().any(|skip| skip == name)
    }

    pub fn is_skipped_header(&self, header: &str) -> bool {
        self.skip_header_fragments
            .iter()
            .any(|fragment| header.contains(fragment.as_str()))
    }
}

fn string_array(field: &'static str, raw: &Value) -> Result<Vec<String>> {
    let array = raw.as_array().ok_or(GenError::InvalidField {
        field,
        reason: "must be an array of strings".to_string(),
    })?;
    array
        .iter()
        .map(|entry| {
            entry
                .as_str()
                .map(str::to_string)
                .ok_or(GenError::InvalidField {
                    field,
                    reason: "must be an array of strings".to_string(),
                })
        })
        .collect()
}
