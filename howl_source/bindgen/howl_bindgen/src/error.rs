use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenError>;

/// Fatal generator failures. Exportability rejections are not errors; a
/// member that fails a gate is silently skipped by the walker.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot is not valid JSON: {0}")]
    SnapshotJson(#[from] serde_json::Error),

    #[error("config is not valid TOML: {0}")]
    ConfigToml(#[from] toml::de::Error),

    #[error("config is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("config field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("snapshot references unknown type `{name}` from {referrer}")]
    DanglingRef { name: String, referrer: String },

    #[error("no marshalling rule for `{entity}`: type classified as {tag} was accepted but cannot be generated")]
    MarshallingHole { entity: String, tag: &'static str },

    #[error("failed writing `{path}`: {source}")]
    StageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed committing `{path}`: {source}")]
    Commit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenError {
    /// A type that passed classification but has no marshalling rule.
    pub fn marshalling_hole(entity: impl Into<String>, tag: &'static str) -> Self {
        GenError::MarshallingHole {
            entity: entity.into(),
            tag,
        }
    }
}
