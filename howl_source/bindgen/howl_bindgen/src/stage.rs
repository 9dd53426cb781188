//! Change-detected output staging.
//! Nothing touches a real output path until `commit`; a run that dies partway
//! leaves only `.tmp` siblings behind.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use sha2::{Digest, Sha256};

use crate::error::{GenError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// On-disk content already matches; nothing recorded.
    Unchanged,
    /// Content differs (or the file is missing); queued for commit.
    Staged,
}

struct PendingWrite {
    target: PathBuf,
    /// Absent in dry-run mode.
    temp: Option<PathBuf>,
}

pub struct OutputStage {
    pending: Vec<PendingWrite>,
    known: FxHashSet<PathBuf>,
    unchanged: usize,
    dry_run: bool,
}

impl OutputStage {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            known: FxHashSet::default(),
            unchanged: 0,
            dry_run: false,
        }
    }

    /// A stage that records what would change without writing anything.
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::new()
        }
    }

    /// Compares `content` against the file at `target`. Identical content is
    /// a no-op; anything else is written to a sibling temp file and queued.
    pub fn stage(&mut self, target: &Path, content: &str) -> Result<StageOutcome> {
        let inserted = self.known.insert(target.to_path_buf());
        debug_assert!(inserted, "path staged twice: {}", target.display());

        if let Ok(existing) = fs::read(target) {
            if existing == content.as_bytes() {
                self.unchanged += 1;
                return Ok(StageOutcome::Unchanged);
            }
        }

        if self.dry_run {
            self.pending.push(PendingWrite {
                target: target.to_path_buf(),
                temp: None,
            });
            return Ok(StageOutcome::Staged);
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| GenError::StageWrite {
                path: target.to_path_buf(),
                source,
            })?;
        }
        let temp = temp_path(target);
        fs::write(&temp, content).map_err(|source| GenError::StageWrite {
            path: temp.clone(),
            source,
        })?;
        self.pending.push(PendingWrite {
            target: target.to_path_buf(),
            temp: Some(temp),
        });
        Ok(StageOutcome::Staged)
    }

    /// Paths seen this run, staged or unchanged. Orphan cleanup treats any
    /// generated file outside this set as stale.
    pub fn is_known(&self, path: &Path) -> bool {
        self.known.contains(path)
    }

    pub fn staged_count(&self) -> usize {
        self.pending.len()
    }

    pub fn unchanged_count(&self) -> usize {
        self.unchanged
    }

    /// Moves every queued temp file over its real target. Consumes the stage;
    /// commit happens exactly once per run.
    pub fn commit(self) -> Result<usize> {
        let mut committed = 0;
        for write in self.pending {
            let temp = match write.temp {
                Some(temp) => temp,
                None => continue,
            };
            if write.target.exists() {
                fs::remove_file(&write.target).map_err(|source| GenError::Commit {
                    path: write.target.clone(),
                    source,
                })?;
            }
            fs::rename(&temp, &write.target).map_err(|source| GenError::Commit {
                path: write.target.clone(),
                source,
            })?;
            committed += 1;
        }
        Ok(committed)
    }
}

impl Default for OutputStage {
    fn default() -> Self {
        Self::new()
    }
}

fn temp_path(target: &Path) -> PathBuf {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    target.with_file_name(format!("{file_name}.tmp"))
}

/// SHA-256 hex digest, used for the snapshot fast-path guard file.
pub fn content_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
