//! Error and report types for the publish pipeline.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::util::hash::{DirHashError, TreeSummary};

/// Coarse classification of a [`PublishError`], for operators and exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
  /// The subproject's own build is broken.
  Build,
  /// The build claimed success but did not produce its output directory.
  ContractViolation,
  /// Removing, staging or moving files failed.
  Filesystem,
}

impl std::fmt::Display for FailureKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      FailureKind::Build => write!(f, "build failure"),
      FailureKind::ContractViolation => write!(f, "contract violation"),
      FailureKind::Filesystem => write!(f, "filesystem failure"),
    }
  }
}

#[derive(Debug, Error)]
pub enum PublishError {
  /// Build command exited unsuccessfully.
  #[error("build command failed with exit code {code:?}: {cmd}")]
  BuildFailed { cmd: String, code: Option<i32> },

  /// Build command could not be started (missing shell or subproject directory).
  #[error("failed to run build command `{cmd}`: {source}")]
  BuildSpawn {
    cmd: String,
    #[source]
    source: io::Error,
  },

  /// Build exited successfully without producing its output directory.
  #[error("build reported success but output directory {path} is missing")]
  OutputMissing { path: PathBuf },

  #[error("publish tree {path} does not exist")]
  PublishTreeMissing { path: PathBuf },

  #[error("failed to stage {from} into {to}: {source}")]
  Stage {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to move {from} to {to}: {source}")]
  Swap {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to remove {path}: {source}")]
  Remove {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to read staged tree: {0}")]
  Digest(#[from] DirHashError),
}

impl PublishError {
  pub fn kind(&self) -> FailureKind {
    match self {
      PublishError::BuildFailed { .. } | PublishError::BuildSpawn { .. } => FailureKind::Build,
      PublishError::OutputMissing { .. } => FailureKind::ContractViolation,
      PublishError::PublishTreeMissing { .. }
      | PublishError::Stage { .. }
      | PublishError::Swap { .. }
      | PublishError::Remove { .. }
      | PublishError::Digest(_) => FailureKind::Filesystem,
    }
  }
}

/// Result of a successful publish.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
  pub subproject: String,
  pub output_dir: PathBuf,
  pub target_slot: PathBuf,
  /// Whether a previous slot existed and was replaced.
  pub replaced: bool,
  #[serde(flatten)]
  pub summary: TreeSummary,
}
