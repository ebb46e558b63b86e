//! Site layout resolution.
//!
//! A [`SiteLayout`] ties together the repository root, the subproject being
//! published and the publish tree it lands in. All paths are derived from a
//! handful of fixed names (see [`crate::consts`]), each of which can be
//! overridden through a `SITEPUB_*` environment variable.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::consts::{
  BUILD_CMD_ENV, DEFAULT_BUILD_CMD, DEFAULT_PUBLISH_DIR, DEFAULT_SUBPROJECT, OUTPUT_DIR_NAME, PUBLISH_DIR_ENV,
  ROOT_ENV, SUBPROJECT_ENV,
};

#[derive(Debug, Error)]
pub enum LayoutError {
  #[error("invalid subproject name {0:?}: must be a single directory name")]
  InvalidSubproject(String),

  /// Publishing would replace or nest inside the subproject's own sources.
  #[error("target slot {slot} overlaps subproject directory {subproject}")]
  SlotOverlapsSubproject { slot: PathBuf, subproject: PathBuf },

  #[error("failed to determine current directory: {0}")]
  CurrentDir(#[source] std::io::Error),
}

/// An independently buildable unit whose output becomes one section of the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subproject {
  pub name: String,
  /// Working directory the build command runs in.
  pub dir: PathBuf,
  pub build_cmd: String,
}

impl Subproject {
  /// Directory the build is expected to produce.
  pub fn output_dir(&self) -> PathBuf {
    self.dir.join(OUTPUT_DIR_NAME)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteLayout {
  pub root: PathBuf,
  pub subproject: Subproject,
  pub publish_tree: PathBuf,
}

impl SiteLayout {
  /// Build a layout rooted at `root`.
  ///
  /// The subproject lives at `<root>/<name>` and is published to
  /// `<root>/<publish_dir>/<name>`.
  pub fn new(
    root: impl Into<PathBuf>,
    name: &str,
    publish_dir: impl AsRef<Path>,
    build_cmd: impl Into<String>,
  ) -> Result<Self, LayoutError> {
    validate_name(name)?;
    let root = normalize(&root.into());

    let layout = SiteLayout {
      subproject: Subproject {
        name: name.to_string(),
        dir: root.join(name),
        build_cmd: build_cmd.into(),
      },
      publish_tree: normalize(&root.join(publish_dir)),
      root,
    };
    layout.check_disjoint()?;
    Ok(layout)
  }

  /// The swap deletes whatever the target slot held, so the slot must not be
  /// the subproject directory, contain it, or sit inside its output.
  fn check_disjoint(&self) -> Result<(), LayoutError> {
    let slot = self.target_slot();
    let dir = &self.subproject.dir;
    if dir.starts_with(&slot) || slot.starts_with(self.output_dir()) {
      return Err(LayoutError::SlotOverlapsSubproject {
        slot,
        subproject: dir.clone(),
      });
    }
    Ok(())
  }

  /// Resolve the layout from the environment, falling back to the defaults.
  pub fn from_env() -> Result<Self, LayoutError> {
    let root = match env_override(ROOT_ENV) {
      Some(root) => PathBuf::from(root),
      None => std::env::current_dir().map_err(LayoutError::CurrentDir)?,
    };
    let root = dunce::canonicalize(&root).unwrap_or(root);

    let name = env_override(SUBPROJECT_ENV).unwrap_or_else(|| DEFAULT_SUBPROJECT.to_string());
    let publish_dir = env_override(PUBLISH_DIR_ENV).unwrap_or_else(|| DEFAULT_PUBLISH_DIR.to_string());
    let build_cmd = env_override(BUILD_CMD_ENV).unwrap_or_else(|| DEFAULT_BUILD_CMD.to_string());

    Self::new(root, &name, publish_dir, build_cmd)
  }

  pub fn output_dir(&self) -> PathBuf {
    self.subproject.output_dir()
  }

  /// The subdirectory of the publish tree that mirrors the subproject's output.
  pub fn target_slot(&self) -> PathBuf {
    self.publish_tree.join(&self.subproject.name)
  }
}

/// Resolve `.` and `..` lexically. Symlinks are not followed.
fn normalize(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match out.components().next_back() {
        Some(Component::Normal(_)) => {
          out.pop();
        }
        Some(Component::RootDir | Component::Prefix(_)) => {}
        _ => out.push(".."),
      },
      other => out.push(other.as_os_str()),
    }
  }
  out
}

/// Read an environment variable, treating empty values as unset.
fn env_override(key: &str) -> Option<String> {
  std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// The name doubles as a path component under both the root and the publish
/// tree, so it must not be able to point anywhere else.
fn validate_name(name: &str) -> Result<(), LayoutError> {
  let mut components = Path::new(name).components();
  match (components.next(), components.next()) {
    (Some(Component::Normal(part)), None) if part == OsStr::new(name) => Ok(()),
    _ => Err(LayoutError::InvalidSubproject(name.to_string())),
  }
}
