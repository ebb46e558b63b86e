//! Recursive copy of a build output into a staging directory.

use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::publish::types::PublishError;

/// Copy everything under `src` into the existing directory `dst`.
///
/// Regular files are copied with their permissions. On Unix, symlinks are
/// recreated with the same target; elsewhere they are copied as the file
/// they point to.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<(), PublishError> {
  debug!(from = %src.display(), to = %dst.display(), "staging output");

  for entry in WalkDir::new(src).sort_by_file_name() {
    let entry = entry.map_err(|e| {
      let from = e.path().unwrap_or(src).to_path_buf();
      PublishError::Stage {
        from,
        to: dst.to_path_buf(),
        source: e.into(),
      }
    })?;

    let rel = match entry.path().strip_prefix(src) {
      Ok(rel) if !rel.as_os_str().is_empty() => rel,
      _ => continue,
    };
    let target = dst.join(rel);
    let stage_err = |source| PublishError::Stage {
      from: entry.path().to_path_buf(),
      to: target.clone(),
      source,
    };

    let file_type = entry.file_type();
    if file_type.is_dir() {
      fs::create_dir(&target).map_err(stage_err)?;
    } else if file_type.is_symlink() {
      copy_symlink(entry.path(), &target).map_err(stage_err)?;
    } else {
      fs::copy(entry.path(), &target).map_err(stage_err)?;
    }
  }

  Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> std::io::Result<()> {
  let points_to = fs::read_link(link)?;
  std::os::unix::fs::symlink(points_to, target)
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> std::io::Result<()> {
  fs::copy(link, target).map(|_| ())
}
