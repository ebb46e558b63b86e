//! Replacing a target slot without exposing a partial tree.
//!
//! The new content is staged in a hidden sibling of the slot and then moved
//! into place by rename, so the slot path only ever refers to a complete
//! tree. On Linux the two directories are exchanged in a single
//! `renameat2(RENAME_EXCHANGE)`; elsewhere the old slot is parked under a
//! second hidden name first, which leaves a brief window where the slot is
//! absent but never half-written.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::consts::{OLD_INFIX, STAGE_INFIX};
use crate::publish::stage::copy_tree;
use crate::publish::types::PublishError;
use crate::util::hash::{TreeSummary, summarize_tree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
  /// Whether a previous slot existed and was replaced.
  pub replaced: bool,
  /// Summary of the staged tree, taken before it went live.
  pub summary: TreeSummary,
}

/// Replace `<publish_tree>/<slot_name>` with a copy of `source`.
///
/// The publish tree must already exist. If staging fails the slot is left
/// exactly as it was.
pub fn replace_slot(source: &Path, publish_tree: &Path, slot_name: &str) -> Result<SwapOutcome, PublishError> {
  if !publish_tree.is_dir() {
    return Err(PublishError::PublishTreeMissing {
      path: publish_tree.to_path_buf(),
    });
  }

  sweep_stale(publish_tree, slot_name)?;

  let stage = tempfile::Builder::new()
    .prefix(&sibling_prefix(slot_name, STAGE_INFIX))
    .tempdir_in(publish_tree)
    .map_err(|source_err| PublishError::Stage {
      from: source.to_path_buf(),
      to: publish_tree.to_path_buf(),
      source: source_err,
    })?;

  // Dropping `stage` on any error below removes the partial copy.
  copy_tree(source, stage.path())?;
  let summary = summarize_tree(stage.path())?;

  let slot = publish_tree.join(slot_name);
  let slot_exists = slot.symlink_metadata().is_ok();

  if !slot_exists {
    rename(stage.path(), &slot)?;
    let _ = stage.keep();
    info!(slot = %slot.display(), "slot created");
    return Ok(SwapOutcome {
      replaced: false,
      summary,
    });
  }

  if try_exchange(stage.path(), &slot).map_err(|e| swap_err(stage.path(), &slot, e))? {
    // The staging path now holds the previous slot.
    let displaced = stage.keep();
    remove_path(&displaced)?;
    info!(slot = %slot.display(), "slot replaced");
    return Ok(SwapOutcome { replaced: true, summary });
  }

  let parked = publish_tree.join(format!("{}{}", sibling_prefix(slot_name, OLD_INFIX), std::process::id()));
  park_and_replace(stage.path(), &slot, &parked)?;
  let _ = stage.keep();

  remove_path(&parked)?;
  info!(slot = %slot.display(), "slot replaced");
  Ok(SwapOutcome { replaced: true, summary })
}

/// Two-step replacement: move `slot` aside to `parked`, then move `stage`
/// into its place. If the second rename fails the parked slot is put back.
fn park_and_replace(stage: &Path, slot: &Path, parked: &Path) -> Result<(), PublishError> {
  rename(slot, parked)?;

  if let Err(err) = rename(stage, slot) {
    if let Err(restore) = fs::rename(parked, slot) {
      warn!(parked = %parked.display(), error = %restore, "failed to restore previous slot");
    }
    return Err(err);
  }
  Ok(())
}

/// Hidden sibling name prefix, e.g. `.shabdakosh.stage-`.
fn sibling_prefix(slot_name: &str, infix: &str) -> String {
  format!(".{}.{}-", slot_name, infix)
}

/// Remove staging and parking directories left behind by an interrupted run.
fn sweep_stale(publish_tree: &Path, slot_name: &str) -> Result<(), PublishError> {
  let entries = fs::read_dir(publish_tree).map_err(|source| PublishError::Stage {
    from: publish_tree.to_path_buf(),
    to: publish_tree.to_path_buf(),
    source,
  })?;

  for entry in entries.flatten() {
    let name = entry.file_name();
    let name = name.to_string_lossy();
    if [STAGE_INFIX, OLD_INFIX].iter().any(|infix| is_leftover(&name, slot_name, infix)) {
      let path = entry.path();
      warn!(path = %path.display(), "removing leftover from an interrupted publish");
      remove_path(&path)?;
    }
  }

  Ok(())
}

/// Whether `file_name` is a stage or parking directory of `slot_name`.
///
/// The random or pid suffix never contains a `.`, which keeps the sweep for
/// `dict` away from leftovers of a slot named e.g. `dict.old-x`.
fn is_leftover(file_name: &str, slot_name: &str, infix: &str) -> bool {
  file_name
    .strip_prefix(&sibling_prefix(slot_name, infix))
    .is_some_and(|suffix| !suffix.is_empty() && !suffix.contains('.'))
}

fn remove_path(path: &Path) -> Result<(), PublishError> {
  let is_dir = path.symlink_metadata().map(|m| m.is_dir()).unwrap_or(false);
  if is_dir {
    fs::remove_dir_all(path)
  } else {
    fs::remove_file(path)
  }
  .map_err(|source| PublishError::Remove {
    path: path.to_path_buf(),
    source,
  })
}

fn rename(from: &Path, to: &Path) -> Result<(), PublishError> {
  debug!(from = %from.display(), to = %to.display(), "rename");
  fs::rename(from, to).map_err(|e| swap_err(from, to, e))
}

fn swap_err(from: &Path, to: &Path, source: io::Error) -> PublishError {
  PublishError::Swap {
    from: PathBuf::from(from),
    to: PathBuf::from(to),
    source,
  }
}

/// Atomically exchange two paths. Returns `Ok(false)` when the filesystem
/// does not support it.
#[cfg(target_os = "linux")]
fn try_exchange(a: &Path, b: &Path) -> io::Result<bool> {
  use rustix::fs::{CWD, RenameFlags, renameat_with};
  use rustix::io::Errno;

  match renameat_with(CWD, a, CWD, b, RenameFlags::EXCHANGE) {
    Ok(()) => Ok(true),
    Err(e) if e == Errno::INVAL || e == Errno::NOSYS => {
      debug!(errno = %e, "rename exchange unsupported, falling back");
      Ok(false)
    }
    Err(e) => Err(e.into()),
  }
}

#[cfg(not(target_os = "linux"))]
fn try_exchange(_a: &Path, _b: &Path) -> io::Result<bool> {
  Ok(false)
}
