//! Content digests for published trees.
//!
//! A [`TreeSummary`] captures what a directory holds: how many regular files,
//! how many bytes, and a SHA-256 digest over relative paths, file contents and
//! symlink targets. Two trees with the same digest are byte-for-byte identical
//! as far as a static file server can tell; timestamps and permissions are not
//! part of it.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

/// A full 64-character SHA-256 hash, lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ContentHash(pub String);

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, thiserror::Error)]
pub enum DirHashError {
  #[error("failed to walk directory: {0}")]
  WalkDir(#[from] walkdir::Error),

  #[error("failed to read file {path}: {source}")]
  ReadFile {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to read symlink {path}: {source}")]
  ReadSymlink {
    path: String,
    #[source]
    source: std::io::Error,
  },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeSummary {
  pub files: u64,
  pub bytes: u64,
  pub digest: ContentHash,
}

/// Walk `path` and summarize its contents.
///
/// Symlinks are recorded by target and never followed. Special files
/// (sockets, devices) are skipped.
pub fn summarize_tree(path: &Path) -> Result<TreeSummary, DirHashError> {
  let mut entries: Vec<(String, String)> = Vec::new();
  let mut files = 0u64;
  let mut bytes = 0u64;

  for entry in WalkDir::new(path).sort_by_file_name() {
    let entry = entry?;
    let entry_path = entry.path();

    let rel_path = entry_path
      .strip_prefix(path)
      .unwrap_or(entry_path)
      .to_string_lossy()
      .replace('\\', "/");

    if rel_path.is_empty() {
      continue;
    }

    let file_type = entry.file_type();
    let line = if file_type.is_file() {
      let (hash, len) = hash_file(entry_path)?;
      files += 1;
      bytes += len;
      format!("F:{}:{}", rel_path, hash)
    } else if file_type.is_dir() {
      format!("D:{}", rel_path)
    } else if file_type.is_symlink() {
      let target = fs::read_link(entry_path).map_err(|source| DirHashError::ReadSymlink {
        path: entry_path.display().to_string(),
        source,
      })?;
      format!("L:{}:{}", rel_path, target.to_string_lossy())
    } else {
      continue;
    };

    entries.push((rel_path, line));
  }

  entries.sort_by(|a, b| a.0.cmp(&b.0));

  let mut hasher = Sha256::new();
  for (_, line) in entries {
    hasher.update(line.as_bytes());
    hasher.update(b"\n");
  }

  Ok(TreeSummary {
    files,
    bytes,
    digest: ContentHash(format!("{:x}", hasher.finalize())),
  })
}

/// Hash a file's contents, returning the digest and the number of bytes read.
pub fn hash_file(path: &Path) -> Result<(ContentHash, u64), DirHashError> {
  let read_err = |source| DirHashError::ReadFile {
    path: path.display().to_string(),
    source,
  };

  let mut file = fs::File::open(path).map_err(read_err)?;
  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];
  let mut total = 0u64;

  loop {
    let bytes_read = file.read(&mut buffer).map_err(read_err)?;
    if bytes_read == 0 {
      break;
    }
    total += bytes_read as u64;
    hasher.update(&buffer[..bytes_read]);
  }

  Ok((ContentHash(format!("{:x}", hasher.finalize())), total))
}
