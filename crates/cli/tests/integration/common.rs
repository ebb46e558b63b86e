//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

pub const SUBPROJECT: &str = "dict";

/// Isolated repository layout.
///
/// Each test gets its own root holding a `dict` subproject and a `site`
/// publish tree; the `sitepub` binary is pointed at it through `SITEPUB_*`
/// variables.
pub struct TestEnv {
  pub temp: TempDir,
  pub build_cmd: String,
}

impl TestEnv {
  /// Root with an empty subproject directory and no publish tree.
  pub fn new(build_cmd: &str) -> Self {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join(SUBPROJECT)).unwrap();
    Self {
      temp,
      build_cmd: build_cmd.to_string(),
    }
  }

  /// Like [`TestEnv::new`], with the publish tree already created.
  pub fn with_publish_tree(build_cmd: &str) -> Self {
    let env = Self::new(build_cmd);
    std::fs::create_dir_all(env.publish_tree()).unwrap();
    env
  }

  pub fn root(&self) -> PathBuf {
    let p = self.temp.path().to_path_buf();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  pub fn publish_tree(&self) -> PathBuf {
    self.root().join("site")
  }

  pub fn slot(&self) -> PathBuf {
    self.publish_tree().join(SUBPROJECT)
  }

  pub fn output_dir(&self) -> PathBuf {
    self.root().join(SUBPROJECT).join("output")
  }

  /// Write a file relative to the root, creating parent directories.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.root().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Environment variables that isolate a `sitepub` run to this root.
  pub fn vars(&self) -> Vec<(&'static str, String)> {
    vec![
      ("SITEPUB_ROOT", self.root().display().to_string()),
      ("SITEPUB_SUBPROJECT", SUBPROJECT.to_string()),
      ("SITEPUB_PUBLISH_DIR", "site".to_string()),
      ("SITEPUB_BUILD_CMD", self.build_cmd.clone()),
    ]
  }

  /// Pre-configured Command for the sitepub binary.
  pub fn sitepub_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("sitepub");
    cmd.envs(self.vars());
    cmd
  }
}

/// Every file under `root` with its contents, sorted by relative path.
pub fn snapshot_tree(root: &Path) -> Vec<(String, Vec<u8>)> {
  fn walk(base: &Path, dir: &Path, out: &mut Vec<(String, Vec<u8>)>) {
    for entry in std::fs::read_dir(dir).unwrap() {
      let path = entry.unwrap().path();
      let rel = path.strip_prefix(base).unwrap().to_string_lossy().replace('\\', "/");
      if path.is_dir() {
        out.push((format!("{rel}/"), Vec::new()));
        walk(base, &path, out);
      } else {
        out.push((rel, std::fs::read(&path).unwrap()));
      }
    }
  }

  let mut out = Vec::new();
  if root.exists() {
    walk(root, root, &mut out);
  }
  out.sort();
  out
}
