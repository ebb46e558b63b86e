//! Running a subproject's build command.

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::layout::Subproject;
use crate::publish::types::PublishError;

/// Run the subproject's build to completion.
///
/// The command runs through the platform shell with the subproject directory
/// as working directory and the caller's environment. Both of its output
/// streams are forwarded to our stderr so that stdout stays free for reports.
pub async fn run_build(subproject: &Subproject) -> Result<(), PublishError> {
  info!(subproject = %subproject.name, cmd = %subproject.build_cmd, "building subproject");

  let (shell, shell_args) = shell_invocation();
  debug!(shell, working_dir = ?subproject.dir, "spawning build");

  let status = Command::new(shell)
    .args(shell_args)
    .arg(&subproject.build_cmd)
    .current_dir(&subproject.dir)
    .stdin(Stdio::null())
    .stdout(std::io::stderr())
    .stderr(std::io::stderr())
    .status()
    .await
    .map_err(|source| PublishError::BuildSpawn {
      cmd: subproject.build_cmd.clone(),
      source,
    })?;

  if !status.success() {
    return Err(PublishError::BuildFailed {
      cmd: subproject.build_cmd.clone(),
      code: status.code(),
    });
  }

  debug!(subproject = %subproject.name, "build finished");
  Ok(())
}

/// Shell and the arguments that precede the command string.
///
/// Always the system shell rather than `$SHELL`, so user profiles are not sourced.
fn shell_invocation() -> (&'static str, &'static [&'static str]) {
  #[cfg(unix)]
  {
    ("/bin/sh", &["-c"])
  }

  #[cfg(windows)]
  {
    ("powershell.exe", &["-NoProfile", "-ExecutionPolicy", "Bypass", "-Command"])
  }
}
