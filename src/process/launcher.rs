// src/process/launcher.rs

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{error, info};

use crate::errors::{AdapterError, Result};
use crate::process::StrategyLauncher;

#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Launches strategy scripts through the platform shell.
///
/// The child is detached: no console window, its own process group, and no
/// inherited stdio (our stdout carries the JSON result).
#[derive(Debug, Clone, Default)]
pub struct ShellLauncher;

impl ShellLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl StrategyLauncher for ShellLauncher {
    fn launch(&self, script: &Path, working_dir: &Path) -> Result<()> {
        let mut cmd = shell_command(script);
        cmd.current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false);

        match cmd.spawn() {
            Ok(child) => {
                info!(
                    script = %script.display(),
                    pid = child.id().unwrap_or_default(),
                    "strategy launched"
                );
                Ok(())
            }
            Err(err) => {
                error!(script = %script.display(), error = %err, "strategy launch failed");
                Err(AdapterError::StartFailed(err.to_string()))
            }
        }
    }
}

#[cfg(windows)]
fn shell_command(script: &Path) -> Command {
    let mut c = Command::new("cmd.exe");
    c.raw_arg(format!("/c \"{}\"", script.display()));
    c.creation_flags(CREATE_NO_WINDOW | CREATE_NEW_PROCESS_GROUP);
    c
}

#[cfg(not(windows))]
fn shell_command(script: &Path) -> Command {
    let mut c = Command::new("sh");
    c.arg(script);
    c.process_group(0);
    c
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_working_directory_is_a_start_failure() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("general (ALT).bat");
        std::fs::write(&script, "exit 0\n").unwrap();

        let err = ShellLauncher::new()
            .launch(&script, &dir.path().join("gone"))
            .unwrap_err();
        assert_eq!(err.kind(), "start_failed");
    }

    #[tokio::test]
    async fn script_runs_in_the_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("general (ALT).bat");
        std::fs::write(&script, "touch started.marker\n").unwrap();

        ShellLauncher::new().launch(&script, dir.path()).unwrap();

        let marker = dir.path().join("started.marker");
        for _ in 0..100 {
            if marker.exists() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        panic!("script did not run in {:?}", dir.path());
    }
}
