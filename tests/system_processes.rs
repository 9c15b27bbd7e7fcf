// tests/system_processes.rs
#![cfg(unix)]

mod common;
use crate::common::builders::ZapretDirBuilder;
use crate::common::{init_tracing, with_timeout};

use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;

use zapret_adapter::process::{ProcessNames, ShellLauncher, SystemProcesses};
use zapret_adapter::state::MemoryStateStore;
use zapret_adapter::strategy::DirectoryCatalog;
use zapret_adapter::supervisor::{Services, Supervisor, TokioClock};
use zapret_adapter::types::{ActiveState, RunningProcess};

/// Start a renamed copy of `/bin/sh` waiting on a background sleep.
fn spawn_sleeper(dir: &Path, name: &str) -> Child {
    let shell = dir.join(name);
    std::fs::copy("/bin/sh", &shell).expect("copying /bin/sh");
    Command::new(&shell)
        .args(["-c", "sleep 60 & wait"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawning sleeper")
}

fn real_services(state: &MemoryStateStore) -> Services {
    let processes = Arc::new(SystemProcesses::new());
    Services {
        inspector: processes.clone(),
        terminator: processes,
        launcher: Arc::new(ShellLauncher::new()),
        catalog: Arc::new(DirectoryCatalog::default()),
        state: Arc::new(state.clone()),
        clock: Arc::new(TokioClock),
    }
}

#[tokio::test]
async fn stop_kills_real_processes_by_configured_name() {
    init_tracing();
    let zapret = ZapretDirBuilder::new().build();
    let bin = tempfile::tempdir().expect("bin dir");
    let mut sleeper = spawn_sleeper(bin.path(), "zadapter_stop");
    let pid = sleeper.id();

    let state = MemoryStateStore::with_state(ActiveState::active("general (ALT).bat"));
    let supervisor = Supervisor::new(zapret.config(), real_services(&state))
        .with_process_names(ProcessNames::new(["zadapter_stop"]));

    let before = supervisor.status();
    assert!(before.is_running);
    assert_eq!(before.processes, vec![RunningProcess::new("zadapter_stop", pid)]);

    let report = with_timeout(supervisor.stop()).await;

    assert_eq!(
        report.stopped_processes,
        vec![RunningProcess::new("zadapter_stop", pid)]
    );
    assert!(!supervisor.status().is_running);
    assert_eq!(state.snapshot(), ActiveState::cleared());

    sleeper.wait().expect("reaping sleeper");
}

#[tokio::test]
async fn unlisted_names_are_left_alone() {
    let zapret = ZapretDirBuilder::new().build();
    let bin = tempfile::tempdir().expect("bin dir");
    let mut sleeper = spawn_sleeper(bin.path(), "zadapter_other");

    let supervisor = Supervisor::new(zapret.config(), real_services(&MemoryStateStore::new()))
        .with_process_names(ProcessNames::new(["zadapter_none"]));

    let report = supervisor.stop().await;
    assert!(report.stopped_processes.is_empty());

    // Still alive: a non-blocking reap finds nothing to collect.
    assert!(sleeper.try_wait().expect("polling sleeper").is_none());
    sleeper.kill().expect("killing sleeper");
    sleeper.wait().expect("reaping sleeper");
}
