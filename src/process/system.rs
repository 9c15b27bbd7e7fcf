// src/process/system.rs

//! `sysinfo`-backed process inspector and terminator.

use std::time::Duration;

use sysinfo::{Pid, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::process::{strip_exe, BoxFuture, ProcessInspector, ProcessNames, ProcessTerminator};
use crate::types::RunningProcess;

/// How often a killed pid is re-checked while waiting for it to exit.
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Real OS process table.
#[derive(Debug, Clone, Default)]
pub struct SystemProcesses;

impl SystemProcesses {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessInspector for SystemProcesses {
    fn list_matching(&self, names: &ProcessNames) -> Vec<RunningProcess> {
        let system = refreshed_system();
        let found = matching(&system, names);
        debug!(count = found.len(), "process table scanned");
        found
    }
}

impl ProcessTerminator for SystemProcesses {
    fn terminate_all<'a>(
        &'a self,
        names: &'a ProcessNames,
        per_process_timeout: Duration,
    ) -> BoxFuture<'a, Vec<RunningProcess>> {
        Box::pin(async move {
            let mut system = refreshed_system();
            let targets = matching(&system, names);
            let mut stopped = Vec::with_capacity(targets.len());

            for target in targets {
                let pid = Pid::from_u32(target.pid);

                if !kill_tree(&system, pid) && is_alive_now(&mut system, pid) {
                    warn!(name = %target.name, pid = target.pid, "kill request failed; skipping");
                    continue;
                }

                if wait_for_exit(&mut system, pid, per_process_timeout).await {
                    info!(name = %target.name, pid = target.pid, "process stopped");
                    stopped.push(target);
                } else {
                    warn!(
                        name = %target.name,
                        pid = target.pid,
                        timeout_ms = per_process_timeout.as_millis() as u64,
                        "process still alive after kill"
                    );
                }
            }

            stopped
        })
    }
}

fn refreshed_system() -> System {
    let mut system = System::new();
    system.refresh_processes_specifics(ProcessesToUpdate::All, true, ProcessRefreshKind::new());
    system
}

/// Alive, non-thread processes whose name is on the allow-list.
fn matching(system: &System, names: &ProcessNames) -> Vec<RunningProcess> {
    system
        .processes()
        .values()
        .filter(|p| p.thread_kind().is_none() && p.status() != ProcessStatus::Zombie)
        .filter_map(|p| {
            let name = p.name().to_string_lossy();
            names
                .matches(&name)
                .then(|| RunningProcess::new(strip_exe(&name), p.pid().as_u32()))
        })
        .collect()
}

/// Kill `root` and every descendant. Returns whether the root kill succeeded;
/// failures on descendants are only logged.
fn kill_tree(system: &System, root: Pid) -> bool {
    let mut descendants = Vec::new();
    collect_descendants(system, root, &mut descendants);

    let root_killed = system.process(root).is_some_and(|p| p.kill());

    for pid in descendants {
        let killed = system.process(pid).is_some_and(|p| p.kill());
        if !killed {
            debug!(pid = pid.as_u32(), parent = root.as_u32(), "could not kill child process");
        }
    }

    root_killed
}

fn collect_descendants(system: &System, parent: Pid, out: &mut Vec<Pid>) {
    let mut to_check = vec![parent];
    while let Some(current) = to_check.pop() {
        for (pid, process) in system.processes() {
            if process.parent() == Some(current) && *pid != parent && !out.contains(pid) {
                out.push(*pid);
                to_check.push(*pid);
            }
        }
    }
}

fn is_alive_now(system: &mut System, pid: Pid) -> bool {
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::new(),
    );
    system
        .process(pid)
        .is_some_and(|p| p.status() != ProcessStatus::Zombie)
}

async fn wait_for_exit(system: &mut System, pid: Pid, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if !is_alive_now(system, pid) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(EXIT_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanning_for_unknown_names_finds_nothing() {
        let names = ProcessNames::new(["zapret-adapter-no-such-process"]);
        assert!(SystemProcesses::new().list_matching(&names).is_empty());
    }

    #[tokio::test]
    async fn terminating_unknown_names_is_a_no_op() {
        let names = ProcessNames::new(["zapret-adapter-no-such-process"]);
        let stopped = SystemProcesses::new()
            .terminate_all(&names, Duration::from_millis(100))
            .await;
        assert!(stopped.is_empty());
    }

    #[test]
    fn own_process_is_alive() {
        let mut system = refreshed_system();
        let me = Pid::from_u32(std::process::id());
        assert!(is_alive_now(&mut system, me));
    }
}
