use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use zapret_adapter::errors::{AdapterError, Result};
use zapret_adapter::process::{
    BoxFuture, ProcessInspector, ProcessNames, ProcessTerminator, StrategyLauncher,
};
use zapret_adapter::types::RunningProcess;

/// First pid handed out to processes "started" by the fake.
pub const FIRST_FAKE_PID: u32 = 9000;

/// One call observed by the fake, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    Terminate,
    Launch { script: PathBuf, working_dir: PathBuf },
}

/// In-memory process table standing in for the OS.
///
/// - `terminate_all` removes matching processes only when `stop_clears` is
///   set; otherwise they stay alive, like a process that ignores the kill.
/// - with `exits_after_polls(n)`, killed processes linger for `n` more
///   `list_matching` calls before disappearing.
/// - `launch` records the call and, with `start_adds_process`, adds a
///   `winws` entry with the next fake pid.
///
/// Clones share the same table.
#[derive(Debug, Clone)]
pub struct FakeProcessTable {
    inner: Arc<Mutex<Table>>,
}

#[derive(Debug)]
struct Table {
    processes: Vec<RunningProcess>,
    stop_clears: bool,
    start_adds_process: bool,
    launch_error: Option<String>,
    exit_delay: Option<usize>,
    pending_exit: Option<usize>,
    next_pid: u32,
    events: Vec<ProcessEvent>,
}

impl FakeProcessTable {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Table {
                processes: Vec::new(),
                stop_clears: true,
                start_adds_process: true,
                launch_error: None,
                exit_delay: None,
                pending_exit: None,
                next_pid: FIRST_FAKE_PID,
                events: Vec::new(),
            })),
        }
    }

    pub fn with_process(self, name: &str, pid: u32) -> Self {
        self.add_process(name, pid);
        self
    }

    pub fn stop_clears(self, clears: bool) -> Self {
        self.table().stop_clears = clears;
        self
    }

    pub fn start_adds_process(self, adds: bool) -> Self {
        self.table().start_adds_process = adds;
        self
    }

    /// Killed processes stay visible for `polls` more inspections, then exit.
    /// `terminate_all` does not report them as stopped.
    pub fn exits_after_polls(self, polls: usize) -> Self {
        self.table().exit_delay = Some(polls);
        self
    }

    /// Make every `launch` fail with `StartFailed(message)`.
    pub fn failing_launch(self, message: &str) -> Self {
        self.table().launch_error = Some(message.to_string());
        self
    }

    /// Something outside the supervisor started a process.
    pub fn add_process(&self, name: &str, pid: u32) {
        self.table().processes.push(RunningProcess::new(name, pid));
    }

    /// Something outside the supervisor killed every process.
    pub fn clear(&self) {
        self.table().processes.clear();
    }

    pub fn processes(&self) -> Vec<RunningProcess> {
        self.table().processes.clone()
    }

    pub fn events(&self) -> Vec<ProcessEvent> {
        self.table().events.clone()
    }

    pub fn launches(&self) -> Vec<PathBuf> {
        self.table()
            .events
            .iter()
            .filter_map(|e| match e {
                ProcessEvent::Launch { script, .. } => Some(script.clone()),
                ProcessEvent::Terminate => None,
            })
            .collect()
    }

    /// Script path of the most recent launch.
    pub fn started_path(&self) -> Option<PathBuf> {
        self.launches().pop()
    }

    fn table(&self) -> MutexGuard<'_, Table> {
        self.inner.lock().unwrap()
    }
}

impl Default for FakeProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessInspector for FakeProcessTable {
    fn list_matching(&self, names: &ProcessNames) -> Vec<RunningProcess> {
        let mut table = self.table();
        if let Some(remaining) = table.pending_exit.take() {
            if remaining <= 1 {
                table.processes.retain(|p| !names.matches(&p.name));
            } else {
                table.pending_exit = Some(remaining - 1);
            }
        }

        table
            .processes
            .iter()
            .filter(|p| names.matches(&p.name))
            .cloned()
            .collect()
    }
}

impl ProcessTerminator for FakeProcessTable {
    fn terminate_all<'a>(
        &'a self,
        names: &'a ProcessNames,
        _per_process_timeout: Duration,
    ) -> BoxFuture<'a, Vec<RunningProcess>> {
        let mut table = self.table();
        table.events.push(ProcessEvent::Terminate);

        let stopped = if let Some(polls) = table.exit_delay {
            table.pending_exit = Some(polls);
            Vec::new()
        } else if table.stop_clears {
            let (gone, kept): (Vec<_>, Vec<_>) = table
                .processes
                .drain(..)
                .partition(|p| names.matches(&p.name));
            table.processes = kept;
            gone
        } else {
            Vec::new()
        };

        Box::pin(async move { stopped })
    }
}

impl StrategyLauncher for FakeProcessTable {
    fn launch(&self, script: &Path, working_dir: &Path) -> Result<()> {
        let mut table = self.table();
        table.events.push(ProcessEvent::Launch {
            script: script.to_path_buf(),
            working_dir: working_dir.to_path_buf(),
        });

        if let Some(message) = table.launch_error.clone() {
            return Err(AdapterError::StartFailed(message));
        }

        if table.start_adds_process {
            let pid = table.next_pid;
            table.next_pid += 1;
            table.processes.push(RunningProcess::new("winws", pid));
        }
        Ok(())
    }
}
