// src/process/mod.rs

//! OS process layer.
//!
//! The supervisor never touches the process table directly. It talks to three
//! capabilities so tests (or other backends) can stand in for the OS:
//!
//! - [`ProcessInspector`]: list managed processes currently alive.
//! - [`ProcessTerminator`]: kill managed process trees and confirm exit.
//! - [`StrategyLauncher`]: start a strategy script detached from us.
//!
//! [`system::SystemProcesses`] implements the first two on top of `sysinfo`;
//! [`launcher::ShellLauncher`] implements the third with
//! `tokio::process::Command`.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::time::Duration;

use crate::errors::Result;
use crate::types::RunningProcess;

pub mod launcher;
pub mod system;

pub use launcher::ShellLauncher;
pub use system::SystemProcesses;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Executable names of the 32-bit and 64-bit zapret packet filter.
pub const ZAPRET_PROCESS_NAMES: [&str; 2] = ["winws", "winws64"];

/// Case-insensitive allow-list of process names treated as "the managed
/// process".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessNames {
    names: Vec<String>,
}

impl ProcessNames {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn zapret() -> Self {
        Self::new(ZAPRET_PROCESS_NAMES)
    }

    /// True if `process_name` (with or without `.exe`) is on the list.
    pub fn matches(&self, process_name: &str) -> bool {
        let bare = strip_exe(process_name);
        self.names.iter().any(|n| n.eq_ignore_ascii_case(bare))
    }
}

impl Default for ProcessNames {
    fn default() -> Self {
        Self::zapret()
    }
}

/// `winws.exe` -> `winws`; other names pass through unchanged.
pub fn strip_exe(name: &str) -> &str {
    let len = name.len();
    if len > 4 && name.is_char_boundary(len - 4) && name[len - 4..].eq_ignore_ascii_case(".exe") {
        &name[..len - 4]
    } else {
        name
    }
}

/// Read-only view of the managed processes.
pub trait ProcessInspector: Send + Sync {
    /// Snapshot of alive processes whose name is in `names`.
    ///
    /// Best-effort: if the process table cannot be read the result is empty.
    fn list_matching(&self, names: &ProcessNames) -> Vec<RunningProcess>;
}

/// Forceful termination of managed processes.
pub trait ProcessTerminator: Send + Sync {
    /// Kill every process tree whose root matches `names`, waiting up to
    /// `per_process_timeout` for each to exit.
    ///
    /// Returns only the processes confirmed to have exited. Kill or wait
    /// failures are swallowed; the affected process is simply left out.
    fn terminate_all<'a>(
        &'a self,
        names: &'a ProcessNames,
        per_process_timeout: Duration,
    ) -> BoxFuture<'a, Vec<RunningProcess>>;
}

/// Starts strategy scripts.
pub trait StrategyLauncher: Send + Sync {
    /// Launch `script` with `working_dir` as its current directory and return
    /// without waiting for it.
    ///
    /// Errors are reported as `AdapterError::StartFailed`.
    fn launch(&self, script: &Path, working_dir: &Path) -> Result<()>;
}
