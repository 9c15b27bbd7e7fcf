// src/supervisor/mod.rs

//! Process-lifecycle supervisor.
//!
//! Guarantees at most one generation of the managed process: `run` always
//! stops whatever is alive, waits until the process table is clear, and only
//! then launches the new strategy. The last successfully started strategy is
//! persisted through the [`StateStore`].
//!
//! Externally observable states:
//! - idle: no matching process
//! - running: at least one matching process; the remembered strategy may be
//!   stale if something outside the supervisor started or killed it.
//!
//! Nothing here holds a lock across calls. Two overlapping `run` calls from
//! separate invocations are not coordinated.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::AdapterConfig;
use crate::errors::{AdapterError, Result};
use crate::process::{
    ProcessInspector, ProcessNames, ProcessTerminator, ShellLauncher, StrategyLauncher,
    SystemProcesses,
};
use crate::state::{FileStateStore, StateStore};
use crate::strategy::{DirectoryCatalog, StrategyCatalog};
use crate::types::{ActiveState, RunningProcess, StrategyDescriptor};

pub mod clock;
pub mod wait;

pub use clock::{Clock, TokioClock};
pub use wait::wait_until;

/// Collaborators the supervisor drives.
#[derive(Clone)]
pub struct Services {
    pub inspector: Arc<dyn ProcessInspector>,
    pub terminator: Arc<dyn ProcessTerminator>,
    pub launcher: Arc<dyn StrategyLauncher>,
    pub catalog: Arc<dyn StrategyCatalog>,
    pub state: Arc<dyn StateStore>,
    pub clock: Arc<dyn Clock>,
}

impl Services {
    /// Real OS process table, shell launcher, directory catalog and the
    /// file-backed state store rooted at `install_dir`.
    pub fn system(install_dir: &Path) -> Self {
        let processes = Arc::new(SystemProcesses::new());
        Self {
            inspector: processes.clone(),
            terminator: processes,
            launcher: Arc::new(ShellLauncher::new()),
            catalog: Arc::new(DirectoryCatalog::default()),
            state: Arc::new(FileStateStore::for_install_dir(install_dir)),
            clock: Arc::new(TokioClock),
        }
    }
}

/// Timing knobs for `run` and `stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorOptions {
    /// Total wait for the process table to clear before giving up.
    pub stop_timeout: Duration,
    /// Delay between process-table checks during that wait.
    pub poll_interval: Duration,
    /// Per-process wait after a kill request.
    pub kill_timeout: Duration,
}

impl From<&AdapterConfig> for SupervisorOptions {
    fn from(cfg: &AdapterConfig) -> Self {
        Self {
            stop_timeout: cfg.stop_timeout(),
            poll_interval: cfg.poll_interval(),
            kill_timeout: cfg.kill_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub is_running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_strategy: Option<String>,
    pub processes: Vec<RunningProcess>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub started: bool,
    pub strategy: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopReport {
    pub stopped_processes: Vec<RunningProcess>,
}

pub struct Supervisor {
    config: AdapterConfig,
    names: ProcessNames,
    options: SupervisorOptions,
    services: Services,
}

impl Supervisor {
    pub fn new(config: AdapterConfig, services: Services) -> Self {
        let options = SupervisorOptions::from(&config);
        Self {
            config,
            names: ProcessNames::zapret(),
            options,
            services,
        }
    }

    pub fn with_process_names(mut self, names: ProcessNames) -> Self {
        self.names = names;
        self
    }

    /// Live process set plus the remembered strategy. No side effects.
    pub fn status(&self) -> StatusReport {
        let processes = self.services.inspector.list_matching(&self.names);
        let state = self.services.state.load();
        debug!(
            running = processes.len(),
            active = ?state.active_strategy,
            "status queried"
        );

        StatusReport {
            is_running: !processes.is_empty(),
            active_strategy: state.active_strategy,
            processes,
        }
    }

    pub fn list_strategies(&self) -> Vec<StrategyDescriptor> {
        self.services.catalog.list(&self.config)
    }

    /// Stop whatever is running, then start `strategy_id`.
    ///
    /// Always restarts, even if `strategy_id` is already active. If old
    /// processes survive the stop timeout nothing is launched and the error
    /// lists them. State is written only after a successful launch.
    pub async fn run(&self, strategy_id: &str) -> Result<RunReport> {
        let Some(target) = self.services.catalog.resolve(strategy_id, &self.config) else {
            warn!(strategy = %strategy_id, "strategy not found");
            return Err(AdapterError::StrategyNotFound(strategy_id.to_string()));
        };
        info!(strategy = %target.file_name, "switching strategy");

        let stopped = self
            .services
            .terminator
            .terminate_all(&self.names, self.options.kill_timeout)
            .await;
        debug!(count = stopped.len(), "previous generation terminated");

        if !self.wait_until_clear().await {
            let still_running = self.services.inspector.list_matching(&self.names);
            error!(
                strategy = %target.file_name,
                survivors = still_running.len(),
                "old processes refused to exit; not starting"
            );
            return Err(AdapterError::ZombieProcess(still_running));
        }

        self.services
            .launcher
            .launch(&target.path, self.config.zapret_path())
            .map_err(|err| match err {
                AdapterError::StartFailed(_) => err,
                other => AdapterError::StartFailed(other.to_string()),
            })?;

        self.persist(&ActiveState::active(target.file_name.as_str()));
        info!(strategy = %target.file_name, "strategy started");

        Ok(RunReport {
            started: true,
            strategy: target.file_name,
        })
    }

    /// Stop all managed processes and forget the active strategy, whether or
    /// not every process actually exited.
    pub async fn stop(&self) -> StopReport {
        let stopped = self
            .services
            .terminator
            .terminate_all(&self.names, self.options.kill_timeout)
            .await;
        self.persist(&ActiveState::cleared());
        info!(count = stopped.len(), "stop completed");

        StopReport {
            stopped_processes: stopped,
        }
    }

    async fn wait_until_clear(&self) -> bool {
        let inspector = &self.services.inspector;
        let names = &self.names;
        wait_until(
            self.services.clock.as_ref(),
            self.options.stop_timeout,
            self.options.poll_interval,
            || inspector.list_matching(names).is_empty(),
        )
        .await
    }

    fn persist(&self, state: &ActiveState) {
        if let Err(err) = self.services.state.save(state) {
            warn!(error = %err, "could not persist active state");
        }
    }
}
