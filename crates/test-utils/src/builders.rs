#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use zapret_adapter::config::AdapterConfig;
use zapret_adapter::state::{MemoryStateStore, StateStore};
use zapret_adapter::strategy::DirectoryCatalog;
use zapret_adapter::supervisor::{Services, Supervisor};
use zapret_adapter::types::ActiveState;

use crate::clock::ManualClock;
use crate::fake_process::FakeProcessTable;

/// Builder for a throwaway zapret install directory on the real filesystem.
pub struct ZapretDirBuilder {
    files: Vec<String>,
    dirs: Vec<String>,
}

impl ZapretDirBuilder {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            dirs: Vec::new(),
        }
    }

    /// Add an empty script (or any other file) at the top level.
    pub fn with_file(mut self, name: &str) -> Self {
        self.files.push(name.to_string());
        self
    }

    pub fn with_dir(mut self, name: &str) -> Self {
        self.dirs.push(name.to_string());
        self
    }

    /// The three scripts most tests need: ALT, ALT2 and ALT3.
    pub fn with_alt_strategies(self) -> Self {
        self.with_file("general (ALT).bat")
            .with_file("general (ALT2).bat")
            .with_file("general (ALT3).bat")
    }

    pub fn build(self) -> ZapretDir {
        let dir = tempfile::tempdir().expect("creating temp zapret dir");
        for name in &self.dirs {
            fs::create_dir_all(dir.path().join(name)).expect("creating sub dir");
        }
        for name in &self.files {
            fs::write(dir.path().join(name), "@echo off\r\n").expect("writing script");
        }
        ZapretDir { dir }
    }
}

impl Default for ZapretDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A temp directory laid out like a zapret install. Deleted on drop.
pub struct ZapretDir {
    dir: TempDir,
}

impl ZapretDir {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn script(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Validated config pointing at this directory with short, test-friendly
    /// timeouts.
    pub fn config(&self) -> AdapterConfig {
        AdapterConfig::new_unchecked(self.path()).with_timeouts(
            Duration::from_secs(5),
            Duration::from_millis(200),
            Duration::from_secs(3),
        )
    }

    /// Write `zapret-adapter.json` into `target_dir` pointing at this
    /// directory and return its path.
    pub fn write_json_config(&self, target_dir: &Path) -> PathBuf {
        let path = target_dir.join("zapret-adapter.json");
        let body = serde_json::json!({
            "zapretPath": self.path(),
            "generalMask": "general (*.bat)",
        });
        fs::write(&path, body.to_string()).expect("writing adapter config");
        path
    }
}

/// Everything a supervisor test needs to observe.
pub struct Harness {
    pub processes: FakeProcessTable,
    pub state: MemoryStateStore,
    pub clock: ManualClock,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            processes: FakeProcessTable::new(),
            state: MemoryStateStore::new(),
            clock: ManualClock::new(),
        }
    }

    pub fn with_processes(mut self, processes: FakeProcessTable) -> Self {
        self.processes = processes;
        self
    }

    pub fn with_active(mut self, strategy: &str) -> Self {
        self.state = MemoryStateStore::with_state(ActiveState::active(strategy));
        self
    }

    /// Services wired to the fakes, with the real directory catalog.
    pub fn services(&self) -> Services {
        self.services_with_state(Arc::new(self.state.clone()))
    }

    /// Same as [`Harness::services`] but with a custom state store.
    pub fn services_with_state(&self, state: Arc<dyn StateStore>) -> Services {
        let processes = Arc::new(self.processes.clone());
        Services {
            inspector: processes.clone(),
            terminator: processes.clone(),
            launcher: processes,
            catalog: Arc::new(DirectoryCatalog::default()),
            state,
            clock: Arc::new(self.clock.clone()),
        }
    }

    pub fn supervisor(&self, zapret: &ZapretDir) -> Supervisor {
        Supervisor::new(zapret.config(), self.services())
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
