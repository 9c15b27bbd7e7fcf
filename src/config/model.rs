// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Configuration as read from `zapret-adapter.json` (or a `.toml` file).
///
/// ```json
/// {
///   "zapretPath": "C:\\zapret",
///   "generalMask": "general (*.bat)"
/// }
/// ```
///
/// Only `zapretPath` is required. The timeout knobs exist for slow machines
/// and for tests; the defaults match the behaviour the GUI expects.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAdapterConfig {
    /// Directory holding `winws.exe` and the strategy scripts.
    #[serde(default, alias = "ZapretPath")]
    pub zapret_path: String,

    /// File mask selecting strategy scripts inside `zapretPath`.
    #[serde(default = "default_general_mask", alias = "GeneralMask")]
    pub general_mask: String,

    /// Total time `run-strategy` waits for old processes to disappear.
    #[serde(default = "default_stop_timeout_ms")]
    pub stop_timeout_ms: u64,

    /// Delay between process-table checks while waiting.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Per-process wait after a kill request.
    #[serde(default = "default_kill_timeout_ms")]
    pub kill_timeout_ms: u64,
}

fn default_general_mask() -> String {
    "general (*.bat)".to_string()
}

fn default_stop_timeout_ms() -> u64 {
    5_000
}

fn default_poll_interval_ms() -> u64 {
    200
}

fn default_kill_timeout_ms() -> u64 {
    3_000
}

impl Default for RawAdapterConfig {
    fn default() -> Self {
        Self {
            zapret_path: String::new(),
            general_mask: default_general_mask(),
            stop_timeout_ms: default_stop_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            kill_timeout_ms: default_kill_timeout_ms(),
        }
    }
}

/// Validated configuration handed to the catalog and the supervisor.
///
/// Construct it through `TryFrom<RawAdapterConfig>` (see `validate.rs`) so
/// the zapret directory is known to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    zapret_path: PathBuf,
    general_mask: String,
    stop_timeout: Duration,
    poll_interval: Duration,
    kill_timeout: Duration,
}

impl AdapterConfig {
    /// Build a config without checking the directory. Defaults for
    /// everything except the path.
    pub fn new_unchecked(zapret_path: impl Into<PathBuf>) -> Self {
        let raw = RawAdapterConfig::default();
        Self {
            zapret_path: zapret_path.into(),
            general_mask: raw.general_mask,
            stop_timeout: Duration::from_millis(raw.stop_timeout_ms),
            poll_interval: Duration::from_millis(raw.poll_interval_ms),
            kill_timeout: Duration::from_millis(raw.kill_timeout_ms),
        }
    }

    pub fn with_general_mask(mut self, mask: impl Into<String>) -> Self {
        self.general_mask = mask.into();
        self
    }

    pub fn with_timeouts(
        mut self,
        stop_timeout: Duration,
        poll_interval: Duration,
        kill_timeout: Duration,
    ) -> Self {
        self.stop_timeout = stop_timeout;
        self.poll_interval = poll_interval;
        self.kill_timeout = kill_timeout;
        self
    }

    pub fn zapret_path(&self) -> &Path {
        &self.zapret_path
    }

    pub fn general_mask(&self) -> &str {
        &self.general_mask
    }

    pub fn stop_timeout(&self) -> Duration {
        self.stop_timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn kill_timeout(&self) -> Duration {
        self.kill_timeout
    }
}
