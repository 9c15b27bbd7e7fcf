// src/types.rs

//! Plain data shared by the process layer, the state store, the strategy
//! catalog and the supervisor.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A managed process observed in the OS process table.
///
/// Produced fresh on every inspection; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RunningProcess {
    pub name: String,
    pub pid: u32,
}

impl RunningProcess {
    pub fn new(name: impl Into<String>, pid: u32) -> Self {
        Self {
            name: name.into(),
            pid,
        }
    }
}

impl fmt::Display for RunningProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.pid)
    }
}

/// Durable record of which strategy was last started successfully.
///
/// Serialized as `{"activeStrategy": "..."}`; an absent or `null` field means
/// nothing is intended to be running.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_strategy: Option<String>,
}

impl ActiveState {
    pub fn active(strategy: impl Into<String>) -> Self {
        Self {
            active_strategy: Some(strategy.into()),
        }
    }

    pub fn cleared() -> Self {
        Self::default()
    }
}

/// A strategy script found in the zapret directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyDescriptor {
    /// File name including extension, e.g. `general (ALT3).bat`.
    pub file_name: String,
    /// Human label, e.g. `ALT3`.
    pub display_name: String,
    /// Full path to the script.
    pub path: PathBuf,
}
