// src/errors.rs

//! Crate-wide error type.
//!
//! Every failure a command can report is a variant here. `kind()` is the
//! short machine-readable code written to the JSON envelope; the `Display`
//! text is the human-readable `details`.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::RunningProcess;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Configuration file was not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Invalid zapretPath: {0}")]
    InvalidZapretPath(String),

    #[error("{0}")]
    ConfigLoad(String),

    #[error("Strategy '{0}' not found.")]
    StrategyNotFound(String),

    #[error("{}", zombie_details(.0))]
    ZombieProcess(Vec<RunningProcess>),

    #[error("{0}")]
    StartFailed(String),

    /// Never reaches the user; stores log it and carry on.
    #[error("state persistence failed: {0:#}")]
    Persistence(anyhow::Error),
}

impl AdapterError {
    /// Machine-readable error code.
    pub fn kind(&self) -> &'static str {
        match self {
            AdapterError::ConfigNotFound(_) => "config_not_found",
            AdapterError::InvalidZapretPath(_) => "invalid_zapret_path",
            AdapterError::ConfigLoad(_) => "config_load_failed",
            AdapterError::StrategyNotFound(_) => "strategy_not_found",
            AdapterError::ZombieProcess(_) => "zombie_winws",
            AdapterError::StartFailed(_) => "start_failed",
            AdapterError::Persistence(_) => "persistence_failed",
        }
    }

    /// Whether this error belongs to the configuration class, raised before
    /// any supervisor operation runs.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            AdapterError::ConfigNotFound(_)
                | AdapterError::InvalidZapretPath(_)
                | AdapterError::ConfigLoad(_)
        )
    }
}

fn zombie_details(still_running: &[RunningProcess]) -> String {
    if still_running.is_empty() {
        return "zapret did not stop.".to_string();
    }
    let list: Vec<String> = still_running.iter().map(ToString::to_string).collect();
    format!("zapret did not stop: {}", list.join(","))
}

pub type Result<T> = std::result::Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zombie_details_list_name_pid_pairs() {
        let err = AdapterError::ZombieProcess(vec![
            RunningProcess::new("winws", 1111),
            RunningProcess::new("winws64", 42),
        ]);
        assert_eq!(err.kind(), "zombie_winws");
        assert_eq!(err.to_string(), "zapret did not stop: winws:1111,winws64:42");
    }

    #[test]
    fn zombie_without_survivors_still_has_details() {
        let err = AdapterError::ZombieProcess(Vec::new());
        assert_eq!(err.to_string(), "zapret did not stop.");
    }

    #[test]
    fn config_class_is_recognised() {
        assert!(AdapterError::InvalidZapretPath("x".into()).is_config_error());
        assert!(!AdapterError::StartFailed("boom".into()).is_config_error());
    }
}
