// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::config::model::{AdapterConfig, RawAdapterConfig};
use crate::errors::{AdapterError, Result};

/// Mask used when the configured one is blank.
const FALLBACK_MASK: &str = "*.bat";

impl TryFrom<RawAdapterConfig> for AdapterConfig {
    type Error = AdapterError;

    fn try_from(raw: RawAdapterConfig) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;

        let mask = if raw.general_mask.trim().is_empty() {
            FALLBACK_MASK.to_string()
        } else {
            raw.general_mask
        };

        Ok(AdapterConfig::new_unchecked(PathBuf::from(raw.zapret_path.trim()))
            .with_general_mask(mask)
            .with_timeouts(
                Duration::from_millis(raw.stop_timeout_ms),
                Duration::from_millis(raw.poll_interval_ms),
                Duration::from_millis(raw.kill_timeout_ms),
            ))
    }
}

pub fn validate_config(cfg: &RawAdapterConfig) -> Result<()> {
    validate_zapret_path(cfg)?;
    validate_timeouts(cfg)?;
    Ok(())
}

fn validate_zapret_path(cfg: &RawAdapterConfig) -> Result<()> {
    let path = cfg.zapret_path.trim();
    if path.is_empty() || !PathBuf::from(path).is_dir() {
        return Err(AdapterError::InvalidZapretPath(cfg.zapret_path.clone()));
    }
    Ok(())
}

fn validate_timeouts(cfg: &RawAdapterConfig) -> Result<()> {
    let fields = [
        ("stopTimeoutMs", cfg.stop_timeout_ms),
        ("pollIntervalMs", cfg.poll_interval_ms),
        ("killTimeoutMs", cfg.kill_timeout_ms),
    ];
    for (name, value) in fields {
        if value == 0 {
            return Err(AdapterError::ConfigLoad(format!(
                "{name} must be >= 1 (got 0)"
            )));
        }
    }
    Ok(())
}
