// src/config/loader.rs

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{AdapterConfig, RawAdapterConfig};
use crate::errors::{AdapterError, Result};

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV_VAR: &str = "ZAPRET_ADAPTER_CONFIG";

/// Override `zapretPath` from the file, first match wins. Names compare
/// ignoring ASCII case; the second form is the bare config key.
pub const ZAPRET_PATH_ENV_VARS: [&str; 2] = ["ZAPRET_PATH", "ZapretPath"];

/// Override `generalMask` from the file, same rules as above.
pub const GENERAL_MASK_ENV_VARS: [&str; 2] = ["ZAPRET_GENERAL_MASK", "GeneralMask"];

/// File name looked up in the install directory as the last resort.
pub const DEFAULT_CONFIG_FILE: &str = "zapret-adapter.json";

/// Load a configuration file and return the raw, unvalidated model.
///
/// `.toml` files are parsed as TOML; anything else as JSON.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawAdapterConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|e| AdapterError::ConfigLoad(format!("reading {}: {e}", path.display())))?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let config = if is_toml {
        toml::from_str(&contents).map_err(|e| AdapterError::ConfigLoad(e.to_string()))?
    } else {
        serde_json::from_str(&contents).map_err(|e| AdapterError::ConfigLoad(e.to_string()))?
    };

    Ok(config)
}

/// Resolves, reads and validates the adapter configuration.
///
/// The process environment is captured once at construction so lookups are
/// stable for the lifetime of the loader.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    base_dir: PathBuf,
    env: HashMap<String, String>,
}

impl ConfigLoader {
    /// Loader backed by the current process environment.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::with_env(base_dir, std::env::vars())
    }

    /// Loader backed by an explicit set of variables.
    pub fn with_env<I, K, V>(base_dir: impl Into<PathBuf>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            base_dir: base_dir.into(),
            env: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Explicit path, then `ZAPRET_ADAPTER_CONFIG`, then
    /// `<base_dir>/zapret-adapter.json`.
    pub fn resolve_path(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
            return path.to_path_buf();
        }

        if let Some(path) = self.var(CONFIG_ENV_VAR) {
            return PathBuf::from(path);
        }

        self.base_dir.join(DEFAULT_CONFIG_FILE)
    }

    pub fn load(&self, explicit: Option<&Path>) -> Result<AdapterConfig> {
        let path = self.resolve_path(explicit);
        if !path.is_file() {
            return Err(AdapterError::ConfigNotFound(path));
        }
        debug!(path = %path.display(), "loading adapter config");

        let mut raw = load_from_path(&path)?;
        self.apply_env_overrides(&mut raw);
        AdapterConfig::try_from(raw)
    }

    fn apply_env_overrides(&self, raw: &mut RawAdapterConfig) {
        if let Some(path) = self.override_var(&ZAPRET_PATH_ENV_VARS) {
            debug!(zapret_path = %path, "zapretPath overridden from environment");
            raw.zapret_path = path.to_string();
        }
        if let Some(mask) = self.override_var(&GENERAL_MASK_ENV_VARS) {
            debug!(general_mask = %mask, "generalMask overridden from environment");
            raw.general_mask = mask.to_string();
        }
    }

    fn var(&self, key: &str) -> Option<&str> {
        self.env
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn override_var(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| {
            self.env
                .iter()
                .filter(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.trim())
                .find(|v| !v.is_empty())
        })
    }
}

/// Directory of the running executable; `.` if it cannot be determined.
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
