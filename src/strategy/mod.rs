// src/strategy/mod.rs

//! Discovery of strategy scripts in the zapret directory.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::AdapterConfig;
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::StrategyDescriptor;

pub mod mask;

pub use mask::{compile_mask, display_name, normalize_mask};

/// Resolves strategy identifiers to scripts.
pub trait StrategyCatalog: Send + Sync {
    /// Every script in the zapret directory matching the configured mask,
    /// sorted by display name. Recomputed on each call.
    fn list(&self, config: &AdapterConfig) -> Vec<StrategyDescriptor>;

    /// The listed script whose file name equals `id`, ignoring case.
    fn resolve(&self, id: &str, config: &AdapterConfig) -> Option<StrategyDescriptor> {
        let wanted = id.to_lowercase();
        self.list(config)
            .into_iter()
            .find(|s| s.file_name.to_lowercase() == wanted)
    }
}

/// Catalog that scans the top level of `zapretPath`.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    fs: Arc<dyn FileSystem>,
}

impl DirectoryCatalog {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl Default for DirectoryCatalog {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem))
    }
}

impl StrategyCatalog for DirectoryCatalog {
    fn list(&self, config: &AdapterConfig) -> Vec<StrategyDescriptor> {
        let dir = config.zapret_path();
        if !self.fs.is_dir(dir) {
            debug!(dir = %dir.display(), "zapret directory missing; no strategies");
            return Vec::new();
        }

        let matcher = match compile_mask(config.general_mask()) {
            Ok(m) => m,
            Err(err) => {
                warn!(error = %err, "cannot list strategies");
                return Vec::new();
            }
        };

        let entries = match self.fs.read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "cannot read zapret directory");
                return Vec::new();
            }
        };

        let mut items: Vec<StrategyDescriptor> = entries
            .into_iter()
            .filter(|p| self.fs.is_file(p))
            .filter_map(|path| {
                let file_name = file_name_of(&path)?;
                matcher.is_match(&file_name).then(|| StrategyDescriptor {
                    display_name: display_name(&file_name),
                    file_name,
                    path,
                })
            })
            .collect();

        items.sort_by_key(|s| s.display_name.to_lowercase());
        items
    }
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}
