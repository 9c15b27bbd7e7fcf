// src/state/file_store.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, warn};

use crate::errors::{AdapterError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::state::StateStore;
use crate::types::ActiveState;

/// Directory under the user config dir shared with the GUI.
pub const STATE_DIR_NAME: &str = "zapret-gui";
pub const STATE_FILE_NAME: &str = "last-state.json";

/// JSON-file backed [`StateStore`].
#[derive(Debug, Clone)]
pub struct FileStateStore {
    fs: Arc<dyn FileSystem>,
    primary: PathBuf,
    fallback: PathBuf,
}

impl FileStateStore {
    /// Store at the standard locations: `<config dir>/zapret-gui/last-state.json`,
    /// falling back to `<install_dir>/last-state.json` for reads.
    pub fn for_install_dir(install_dir: impl AsRef<Path>) -> Self {
        let install_dir = install_dir.as_ref();
        let primary = dirs::config_dir()
            .map(|dir| dir.join(STATE_DIR_NAME).join(STATE_FILE_NAME))
            .unwrap_or_else(|| install_dir.join(STATE_FILE_NAME));
        Self::with_paths(
            Arc::new(RealFileSystem),
            primary,
            install_dir.join(STATE_FILE_NAME),
        )
    }

    pub fn with_paths(
        fs: Arc<dyn FileSystem>,
        primary: impl Into<PathBuf>,
        fallback: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fs,
            primary: primary.into(),
            fallback: fallback.into(),
        }
    }

    pub fn primary_path(&self) -> &Path {
        &self.primary
    }

    pub fn fallback_path(&self) -> &Path {
        &self.fallback
    }

    /// The primary file wins whenever it exists, even if it turns out to be
    /// unreadable.
    fn read_location(&self) -> Option<&Path> {
        [self.primary.as_path(), self.fallback.as_path()]
            .into_iter()
            .find(|p| self.fs.is_file(p))
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> ActiveState {
        let Some(path) = self.read_location() else {
            debug!("no persisted state found");
            return ActiveState::default();
        };

        let parsed = self
            .fs
            .read_to_string(path)
            .and_then(|text| {
                serde_json::from_str::<Option<ActiveState>>(&text)
                    .with_context(|| format!("parsing {:?}", path))
            });

        match parsed {
            Ok(state) => state.unwrap_or_default(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable state file");
                ActiveState::default()
            }
        }
    }

    fn save(&self, state: &ActiveState) -> Result<()> {
        let json = serde_json::to_vec(state)
            .context("serializing active state")
            .map_err(AdapterError::Persistence)?;
        self.fs
            .write(&self.primary, &json)
            .map_err(AdapterError::Persistence)?;
        debug!(path = %self.primary.display(), ?state.active_strategy, "state saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn store(fs: &MockFileSystem) -> FileStateStore {
        FileStateStore::with_paths(
            Arc::new(fs.clone()),
            "/appdata/zapret-gui/last-state.json",
            "/install/last-state.json",
        )
    }

    #[test]
    fn nothing_persisted_loads_default() {
        let fs = MockFileSystem::new();
        assert_eq!(store(&fs).load(), ActiveState::default());
    }

    #[test]
    fn fallback_is_read_when_primary_is_absent() {
        let fs = MockFileSystem::new();
        fs.add_file("/install/last-state.json", r#"{"activeStrategy":"general (ALT).bat"}"#);
        assert_eq!(store(&fs).load(), ActiveState::active("general (ALT).bat"));
    }

    #[test]
    fn primary_shadows_fallback() {
        let fs = MockFileSystem::new();
        fs.add_file("/install/last-state.json", r#"{"activeStrategy":"old.bat"}"#);
        fs.add_file("/appdata/zapret-gui/last-state.json", r#"{"activeStrategy":"new.bat"}"#);
        assert_eq!(store(&fs).load(), ActiveState::active("new.bat"));
    }

    #[test]
    fn corrupt_file_loads_default() {
        let fs = MockFileSystem::new();
        fs.add_file("/appdata/zapret-gui/last-state.json", "{not json");
        assert_eq!(store(&fs).load(), ActiveState::default());
    }

    #[test]
    fn json_null_loads_default() {
        let fs = MockFileSystem::new();
        fs.add_file("/appdata/zapret-gui/last-state.json", "null");
        assert_eq!(store(&fs).load(), ActiveState::default());
    }

    #[test]
    fn save_writes_primary_only_and_omits_null() {
        let fs = MockFileSystem::new();
        let store = store(&fs);

        store.save(&ActiveState::cleared()).unwrap();

        let text = fs
            .read_to_string(Path::new("/appdata/zapret-gui/last-state.json"))
            .unwrap();
        assert_eq!(text, "{}");
        assert!(!fs.exists(Path::new("/install/last-state.json")));
    }

    #[test]
    fn write_failure_is_reported_as_persistence_error() {
        let fs = MockFileSystem::new();
        fs.set_fail_writes(true);
        let err = store(&fs).save(&ActiveState::active("x.bat")).unwrap_err();
        assert_eq!(err.kind(), "persistence_failed");
    }
}
