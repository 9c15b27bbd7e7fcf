// src/state/mod.rs

//! Durable "last active strategy" record.
//!
//! Two storage modes, mirroring how the rest of the tool can run with or
//! without a disk:
//! - [`FileStateStore`]: JSON file under the user's config directory, with a
//!   read-only fallback next to the executable.
//! - [`MemoryStateStore`]: in-process only (tests, embedding).

use crate::errors::Result;
use crate::types::ActiveState;

pub mod file_store;
pub mod memory;

pub use file_store::FileStateStore;
pub use memory::MemoryStateStore;

/// Storage for [`ActiveState`].
///
/// `load` never fails: missing or unreadable data yields the default state.
/// `save` reports failure as `AdapterError::Persistence`, which callers log
/// and otherwise ignore.
pub trait StateStore: Send + Sync {
    fn load(&self) -> ActiveState;
    fn save(&self, state: &ActiveState) -> Result<()>;
}
