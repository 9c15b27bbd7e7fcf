// src/state/memory.rs

use std::sync::{Arc, Mutex};

use crate::errors::Result;
use crate::state::StateStore;
use crate::types::ActiveState;

/// In-memory [`StateStore`]; lost when the process exits.
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    slot: Arc<Mutex<ActiveState>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(initial: ActiveState) -> Self {
        Self {
            slot: Arc::new(Mutex::new(initial)),
        }
    }

    /// Current value without going through the trait.
    pub fn snapshot(&self) -> ActiveState {
        self.slot.lock().unwrap().clone()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> ActiveState {
        self.snapshot()
    }

    fn save(&self, state: &ActiveState) -> Result<()> {
        *self.slot.lock().unwrap() = state.clone();
        Ok(())
    }
}
