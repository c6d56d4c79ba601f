use crate::registry::Registry;
use std::sync::{LockResult, Mutex, MutexGuard};

/// Shared by every handler. Registration and listing both go through the
/// one lock, so a listing never sees a half-registered school and two
/// registrations never race on an id.
pub struct AppState {
    registry: Mutex<Registry>,
}

impl AppState {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Mutex::new(registry),
        }
    }

    pub fn registry(&self) -> LockResult<MutexGuard<'_, Registry>> {
        self.registry.lock()
    }
}
