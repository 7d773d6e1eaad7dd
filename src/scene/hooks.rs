use std::sync::{Arc, Mutex, PoisonError};

/// Zero-argument callback fired once per completed frame.
pub type ProgressCallback = Arc<dyn Fn() + Send + Sync>;

/// Registry of render-progress handlers owned by a [`Scene`](crate::scene::Scene).
///
/// Handlers can only be added through [`ProgressHooks::subscribe`], which hands back a guard; the
/// handler stays registered exactly as long as the guard lives.
#[derive(Default)]
pub struct ProgressHooks {
    table: Mutex<HookTable>,
}

#[derive(Default)]
struct HookTable {
    next_id: u64,
    handlers: Vec<(u64, ProgressCallback)>,
}

impl ProgressHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` until the returned subscription is dropped.
    #[must_use = "the handler is removed as soon as the subscription is dropped"]
    pub fn subscribe(&self, callback: ProgressCallback) -> ProgressSubscription<'_> {
        let mut table = self.lock();
        let id = table.next_id;
        table.next_id += 1;
        table.handlers.push((id, callback));
        ProgressSubscription { hooks: self, id }
    }

    /// Number of live registrations.
    pub fn registered(&self) -> usize {
        self.lock().handlers.len()
    }

    /// Invoke every registered handler once, on the calling thread.
    pub(crate) fn notify_frame_complete(&self) {
        // Snapshot so handlers may inspect the registry without deadlocking.
        let handlers: Vec<ProgressCallback> =
            self.lock().handlers.iter().map(|(_, h)| h.clone()).collect();
        for handler in handlers {
            handler();
        }
    }

    fn unsubscribe(&self, id: u64) {
        let mut table = self.lock();
        table.handlers.retain(|(hid, _)| *hid != id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HookTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ProgressHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressHooks")
            .field("registered", &self.registered())
            .finish()
    }
}

/// Scoped registration returned by [`ProgressHooks::subscribe`].
pub struct ProgressSubscription<'a> {
    hooks: &'a ProgressHooks,
    id: u64,
}

impl Drop for ProgressSubscription<'_> {
    fn drop(&mut self) {
        self.hooks.unsubscribe(self.id);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/hooks.rs"]
mod tests;
