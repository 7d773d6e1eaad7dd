use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::ForgeConfig;
use crate::foundation::error::ForgeResult;
use crate::pipeline::{GenerateRequest, generate};
use crate::render::{RenderBackend, create_backend};
use crate::scene::{ProgressCallback, Scene};

/// Single-slot execution queue around one scene.
///
/// The scene, backend and configuration sit behind one mutex, so concurrent `generate` calls
/// run strictly one after another. The progress listener is kept separately so it can be
/// swapped while a render is in flight; the swap applies to the next call.
pub struct Studio {
    slot: Mutex<Slot>,
    listener: Mutex<Option<ProgressCallback>>,
}

struct Slot {
    scene: Scene,
    backend: Box<dyn RenderBackend>,
    config: ForgeConfig,
}

impl Studio {
    /// Validate `config`, create its backend and start from the default scene.
    pub fn new(config: ForgeConfig) -> ForgeResult<Self> {
        config.validate()?;
        let backend = create_backend(config.render.backend, config.render.threads)?;
        Ok(Self::with_backend(Scene::base(), backend, config))
    }

    pub fn with_backend(scene: Scene, backend: Box<dyn RenderBackend>, config: ForgeConfig) -> Self {
        Self {
            slot: Mutex::new(Slot {
                scene,
                backend,
                config,
            }),
            listener: Mutex::new(None),
        }
    }

    /// Callback fired once per completed frame of every later `generate` call.
    pub fn set_progress_listener(&self, listener: ProgressCallback) {
        *self.listener.lock().unwrap_or_else(PoisonError::into_inner) = Some(listener);
    }

    pub fn clear_progress_listener(&self) {
        *self.listener.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Run one invocation; blocks while another invocation holds the scene.
    pub fn generate(&self, request: &GenerateRequest) -> ForgeResult<PathBuf> {
        let listener = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let mut slot = self.lock_slot();
        let Slot {
            scene,
            backend,
            config,
        } = &mut *slot;
        generate(scene, request, config, backend.as_mut(), listener.as_ref())
    }

    /// Read access to the scene between invocations.
    pub fn with_scene<R>(&self, f: impl FnOnce(&Scene) -> R) -> R {
        f(&self.lock_slot().scene)
    }

    pub fn config(&self) -> ForgeConfig {
        self.lock_slot().config.clone()
    }

    pub fn backend_name(&self) -> &'static str {
        self.lock_slot().backend.name()
    }

    // A panic mid-invocation leaves a half-built scene; the next reset cleans it up.
    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "../tests/unit/studio.rs"]
mod tests;
