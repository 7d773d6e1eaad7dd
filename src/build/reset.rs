use crate::scene::{ObjectKind, Scene};

/// What a reset removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResetReport {
    pub meshes_removed: usize,
    pub materials_purged: usize,
}

/// Remove every mesh object, whoever created it, then purge materials left without users.
///
/// Cameras and lights are untouched. Running it on a scene without meshes is a no-op.
#[tracing::instrument(skip(scene), fields(revision = scene.revision()))]
pub fn reset_scene(scene: &mut Scene) -> ResetReport {
    let meshes_removed = scene.remove_objects_of_kind(ObjectKind::Mesh);
    let materials_purged = scene.purge_orphan_materials();
    tracing::debug!(meshes_removed, materials_purged, "scene reset");
    ResetReport {
        meshes_removed,
        materials_purged,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/build/reset.rs"]
mod tests;
