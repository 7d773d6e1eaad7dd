use crate::foundation::core::{EulerXyz, Placement, Vec3};
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::scene::{Mesh, MeshData, ObjectData, ObjectId, ObjectKind, Scene, TorusParams};

/// Fixed tessellation of the generated torus.
pub const TORUS: TorusParams = TorusParams {
    major_radius: 1.5,
    minor_radius: 0.75,
    major_segments: 48 * 4,
    minor_segments: 12 * 4,
};

pub const TORUS_LOCATION: Vec3 = Vec3::new(0.0, 1.0, 1.0);

pub const TORUS_NAME: &str = "Torus";

/// Create the torus with `rotation` applied at creation time and return the new active object.
#[tracing::instrument(skip(scene))]
pub fn build_torus(scene: &mut Scene, rotation: EulerXyz) -> ForgeResult<ObjectId> {
    if !rotation.is_finite() {
        return Err(ForgeError::invalid_parameter("torus rotation must be finite"));
    }

    let mesh = Mesh::torus(TORUS)?;
    tracing::debug!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "torus tessellated"
    );

    scene.add_object(
        TORUS_NAME,
        Placement {
            location: TORUS_LOCATION,
            rotation,
        },
        ObjectData::Mesh(MeshData {
            mesh,
            material_slots: Vec::new(),
        }),
    );

    let active = scene
        .active_object()
        .ok_or_else(|| ForgeError::geometry("no active object after adding the torus"))?;
    match scene.object(active).map(|o| o.kind()) {
        Some(ObjectKind::Mesh) => Ok(active),
        other => Err(ForgeError::geometry(format!(
            "active object after adding the torus is {other:?}, expected a mesh"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/build/geometry.rs"]
mod tests;
