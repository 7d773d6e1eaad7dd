use crate::color::GradientEndpoints;
use crate::foundation::core::Vec2;
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::scene::{ObjectData, ObjectId, Scene};
use crate::shader::{
    ColorRamp, GradientKind, InputSocket, Material, MaterialId, OutputSocket, RampInterpolation,
    ShaderGraph, ShaderNode, SurfaceParams,
};

pub const GRADIENT_MATERIAL_NAME: &str = "GradientMaterial";

/// Build a fresh gradient material for `object` and bind it to material slot 0.
///
/// The material is never shared: any previous slot-0 material is replaced, and the default
/// nodes a new material comes with are removed before the gradient chain is built.
#[tracing::instrument(skip(scene, endpoints))]
pub fn bind_gradient_material(
    scene: &mut Scene,
    object: ObjectId,
    endpoints: GradientEndpoints,
) -> ForgeResult<MaterialId> {
    let is_mesh = scene
        .object(object)
        .is_some_and(|o| o.as_mesh().is_some());
    if !is_mesh {
        return Err(ForgeError::geometry(format!(
            "cannot bind a material to {object:?}: not a mesh in this scene"
        )));
    }

    let mut material = Material::new(GRADIENT_MATERIAL_NAME);
    material.use_nodes = true;
    build_gradient_graph(&mut material.graph, endpoints)?;
    tracing::debug!(
        nodes = material.graph.nodes().len(),
        links = material.graph.links().len(),
        "gradient graph built"
    );

    let id = scene.add_material(material);
    let Some(obj) = scene.object_mut(object) else {
        return Err(ForgeError::geometry(format!("{object:?} vanished")));
    };
    if let ObjectData::Mesh(mesh) = &mut obj.data {
        match mesh.material_slots.first_mut() {
            Some(slot) => *slot = Some(id),
            None => mesh.material_slots.push(Some(id)),
        }
    }
    Ok(id)
}

/// Replace the contents of `graph` with gradient -> ramp -> surface -> output.
pub fn build_gradient_graph(
    graph: &mut ShaderGraph,
    endpoints: GradientEndpoints,
) -> ForgeResult<()> {
    graph.clear();

    let gradient = graph.add(
        ShaderNode::GradientSource {
            kind: GradientKind::Linear,
        },
        Vec2::new(0.0, 0.0),
    );
    let ramp = graph.add(
        ShaderNode::ColorRamp(ColorRamp::two_stop(
            endpoints.start,
            endpoints.end,
            RampInterpolation::Linear,
        )),
        Vec2::new(200.0, 0.0),
    );
    let surface = graph.add(
        ShaderNode::SurfaceShader(SurfaceParams::default()),
        Vec2::new(400.0, 0.0),
    );
    let output = graph.add(ShaderNode::OutputSink, Vec2::new(600.0, 0.0));

    graph.link(gradient, OutputSocket::Color, ramp, InputSocket::Fac)?;
    graph.link(ramp, OutputSocket::Color, surface, InputSocket::BaseColor)?;
    graph.link(surface, OutputSocket::Bsdf, output, InputSocket::Surface)?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/build/material.rs"]
mod tests;
