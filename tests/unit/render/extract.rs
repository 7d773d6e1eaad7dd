use super::*;
use crate::build::{bind_gradient_material, build_torus, reset_scene};
use crate::color::map_colors;
use crate::foundation::core::EulerXyz;
use crate::foundation::error::ForgeError;
use crate::shader::ShaderNode;

fn torus_scene() -> (Scene, crate::shader::MaterialId) {
    let mut scene = Scene::base();
    reset_scene(&mut scene);
    let torus = build_torus(&mut scene, EulerXyz::default()).unwrap();
    let ends = map_colors(&"red".into(), &"blue".into()).unwrap();
    let material = bind_gradient_material(&mut scene, torus, ends).unwrap();
    (scene, material)
}

#[test]
fn node_material_is_compiled_once_per_extract() {
    let (scene, _) = torus_scene();
    let frame = FrameScene::extract(&scene).unwrap();
    assert_eq!(frame.draws.len(), 1);
    assert_eq!(frame.draws[0].name, "Torus");
    let Surface::Nodes(shader) = &frame.draws[0].surface else {
        panic!("gradient material should shade through its nodes");
    };
    assert_eq!(shader.op_count(), 4);
    assert_eq!(frame.triangle_count(), frame.draws[0].mesh.triangle_count());
}

#[test]
fn lights_carry_radiant_intensity() {
    let scene = Scene::base();
    let frame = FrameScene::extract(&scene).unwrap();
    assert_eq!(frame.lights.len(), 1);
    let expected = 1000.0 / (4.0 * std::f32::consts::PI);
    assert!((frame.lights[0].intensity.x - expected).abs() < 1e-3);
    assert_eq!(frame.ambient, scene.world().ambient);
    assert!(frame.camera.dof.is_none());
}

#[test]
fn broken_graph_is_a_link_failure() {
    let (mut scene, material) = torus_scene();
    let graph = &mut scene.material_mut(material).unwrap().graph;
    let sink = graph
        .find(|n| matches!(n, ShaderNode::OutputSink))
        .unwrap()
        .id;
    assert!(graph.remove(sink));

    let err = FrameScene::extract(&scene).unwrap_err();
    assert!(matches!(err, ForgeError::ShaderLinkFailure(_)));
}

#[test]
fn scene_without_camera_cannot_be_extracted() {
    let err = FrameScene::extract(&Scene::empty()).unwrap_err();
    assert!(matches!(err, ForgeError::MissingRigObject(_)));
}
