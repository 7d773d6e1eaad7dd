use super::*;
use crate::build::geometry::build_torus;
use crate::build::reset::reset_scene;
use crate::color::map_colors;
use crate::foundation::core::{EulerXyz, RgbaColor};

fn scene_with_torus() -> (Scene, ObjectId) {
    let mut scene = Scene::base();
    reset_scene(&mut scene);
    let torus = build_torus(&mut scene, EulerXyz::default()).unwrap();
    (scene, torus)
}

fn ramp_stops(scene: &Scene, id: MaterialId) -> (RgbaColor, RgbaColor) {
    let graph = &scene.material(id).unwrap().graph;
    let ShaderNode::ColorRamp(ramp) = &graph
        .find(|n| matches!(n, ShaderNode::ColorRamp(_)))
        .unwrap()
        .node
    else {
        unreachable!()
    };
    (ramp.stops()[0].color, ramp.stops()[1].color)
}

#[test]
fn binds_four_node_chain_to_slot_zero() {
    let (mut scene, torus) = scene_with_torus();
    let ends = map_colors(&"#FF0000".into(), &"#0000FF".into()).unwrap();
    let id = bind_gradient_material(&mut scene, torus, ends).unwrap();

    let slots = &scene.object(torus).unwrap().as_mesh().unwrap().material_slots;
    assert_eq!(slots.as_slice(), &[Some(id)]);

    let material = scene.material(id).unwrap();
    assert!(material.use_nodes);
    assert_eq!(material.name, GRADIENT_MATERIAL_NAME);
    let kinds: Vec<&str> = material
        .graph
        .nodes()
        .iter()
        .map(|n| n.node.kind_name())
        .collect();
    assert_eq!(
        kinds,
        vec!["GradientSource", "ColorRamp", "SurfaceShader", "OutputSink"]
    );
    assert_eq!(material.graph.links().len(), 3);
    assert!(material.graph.validate().is_ok());

    assert_eq!(
        ramp_stops(&scene, id),
        (
            RgbaColor::rgba(1.0, 0.0, 0.0, 1.0),
            RgbaColor::rgba(0.0, 0.0, 1.0, 1.0)
        )
    );
}

#[test]
fn reversed_colors_swap_ramp_stops() {
    let ends = map_colors(&"#FF0000".into(), &"#0000FF".into()).unwrap();

    let (mut a, ta) = scene_with_torus();
    let ma = bind_gradient_material(&mut a, ta, ends).unwrap();
    let (mut b, tb) = scene_with_torus();
    let mb = bind_gradient_material(&mut b, tb, ends.reversed()).unwrap();

    let (a0, a1) = ramp_stops(&a, ma);
    let (b0, b1) = ramp_stops(&b, mb);
    assert_eq!((a0, a1), (b1, b0));
    assert_eq!(a.objects(), b.objects());
}

#[test]
fn rebinding_replaces_slot_instead_of_appending() {
    let (mut scene, torus) = scene_with_torus();
    let ends = map_colors(&"red".into(), &"blue".into()).unwrap();
    bind_gradient_material(&mut scene, torus, ends).unwrap();
    let second = bind_gradient_material(&mut scene, torus, ends).unwrap();
    let slots = &scene.object(torus).unwrap().as_mesh().unwrap().material_slots;
    assert_eq!(slots.as_slice(), &[Some(second)]);
    assert_eq!(scene.purge_orphan_materials(), 1);
}

#[test]
fn refuses_non_mesh_targets() {
    let mut scene = Scene::base();
    let camera = scene.find_by_name("Camera").unwrap().id;
    let ends = map_colors(&"red".into(), &"blue".into()).unwrap();
    let err = bind_gradient_material(&mut scene, camera, ends).unwrap_err();
    assert!(matches!(err, ForgeError::GeometryBuildFailure(_)));
}

#[test]
fn graph_rebuild_discards_previous_nodes() {
    let mut graph = Material::new("m").graph;
    let ends = map_colors(&"red".into(), &"blue".into()).unwrap();
    build_gradient_graph(&mut graph, ends).unwrap();
    build_gradient_graph(&mut graph, ends).unwrap();
    assert_eq!(graph.nodes().len(), 4);
    assert_eq!(graph.links().len(), 3);
}
