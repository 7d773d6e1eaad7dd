use super::*;
use crate::build::{CameraPlacement, bind_gradient_material, build_torus, place_rig, reset_scene};
use crate::color::map_colors;
use crate::foundation::core::EulerXyz;
use crate::scene::{ObjectKind, Scene};

const BLACK_BG: [u8; 4] = [0, 0, 0, 255];

fn gradient_scene(c1: &str, c2: &str) -> Scene {
    let mut scene = Scene::base();
    reset_scene(&mut scene);
    let torus = build_torus(&mut scene, EulerXyz::new(0.0, 0.0, 1.5708)).unwrap();
    let ends = map_colors(&c1.into(), &c2.into()).unwrap();
    bind_gradient_material(&mut scene, torus, ends).unwrap();
    place_rig(
        &mut scene,
        CameraPlacement {
            location: Vec3::new(5.0, -3.0, 4.0),
            field_of_view: 1.047,
        },
        Vec3::new(0.05, 0.0, 2.0),
    )
    .unwrap();
    scene
}

fn settings(width: u32, height: u32, supersample: u32) -> RenderSettings {
    RenderSettings {
        resolution: Resolution::new(width, height).unwrap(),
        supersample,
        background_rgba: BLACK_BG,
    }
}

fn backend() -> CpuBackend {
    CpuBackend::new(CpuBackendOpts { threads: Some(2) }).unwrap()
}

fn pixel(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

#[test]
fn fov_spans_the_larger_axis() {
    assert_eq!(vertical_fov(1.0, 0.5), 1.0);
    assert_eq!(vertical_fov(1.0, 1.0), 1.0);
    let v = vertical_fov(1.047, 2.5);
    assert!(v < 1.047 && v > 0.0);
    assert!((((v * 0.5).tan() * 2.5) - (1.047_f32 * 0.5).tan()).abs() < 1e-5);
}

#[test]
fn zero_threads_is_rejected() {
    let err = build_thread_pool(Some(0)).unwrap_err();
    assert!(matches!(err, ForgeError::Config(_)));
    assert_eq!(
        CpuBackend::new(CpuBackendOpts { threads: Some(3) })
            .unwrap()
            .threads(),
        3
    );
}

#[test]
fn gradient_torus_shows_both_endpoint_colors() {
    let scene = gradient_scene("#FF0000", "#0000FF");
    let frame_scene = FrameScene::extract(&scene).unwrap();
    let frame = backend()
        .render_frame(&frame_scene, &settings(80, 32, 1))
        .unwrap();

    assert_eq!((frame.width, frame.height), (80, 32));
    assert_eq!(frame.data.len(), 80 * 32 * 4);
    assert!(!frame.premultiplied);

    let reddish = frame
        .data
        .chunks_exact(4)
        .filter(|p| i32::from(p[0]) > i32::from(p[2]) + 20)
        .count();
    let bluish = frame
        .data
        .chunks_exact(4)
        .filter(|p| i32::from(p[2]) > i32::from(p[0]) + 20)
        .count();
    assert!(reddish > 0, "no red side visible");
    assert!(bluish > 0, "no blue side visible");

    // Torus is centered; the corners only see the background.
    assert_eq!(pixel(&frame, 0, 0), BLACK_BG);
    assert_eq!(pixel(&frame, 79, 31), BLACK_BG);
    assert_ne!(pixel(&frame, 40, 16), BLACK_BG);
}

#[test]
fn empty_frame_is_pure_background() {
    let mut scene = Scene::base();
    scene.remove_objects_of_kind(ObjectKind::Mesh);
    let frame_scene = FrameScene::extract(&scene).unwrap();
    assert!(frame_scene.draws.is_empty());

    let bg = [30, 60, 90, 255];
    let frame = backend()
        .render_frame(
            &frame_scene,
            &RenderSettings {
                background_rgba: bg,
                ..settings(16, 8, 2)
            },
        )
        .unwrap();
    for px in frame.data.chunks_exact(4) {
        for (got, want) in px.iter().zip(bg) {
            assert!(got.abs_diff(want) <= 1, "{px:?} vs {bg:?}");
        }
    }
}

#[test]
fn flat_default_material_is_neutral() {
    let scene = Scene::base();
    let frame_scene = FrameScene::extract(&scene).unwrap();
    assert!(matches!(frame_scene.draws[0].surface, Surface::Flat(_)));
    let frame = backend()
        .render_frame(&frame_scene, &settings(32, 32, 1))
        .unwrap();
    let lit: Vec<&[u8]> = frame
        .data
        .chunks_exact(4)
        .filter(|p| p[..3] != BLACK_BG[..3])
        .collect();
    assert!(!lit.is_empty());
    for p in lit {
        assert!(p[0].abs_diff(p[1]) <= 1 && p[1].abs_diff(p[2]) <= 1, "{p:?}");
    }
}

#[test]
fn supersampling_keeps_output_size() {
    let scene = gradient_scene("#00FF00", "#FFFF00");
    let frame_scene = FrameScene::extract(&scene).unwrap();
    let frame = backend()
        .render_frame(&frame_scene, &settings(20, 10, 3))
        .unwrap();
    assert_eq!((frame.width, frame.height), (20, 10));
    assert_eq!(frame.data.len(), 20 * 10 * 4);
}

#[test]
fn out_of_range_supersample_fails() {
    let scene = Scene::base();
    let frame_scene = FrameScene::extract(&scene).unwrap();
    let mut cpu = backend();
    assert!(cpu.render_frame(&frame_scene, &settings(8, 8, 0)).is_err());
    assert!(
        cpu.render_frame(&frame_scene, &settings(8, 8, MAX_SUPERSAMPLE + 1))
            .is_err()
    );
}

#[test]
fn camera_on_its_target_fails() {
    let scene = Scene::base();
    let mut frame_scene = FrameScene::extract(&scene).unwrap();
    frame_scene.camera.target = frame_scene.camera.eye;
    let err = backend()
        .render_frame(&frame_scene, &settings(8, 8, 1))
        .unwrap_err();
    assert!(err.to_string().contains("coincide"));
}

#[test]
fn roughness_controls_highlight_tightness() {
    assert!(blinn_exponent(0.1) > blinn_exponent(0.5));
    assert!(blinn_exponent(0.5) > blinn_exponent(1.0));
    assert_eq!(blinn_exponent(1.0), 1.0);
}

#[test]
fn tonemap_is_bounded_and_monotonic() {
    let a = tonemap(Vec3::splat(0.2));
    let b = tonemap(Vec3::splat(2.0));
    assert!(a.x < b.x);
    assert!(tonemap(Vec3::splat(1e6)).x <= 1.0);
    assert_eq!(tonemap(Vec3::splat(-1.0)), Vec3::ZERO);
}
