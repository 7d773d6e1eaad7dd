use super::*;
use crate::foundation::core::Vec3;

fn camera() -> FrameCamera {
    FrameCamera {
        eye: Vec3::ZERO,
        target: Vec3::X,
        fov: 1.047,
        sensor_width_mm: 36.0,
        clip_start: 0.1,
        clip_end: 100.0,
        dof: None,
    }
}

fn dof(fstop: f32) -> DepthOfField {
    DepthOfField {
        enabled: true,
        focus_distance: 5.0,
        aperture_fstop: fstop,
    }
}

fn lens(fstop: f32) -> LensBlur {
    LensBlur::new(
        &camera(),
        dof(fstop),
        Resolution::new(1000, 400).unwrap(),
        16.0,
    )
    .unwrap()
}

#[test]
fn disabled_or_degenerate_lens_is_none() {
    let res = Resolution::new(100, 100).unwrap();
    let off = DepthOfField {
        enabled: false,
        ..dof(4.0)
    };
    assert!(LensBlur::new(&camera(), off, res, 8.0).is_none());
    assert!(LensBlur::new(&camera(), dof(0.0), res, 8.0).is_none());
    let too_close = DepthOfField {
        focus_distance: 0.001,
        ..dof(4.0)
    };
    assert!(LensBlur::new(&camera(), too_close, res, 8.0).is_none());
}

#[test]
fn focus_plane_is_sharp_and_blur_grows_away_from_it() {
    let l = lens(4.0);
    assert!(l.radius(5.0) < 1e-4);
    assert!(l.radius(7.0) > l.radius(6.0));
    assert!(l.radius(2.0) > l.radius(4.0));
    assert!(l.radius(f32::INFINITY) >= l.radius(50.0));
}

#[test]
fn wider_aperture_blurs_more_and_is_capped() {
    assert!(lens(1.0).radius(10.0) > lens(8.0).radius(10.0));
    assert_eq!(lens(0.01).radius(f32::INFINITY), 16.0);
}

#[test]
fn uniform_field_stays_uniform() {
    let c = Vec4::new(0.2, 0.4, 0.6, 1.0);
    let color = vec![c; 64];
    let depth = vec![f32::INFINITY; 64];
    let out = gather_blur(&color, &depth, 8, &lens(0.5));
    for px in out {
        assert!((px - c).abs().max_element() < 1e-5);
    }
}

#[test]
fn far_blur_does_not_leak_onto_sharp_foreground() {
    let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
    let blue = Vec4::new(0.0, 0.0, 1.0, 1.0);
    let mut color = vec![blue; 81];
    let mut depth = vec![f32::INFINITY; 81];
    color[40] = red;
    depth[40] = 5.0;

    let out = gather_blur(&color, &depth, 9, &lens(0.5));
    assert_eq!(out[40], red);
    assert!(out[41].x < 1e-6);
}

#[test]
fn defocused_detail_spreads_to_neighbors() {
    let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
    let blue = Vec4::new(0.0, 0.0, 1.0, 1.0);
    let mut color = vec![blue; 81];
    let depth = vec![f32::INFINITY; 81];
    color[40] = red;

    let out = gather_blur(&color, &depth, 9, &lens(0.5));
    assert!(out[40].x < 1.0);
    assert!(out[41].x > 0.0);
}
