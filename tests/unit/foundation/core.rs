use super::*;

#[test]
fn resolution_rejects_zero_axis() {
    assert!(Resolution::new(0, 10).is_err());
    assert!(Resolution::new(10, 0).is_err());
    let r = Resolution::new(1000, 400).unwrap();
    assert_eq!(r.pixel_count(), 400_000);
    assert!((r.aspect() - 2.5).abs() < 1e-6);
    assert_eq!(r.scaled(2), Resolution::new(2000, 800).unwrap());
}

#[test]
fn rgba8_rescale_is_exact_at_the_ends() {
    let c = RgbaColor::from_rgba8(255, 0, 128, 255);
    assert_eq!(c.r, 1.0);
    assert_eq!(c.g, 0.0);
    assert!((c.b - 128.0 / 255.0).abs() < 1e-7);
    assert_eq!(c.to_rgba8(), [255, 0, 128, 255]);
}

#[test]
fn lerp_clamps_parameter() {
    let a = RgbaColor::rgba(1.0, 0.0, 0.0, 1.0);
    let b = RgbaColor::rgba(0.0, 0.0, 1.0, 1.0);
    assert_eq!(a.lerp(b, -1.0), a);
    assert_eq!(a.lerp(b, 2.0), b);
    let mid = a.lerp(b, 0.5);
    assert!((mid.r - 0.5).abs() < 1e-6 && (mid.b - 0.5).abs() < 1e-6);
}

#[test]
fn quarter_turn_about_z_maps_x_to_y() {
    let rot = EulerXyz::new(0.0, 0.0, std::f32::consts::FRAC_PI_2).to_mat3();
    let v = rot * Vec3::X;
    assert!((v - Vec3::Y).length() < 1e-6);
}

#[test]
fn euler_applies_x_before_z() {
    let half = std::f32::consts::FRAC_PI_2;
    let rot = EulerXyz::new(half, 0.0, half).to_mat3();
    // X turns +Y into +Z, Z leaves +Z alone.
    let v = rot * Vec3::Y;
    assert!((v - Vec3::Z).length() < 1e-6);
}

#[test]
fn placement_rotates_then_translates() {
    let p = Placement {
        location: Vec3::new(0.0, 1.0, 1.0),
        rotation: EulerXyz::new(0.0, 0.0, std::f32::consts::FRAC_PI_2),
    };
    let v = p.to_mat4().transform_point3(Vec3::X);
    assert!((v - Vec3::new(0.0, 2.0, 1.0)).length() < 1e-6);
}
