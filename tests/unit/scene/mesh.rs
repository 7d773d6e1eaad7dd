use super::*;

fn small() -> TorusParams {
    TorusParams {
        major_radius: 1.5,
        minor_radius: 0.75,
        major_segments: 16,
        minor_segments: 8,
    }
}

#[test]
fn torus_counts_match_tessellation() {
    let m = Mesh::torus(small()).unwrap();
    assert_eq!(m.vertex_count(), 16 * 8);
    assert_eq!(m.triangle_count(), 16 * 8 * 2);
    assert_eq!(m.normals.len(), m.vertex_count());
    assert_eq!(m.generated.len(), m.vertex_count());
    assert!(
        m.triangles
            .iter()
            .flatten()
            .all(|&i| (i as usize) < m.vertex_count())
    );
}

#[test]
fn torus_bounds_follow_radii() {
    let m = Mesh::torus(small()).unwrap();
    let (lo, hi) = m.bounds().unwrap();
    assert!((hi.x - 2.25).abs() < 1e-4);
    assert!((lo.x + 2.25).abs() < 1e-4);
    assert!(hi.z <= 0.75 + 1e-4 && lo.z >= -0.75 - 1e-4);
}

#[test]
fn generated_coords_span_unit_cube() {
    let m = Mesh::torus(small()).unwrap();
    let (lo, hi) = m
        .generated
        .iter()
        .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(lo, hi), &g| {
            (lo.min(g), hi.max(g))
        });
    assert!(lo.abs().max_element() < 1e-5);
    assert!((hi - Vec3::ONE).abs().max_element() < 1e-5);
}

#[test]
fn triangles_face_outward() {
    let m = Mesh::torus(small()).unwrap();
    for tri in &m.triangles {
        let [a, b, c] = tri.map(|i| m.positions[i as usize]);
        let face = (b - a).cross(c - a);
        let avg_n: Vec3 = tri.iter().map(|&i| m.normals[i as usize]).sum();
        assert!(face.dot(avg_n) > 0.0);
    }
}

#[test]
fn rejects_degenerate_parameters() {
    let mut p = small();
    p.minor_segments = 2;
    assert!(matches!(
        Mesh::torus(p),
        Err(ForgeError::GeometryBuildFailure(_))
    ));

    let mut p = small();
    p.minor_radius = 2.0;
    assert!(Mesh::torus(p).is_err());

    let mut p = small();
    p.major_radius = f32::NAN;
    assert!(Mesh::torus(p).is_err());
}
