use crate::foundation::core::Vec3;
use crate::foundation::error::{ForgeError, ForgeResult};

/// Triangle mesh in object space.
///
/// `generated` holds per-vertex texture coordinates normalized to the object's bounding box,
/// so every axis spans `[0, 1]` over the mesh. Gradient sources read them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub generated: Vec<Vec3>,
    /// Counter-clockwise when seen from outside the surface.
    pub triangles: Vec<[u32; 3]>,
}

/// Parameters of a ring torus lying in the object's XY plane, centered at its origin.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TorusParams {
    pub major_radius: f32,
    pub minor_radius: f32,
    pub major_segments: u32,
    pub minor_segments: u32,
}

impl TorusParams {
    fn validate(&self) -> ForgeResult<()> {
        if !(self.major_radius.is_finite() && self.minor_radius.is_finite()) {
            return Err(ForgeError::geometry("torus radii must be finite"));
        }
        if self.minor_radius <= 0.0 || self.major_radius <= self.minor_radius {
            return Err(ForgeError::geometry(
                "torus requires 0 < minor_radius < major_radius",
            ));
        }
        if self.major_segments < 3 || self.minor_segments < 3 {
            return Err(ForgeError::geometry(
                "torus requires at least 3 segments on each ring",
            ));
        }
        Ok(())
    }
}

impl Mesh {
    /// Build a closed torus. Quads are split into two triangles each.
    pub fn torus(p: TorusParams) -> ForgeResult<Self> {
        p.validate()?;

        let nu = p.major_segments as usize;
        let nv = p.minor_segments as usize;
        let mut positions = Vec::with_capacity(nu * nv);
        let mut normals = Vec::with_capacity(nu * nv);

        for i in 0..nu {
            let u = (i as f32 / nu as f32) * std::f32::consts::TAU;
            let (su, cu) = u.sin_cos();
            for j in 0..nv {
                let v = (j as f32 / nv as f32) * std::f32::consts::TAU;
                let (sv, cv) = v.sin_cos();
                let ring = p.major_radius + p.minor_radius * cv;
                positions.push(Vec3::new(ring * cu, ring * su, p.minor_radius * sv));
                normals.push(Vec3::new(cv * cu, cv * su, sv));
            }
        }

        let idx = |i: usize, j: usize| -> u32 { ((i % nu) * nv + (j % nv)) as u32 };
        let mut triangles = Vec::with_capacity(nu * nv * 2);
        for i in 0..nu {
            for j in 0..nv {
                let a = idx(i, j);
                let b = idx(i + 1, j);
                let c = idx(i + 1, j + 1);
                let d = idx(i, j + 1);
                triangles.push([a, b, c]);
                triangles.push([a, c, d]);
            }
        }

        let mut mesh = Self {
            positions,
            normals,
            generated: Vec::new(),
            triangles,
        };
        mesh.generated = mesh.generated_coords();
        Ok(mesh)
    }

    /// Axis-aligned bounds `(min, max)`; `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        )
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    fn generated_coords(&self) -> Vec<Vec3> {
        let Some((lo, hi)) = self.bounds() else {
            return Vec::new();
        };
        let extent = (hi - lo).max(Vec3::splat(f32::EPSILON));
        self.positions.iter().map(|&p| (p - lo) / extent).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/mesh.rs"]
mod tests;
