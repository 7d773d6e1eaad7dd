use crate::foundation::core::{Mat4, RgbaColor, Vec3};
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::scene::{DepthOfField, Mesh, ObjectKind, Scene};
use crate::shader::{Bsdf, CompiledShader, SurfaceParams};

/// How a draw item's surface is shaded.
#[derive(Clone, Debug)]
pub enum Surface {
    Nodes(CompiledShader),
    Flat(Bsdf),
}

#[derive(Clone, Debug)]
pub struct DrawItem<'a> {
    pub name: &'a str,
    pub mesh: &'a Mesh,
    /// Object-to-world transform.
    pub world: Mat4,
    pub surface: Surface,
}

#[derive(Clone, Copy, Debug)]
pub struct FrameCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov: f32,
    pub sensor_width_mm: f32,
    pub clip_start: f32,
    pub clip_end: f32,
    pub dof: Option<DepthOfField>,
}

#[derive(Clone, Copy, Debug)]
pub struct FrameLight {
    pub position: Vec3,
    /// Linear light color scaled by radiant intensity (W/sr).
    pub intensity: Vec3,
}

/// Immutable, render-ready snapshot of a [`Scene`]. Shader graphs are compiled here.
#[derive(Clone, Debug)]
pub struct FrameScene<'a> {
    pub camera: FrameCamera,
    pub lights: Vec<FrameLight>,
    pub ambient: Vec3,
    pub draws: Vec<DrawItem<'a>>,
}

impl<'a> FrameScene<'a> {
    pub fn extract(scene: &'a Scene) -> ForgeResult<Self> {
        let cam_obj = scene
            .objects()
            .iter()
            .find(|o| o.kind() == ObjectKind::Camera)
            .ok_or_else(|| ForgeError::missing_rig("scene has no camera to render from"))?;
        let cam = cam_obj
            .as_camera()
            .ok_or_else(|| ForgeError::missing_rig("camera object carries no camera data"))?;
        let camera = FrameCamera {
            eye: cam_obj.placement.location,
            target: cam.target,
            fov: cam.fov,
            sensor_width_mm: cam.sensor_width_mm,
            clip_start: cam.clip_start,
            clip_end: cam.clip_end,
            dof: cam.dof.enabled.then_some(cam.dof),
        };

        let lights = scene
            .objects()
            .iter()
            .filter_map(|o| {
                let l = o.as_light()?;
                let intensity = l.color.rgb() * (l.power_watts / (4.0 * std::f32::consts::PI));
                Some(FrameLight {
                    position: o.placement.location,
                    intensity,
                })
            })
            .collect();

        let mut draws = Vec::new();
        for obj in scene.objects() {
            let Some(mesh) = obj.as_mesh() else {
                continue;
            };
            let material = mesh
                .material_slots
                .first()
                .copied()
                .flatten()
                .and_then(|id| scene.material(id));
            let surface = match material {
                Some(m) if m.use_nodes => Surface::Nodes(CompiledShader::compile(&m.graph)?),
                Some(m) => Surface::Flat(flat_bsdf(m.diffuse_color)),
                None => Surface::Flat(flat_bsdf(SurfaceParams::default().base_color)),
            };
            draws.push(DrawItem {
                name: &obj.name,
                mesh: &mesh.mesh,
                world: obj.placement.to_mat4(),
                surface,
            });
        }

        Ok(Self {
            camera,
            lights,
            ambient: scene.world().ambient,
            draws,
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.draws.iter().map(|d| d.mesh.triangle_count()).sum()
    }
}

fn flat_bsdf(base_color: RgbaColor) -> Bsdf {
    let p = SurfaceParams::default();
    Bsdf {
        base_color,
        roughness: p.roughness,
        specular: p.specular,
        metallic: p.metallic,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/extract.rs"]
mod tests;
