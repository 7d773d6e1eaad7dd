use crate::foundation::core::{Placement, RgbaColor, Vec3};
use crate::scene::hooks::ProgressHooks;
use crate::scene::mesh::Mesh;
use crate::shader::material::{Material, MaterialId};

/// Stable handle to a scene object. Ids are never reused within one scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Mesh,
    Camera,
    Light,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    pub mesh: Mesh,
    /// Slot 0 is the primary surface.
    pub material_slots: Vec<Option<MaterialId>>,
}

/// Thin-lens depth-of-field settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthOfField {
    pub enabled: bool,
    /// Distance from the camera to the plane in perfect focus, in meters.
    pub focus_distance: f32,
    pub aperture_fstop: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraData {
    /// Field of view in radians along the larger image axis.
    pub fov: f32,
    pub sensor_width_mm: f32,
    pub clip_start: f32,
    pub clip_end: f32,
    /// World point the camera aims at.
    pub target: Vec3,
    pub dof: DepthOfField,
}

impl Default for CameraData {
    fn default() -> Self {
        Self {
            fov: 0.691_150_4,
            sensor_width_mm: 36.0,
            clip_start: 0.1,
            clip_end: 100.0,
            target: Vec3::ZERO,
            dof: DepthOfField {
                enabled: false,
                focus_distance: 10.0,
                aperture_fstop: 2.8,
            },
        }
    }
}

/// Omnidirectional point light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightData {
    pub power_watts: f32,
    pub color: RgbaColor,
}

impl Default for LightData {
    fn default() -> Self {
        Self {
            power_watts: 1000.0,
            color: RgbaColor::WHITE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ObjectData {
    Mesh(MeshData),
    Camera(CameraData),
    Light(LightData),
}

impl ObjectData {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Mesh(_) => ObjectKind::Mesh,
            Self::Camera(_) => ObjectKind::Camera,
            Self::Light(_) => ObjectKind::Light,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub placement: Placement,
    pub data: ObjectData,
}

impl SceneObject {
    pub fn kind(&self) -> ObjectKind {
        self.data.kind()
    }

    pub fn as_mesh(&self) -> Option<&MeshData> {
        match &self.data {
            ObjectData::Mesh(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_camera(&self) -> Option<&CameraData> {
        match &self.data {
            ObjectData::Camera(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_light(&self) -> Option<&LightData> {
        match &self.data {
            ObjectData::Light(l) => Some(l),
            _ => None,
        }
    }
}

/// Environment lighting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct World {
    /// Uniform ambient radiance, linear.
    pub ambient: Vec3,
}

impl Default for World {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.05),
        }
    }
}

/// The mutable scene the pipeline rebuilds on every invocation.
///
/// Every mutation bumps [`Scene::revision`], so callers can tell whether anything changed.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    materials: Vec<(MaterialId, Material)>,
    active: Option<ObjectId>,
    next_id: u64,
    revision: u64,
    world: World,
    hooks: ProgressHooks,
}

impl Scene {
    /// A scene without any objects.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The default startup scene: a camera, a point light and a unit cube with its own material.
    pub fn base() -> Self {
        let mut scene = Self::empty();
        scene.add_object(
            "Camera",
            Placement::at(Vec3::new(7.358_9, -6.925_8, 4.958_3)),
            ObjectData::Camera(CameraData::default()),
        );
        scene.add_object(
            "Light",
            Placement::at(Vec3::new(4.076_2, 1.005_4, 5.903_9)),
            ObjectData::Light(LightData::default()),
        );
        let material = scene.add_material(Material::new("Material"));
        let cube = cube_mesh();
        scene.add_object(
            "Cube",
            Placement::default(),
            ObjectData::Mesh(MeshData {
                mesh: cube,
                material_slots: vec![Some(material)],
            }),
        );
        scene
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn hooks(&self) -> &ProgressHooks {
        &self.hooks
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Mutable access; counts as a mutation.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        let obj = self.objects.iter_mut().find(|o| o.id == id)?;
        self.revision += 1;
        Some(obj)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn count_of(&self, kind: ObjectKind) -> usize {
        self.objects.iter().filter(|o| o.kind() == kind).count()
    }

    pub fn active_object(&self) -> Option<ObjectId> {
        self.active
    }

    /// Insert an object and make it active. A taken name gets a `.001`-style suffix.
    pub fn add_object(
        &mut self,
        name: &str,
        placement: Placement,
        data: ObjectData,
    ) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        let name = self.unique_name(name);
        self.objects.push(SceneObject {
            id,
            name,
            placement,
            data,
        });
        self.active = Some(id);
        self.revision += 1;
        id
    }

    /// Remove every object of `kind`; returns how many went away.
    pub fn remove_objects_of_kind(&mut self, kind: ObjectKind) -> usize {
        let before = self.objects.len();
        self.objects.retain(|o| o.kind() != kind);
        let removed = before - self.objects.len();
        if removed > 0 {
            if let Some(active) = self.active
                && self.object(active).is_none()
            {
                self.active = None;
            }
            self.revision += 1;
        }
        removed
    }

    pub fn materials(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials.iter().map(|(id, m)| (*id, m))
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials
            .iter()
            .find(|(mid, _)| *mid == id)
            .map(|(_, m)| m)
    }

    /// Mutable access; counts as a mutation.
    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        let (_, m) = self.materials.iter_mut().find(|(mid, _)| *mid == id)?;
        self.revision += 1;
        Some(m)
    }

    pub fn add_material(&mut self, mut material: Material) -> MaterialId {
        let id = MaterialId(self.next_id);
        self.next_id += 1;
        material.name = self.unique_material_name(&material.name);
        self.materials.push((id, material));
        self.revision += 1;
        id
    }

    /// Drop materials no object slot refers to; returns how many went away.
    pub fn purge_orphan_materials(&mut self) -> usize {
        let used: Vec<MaterialId> = self
            .objects
            .iter()
            .filter_map(SceneObject::as_mesh)
            .flat_map(|m| m.material_slots.iter().flatten().copied())
            .collect();
        let before = self.materials.len();
        self.materials.retain(|(id, _)| used.contains(id));
        let removed = before - self.materials.len();
        if removed > 0 {
            self.revision += 1;
        }
        removed
    }

    fn unique_name(&self, base: &str) -> String {
        dedupe_name(base, |n| self.objects.iter().any(|o| o.name == n))
    }

    fn unique_material_name(&self, base: &str) -> String {
        dedupe_name(base, |n| self.materials.iter().any(|(_, m)| m.name == n))
    }
}

fn dedupe_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_owned();
    }
    (1u32..)
        .map(|i| format!("{base}.{i:03}"))
        .find(|n| !taken(n))
        .unwrap_or_else(|| base.to_owned())
}

/// Axis-aligned cube with half-extent 1, flat-shaded.
fn cube_mesh() -> Mesh {
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::NEG_Y, Vec3::Z),
        (Vec3::Y, Vec3::NEG_X, Vec3::Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::X, Vec3::NEG_Y),
    ];
    let mut mesh = Mesh::default();
    for (n, u, v) in faces {
        let base = mesh.positions.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = n + u * su + v * sv;
            mesh.positions.push(p);
            mesh.normals.push(n);
            mesh.generated.push((p + Vec3::ONE) * 0.5);
        }
        mesh.triangles.push([base, base + 1, base + 2]);
        mesh.triangles.push([base, base + 2, base + 3]);
    }
    mesh
}

#[cfg(test)]
#[path = "../../tests/unit/scene/world.rs"]
mod tests;
