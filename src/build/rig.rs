use crate::build::geometry::TORUS_LOCATION;
use crate::foundation::core::Vec3;
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::scene::{DepthOfField, ObjectData, ObjectKind, Scene};

pub const FOCUS_DISTANCE: f32 = 5.0;
pub const APERTURE_FSTOP: f32 = 4.0;

/// Range of the light slider exposed to the outer UI.
pub const LIGHT_SLIDER_RANGE: std::ops::RangeInclusive<f32> = 0.0..=100.0;
const LIGHT_SLIDER_SCALE: f32 = 20.0;
const LIGHT_HEIGHT: f32 = 2.0;

/// Camera inputs that vary per invocation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPlacement {
    pub location: Vec3,
    /// Radians, along the larger image axis.
    pub field_of_view: f32,
}

impl CameraPlacement {
    pub fn validate(&self) -> ForgeResult<()> {
        if !self.location.is_finite() {
            return Err(ForgeError::invalid_parameter(
                "camera location must be finite",
            ));
        }
        if !(self.field_of_view.is_finite()
            && self.field_of_view > 0.0
            && self.field_of_view < std::f32::consts::PI)
        {
            return Err(ForgeError::invalid_parameter(format!(
                "field of view {} must lie in (0, pi) radians",
                self.field_of_view
            )));
        }
        if self.location.distance(TORUS_LOCATION) < 1e-3 {
            return Err(ForgeError::invalid_parameter(
                "camera cannot sit on its aim point",
            ));
        }
        Ok(())
    }
}

/// Map a light slider value to a world position: x follows the slider, y and z are fixed.
pub fn light_location(slider: f32) -> ForgeResult<Vec3> {
    if !slider.is_finite() || !LIGHT_SLIDER_RANGE.contains(&slider) {
        return Err(ForgeError::invalid_parameter(format!(
            "light slider {slider} is outside {LIGHT_SLIDER_RANGE:?}"
        )));
    }
    Ok(Vec3::new(slider / LIGHT_SLIDER_SCALE, 0.0, LIGHT_HEIGHT))
}

/// Move the scene's camera and light. Nothing is created or destroyed.
#[tracing::instrument(skip(scene))]
pub fn place_rig(scene: &mut Scene, camera: CameraPlacement, light: Vec3) -> ForgeResult<()> {
    camera.validate()?;
    if !light.is_finite() {
        return Err(ForgeError::invalid_parameter("light location must be finite"));
    }

    let first_of = |kind: ObjectKind| {
        scene
            .objects()
            .iter()
            .find(|o| o.kind() == kind)
            .map(|o| o.id)
    };
    let cam_id = first_of(ObjectKind::Camera)
        .ok_or_else(|| ForgeError::missing_rig("scene has no camera"))?;
    let light_id = first_of(ObjectKind::Light)
        .ok_or_else(|| ForgeError::missing_rig("scene has no light"))?;

    if let Some(obj) = scene.object_mut(cam_id) {
        obj.placement.location = camera.location;
        if let ObjectData::Camera(cam) = &mut obj.data {
            cam.fov = camera.field_of_view;
            cam.target = TORUS_LOCATION;
            cam.dof = DepthOfField {
                enabled: true,
                focus_distance: FOCUS_DISTANCE,
                aperture_fstop: APERTURE_FSTOP,
            };
        }
    }
    if let Some(obj) = scene.object_mut(light_id) {
        obj.placement.location = light;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/build/rig.rs"]
mod tests;
