//! The generate pipeline: validate inputs, rebuild the scene, render, resolve the artifact.

use std::path::PathBuf;

use crate::build::{
    CameraPlacement, bind_gradient_material, build_torus, light_location, place_rig, reset_scene,
};
use crate::color::{ColorSpec, GradientEndpoints, map_colors};
use crate::config::ForgeConfig;
use crate::foundation::core::{EulerXyz, FrameIndex, Vec3};
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::render::{RenderBackend, RenderJob, execute_render_job, resolve_artifact};
use crate::scene::{ProgressCallback, Scene};

/// Arguments of one generate invocation. Missing JSON fields take the defaults below.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateRequest {
    pub color1: ColorSpec,
    pub color2: ColorSpec,
    pub camera_x: f32,
    pub camera_y: f32,
    pub camera_z: f32,
    /// Radians.
    pub field_of_view: f32,
    pub torus_rot_x: f32,
    pub torus_rot_y: f32,
    pub torus_rot_z: f32,
    /// Light slider in `0..=100`; the configured default applies when absent.
    pub light: Option<f32>,
    /// Artifact file stem; the configured stem applies when absent.
    pub output_stem: Option<String>,
}

impl Default for GenerateRequest {
    fn default() -> Self {
        Self {
            color1: ColorSpec::new("#FF0000"),
            color2: ColorSpec::new("#0000FF"),
            camera_x: 5.0,
            camera_y: -3.0,
            camera_z: 4.0,
            field_of_view: 1.047,
            torus_rot_x: 0.0,
            torus_rot_y: 0.0,
            torus_rot_z: 1.5708,
            light: None,
            output_stem: None,
        }
    }
}

/// A request whose every input has been checked; building from it only fails on scene state.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratePlan {
    pub endpoints: GradientEndpoints,
    pub rotation: EulerXyz,
    pub camera: CameraPlacement,
    pub light: Vec3,
    pub job: RenderJob,
}

impl GenerateRequest {
    pub fn new(color1: impl Into<String>, color2: impl Into<String>) -> Self {
        Self {
            color1: ColorSpec::new(color1),
            color2: ColorSpec::new(color2),
            ..Self::default()
        }
    }

    pub fn with_camera(mut self, x: f32, y: f32, z: f32) -> Self {
        (self.camera_x, self.camera_y, self.camera_z) = (x, y, z);
        self
    }

    pub fn with_field_of_view(mut self, radians: f32) -> Self {
        self.field_of_view = radians;
        self
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        (self.torus_rot_x, self.torus_rot_y, self.torus_rot_z) = (x, y, z);
        self
    }

    pub fn with_light(mut self, slider: f32) -> Self {
        self.light = Some(slider);
        self
    }

    pub fn with_output_stem(mut self, stem: impl Into<String>) -> Self {
        self.output_stem = Some(stem.into());
        self
    }

    /// Check every input against `config` without touching any scene.
    pub fn plan(&self, config: &ForgeConfig) -> ForgeResult<GeneratePlan> {
        for (name, value) in [
            ("camera_x", self.camera_x),
            ("camera_y", self.camera_y),
            ("camera_z", self.camera_z),
            ("field_of_view", self.field_of_view),
            ("torus_rot_x", self.torus_rot_x),
            ("torus_rot_y", self.torus_rot_y),
            ("torus_rot_z", self.torus_rot_z),
        ] {
            if !value.is_finite() {
                return Err(ForgeError::invalid_parameter(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        let endpoints = map_colors(&self.color1, &self.color2)?;
        let camera = CameraPlacement {
            location: Vec3::new(self.camera_x, self.camera_y, self.camera_z),
            field_of_view: self.field_of_view,
        };
        camera.validate()?;
        let light = light_location(self.light.unwrap_or(config.light.default_slider))?;

        config.validate()?;
        let job = RenderJob {
            resolution: config.resolution()?,
            format: config.render.format,
            output_path: config.output_path(self.output_stem.as_deref())?,
            frame_index: FrameIndex(0),
            supersample: config.render.supersample,
            background_rgba: config.render.background_rgba,
        };

        Ok(GeneratePlan {
            endpoints,
            rotation: EulerXyz::new(self.torus_rot_x, self.torus_rot_y, self.torus_rot_z),
            camera,
            light,
            job,
        })
    }
}

/// Run one full rebuild-and-render cycle against `scene` and return the artifact path.
///
/// Inputs are validated before the scene is touched, so a rejected request leaves it exactly
/// as it was. Any later failure aborts at once; the next call's reset restores a clean scene.
#[tracing::instrument(skip_all, fields(color1 = %request.color1, color2 = %request.color2))]
pub fn generate(
    scene: &mut Scene,
    request: &GenerateRequest,
    config: &ForgeConfig,
    backend: &mut dyn RenderBackend,
    listener: Option<&ProgressCallback>,
) -> ForgeResult<PathBuf> {
    let plan = request.plan(config)?;

    reset_scene(scene);
    let torus = build_torus(scene, plan.rotation)?;
    bind_gradient_material(scene, torus, plan.endpoints)?;
    place_rig(scene, plan.camera, plan.light)?;

    let path = execute_render_job(scene, &plan.job, backend, listener)?;
    resolve_artifact(&path)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
