#![forbid(unsafe_code)]
//! Parametric gradient-torus renderer.
//!
//! Each call to [`generate`] clears previously generated geometry, builds a torus with a
//! two-color gradient material, places the camera and light, renders one frame and returns the
//! path of the written image.

pub mod build;
pub mod color;
pub mod config;
pub mod foundation;
pub mod pipeline;
pub mod render;
pub mod scene;
pub mod shader;
pub mod studio;

pub use color::{ColorSpec, GradientEndpoints, map_colors};
pub use config::{ForgeConfig, LightConfig, OutputConfig, RenderConfig};
pub use foundation::core::{EulerXyz, FrameIndex, Placement, Resolution, RgbaColor, Vec3};
pub use foundation::error::{ForgeError, ForgeResult};
pub use pipeline::{GeneratePlan, GenerateRequest, generate};
pub use render::{
    BackendKind, CpuBackend, CpuBackendOpts, FrameRGBA, FrameScene, OutputFormat, RenderBackend,
    RenderJob, RenderSettings, create_backend, execute_render_job, resolve_artifact,
};
pub use scene::{ProgressCallback, ProgressHooks, ProgressSubscription, Scene};
pub use studio::Studio;
