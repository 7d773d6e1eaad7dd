//! Rendering: scene extraction, the CPU rasterizer, and the driver that persists frames.

pub mod artifact;
pub mod backend;
pub mod cpu;
mod dof;
pub mod driver;
pub mod extract;

pub use artifact::resolve_artifact;
pub use backend::{BackendKind, FrameRGBA, RenderBackend, RenderSettings, create_backend};
pub use cpu::{CpuBackend, CpuBackendOpts, MAX_SUPERSAMPLE};
pub use driver::{OutputFormat, RenderJob, execute_render_job};
pub use extract::{DrawItem, FrameCamera, FrameLight, FrameScene, Surface};
