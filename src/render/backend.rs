use crate::foundation::core::Resolution;
use crate::foundation::error::ForgeResult;
use crate::render::cpu::{CpuBackend, CpuBackendOpts};
use crate::render::extract::FrameScene;

/// A rendered frame as straight-alpha RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// Per-frame settings every backend honors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSettings {
    pub resolution: Resolution,
    /// Samples per pixel along each axis (1 disables antialiasing).
    pub supersample: u32,
    /// Straight-alpha sRGB color behind the scene.
    pub background_rgba: [u8; 4],
}

/// Something that turns an extracted scene into pixels.
///
/// Implementations run synchronously and may parallelize internally. Errors are opaque to the
/// pipeline; the render driver wraps them as render failures.
pub trait RenderBackend: Send {
    fn name(&self) -> &'static str;

    fn render_frame(
        &mut self,
        frame: &FrameScene<'_>,
        settings: &RenderSettings,
    ) -> anyhow::Result<FrameRGBA>;
}

/// Available backend kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Software rasterizer, always available.
    #[default]
    Cpu,
}

/// Create a rendering backend implementation.
pub fn create_backend(
    kind: BackendKind,
    threads: Option<usize>,
) -> ForgeResult<Box<dyn RenderBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(CpuBackend::new(CpuBackendOpts { threads })?)),
    }
}
