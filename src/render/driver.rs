use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::{FrameIndex, Resolution};
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::foundation::math::mul_div255_u8;
use crate::render::backend::{FrameRGBA, RenderBackend, RenderSettings};
use crate::render::extract::FrameScene;
use crate::scene::{ProgressCallback, Scene};

/// Encoded image format of a render artifact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// One still-frame render request.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderJob {
    pub resolution: Resolution,
    pub format: OutputFormat,
    pub output_path: PathBuf,
    pub frame_index: FrameIndex,
    pub supersample: u32,
    pub background_rgba: [u8; 4],
}

impl RenderJob {
    pub fn settings(&self) -> RenderSettings {
        RenderSettings {
            resolution: self.resolution,
            supersample: self.supersample,
            background_rgba: self.background_rgba,
        }
    }
}

/// Render one frame of `scene` and persist it at `job.output_path`.
///
/// A progress reporter is registered on the scene's hooks for the duration of the call and
/// forwards each completed frame to `listener`. On any error no file is left at the output
/// path.
#[tracing::instrument(skip_all, fields(
    backend = backend.name(),
    frame = job.frame_index.0,
    out = %job.output_path.display(),
))]
pub fn execute_render_job(
    scene: &Scene,
    job: &RenderJob,
    backend: &mut dyn RenderBackend,
    listener: Option<&ProgressCallback>,
) -> ForgeResult<PathBuf> {
    remove_stale_artifact(&job.output_path)?;
    if let Some(parent) = job.output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))
            .map_err(ForgeError::render)?;
    }

    let frame_index = job.frame_index;
    let forward = listener.cloned();
    let reporter: ProgressCallback = Arc::new(move || {
        tracing::debug!(frame = frame_index.0, "frame complete");
        if let Some(listener) = &forward {
            listener();
        }
    });
    let _subscription = scene.hooks().subscribe(reporter);

    let frame_scene = FrameScene::extract(scene)?;
    let started = std::time::Instant::now();
    let frame = backend
        .render_frame(&frame_scene, &job.settings())
        .map_err(ForgeError::render)?;
    tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "frame rendered");

    if frame.width != job.resolution.width
        || frame.height != job.resolution.height
        || frame.data.len() != job.resolution.pixel_count() * 4
    {
        return Err(ForgeError::render(anyhow::anyhow!(
            "backend '{}' returned a {}x{} frame for a {}x{} job",
            backend.name(),
            frame.width,
            frame.height,
            job.resolution.width,
            job.resolution.height
        )));
    }
    scene.hooks().notify_frame_complete();

    persist_frame(&frame, job).map_err(ForgeError::render)?;
    tracing::info!(path = %job.output_path.display(), "render artifact written");
    Ok(job.output_path.clone())
}

fn remove_stale_artifact(path: &Path) -> ForgeResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::warn!(path = %path.display(), "removed stale render artifact");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ForgeError::render(
            anyhow::Error::new(e)
                .context(format!("remove stale artifact '{}'", path.display())),
        )),
    }
}

fn persist_frame(frame: &FrameRGBA, job: &RenderJob) -> anyhow::Result<()> {
    let file_name = job
        .output_path
        .file_name()
        .with_context(|| format!("output path '{}' has no file name", job.output_path.display()))?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(format!(".{}.tmp", std::process::id()));
    let tmp_path = job.output_path.with_file_name(tmp_name);
    let mut tmp = TempFileGuard(Some(tmp_path.clone()));

    let straight = if frame.premultiplied {
        unpremultiply(&frame.data)
    } else {
        frame.data.clone()
    };
    let written = match job.format {
        OutputFormat::Png => image::save_buffer_with_format(
            &tmp_path,
            &straight,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            job.format.image_format(),
        ),
        OutputFormat::Jpeg => image::save_buffer_with_format(
            &tmp_path,
            &flatten_rgb(&straight, job.background_rgba),
            frame.width,
            frame.height,
            image::ColorType::Rgb8,
            job.format.image_format(),
        ),
    };
    written.with_context(|| format!("write {:?} '{}'", job.format, tmp_path.display()))?;

    std::fs::rename(&tmp_path, &job.output_path).with_context(|| {
        format!(
            "move '{}' to '{}'",
            tmp_path.display(),
            job.output_path.display()
        )
    })?;
    tmp.0 = None;
    Ok(())
}

/// Composite straight-alpha RGBA over an opaque copy of `background`, dropping alpha.
pub(crate) fn flatten_rgb(rgba: &[u8], background: [u8; 4]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let a = u16::from(px[3]);
        let inv = 255 - a;
        for c in 0..3 {
            let fg = mul_div255_u8(u16::from(px[c]), a);
            let bg = mul_div255_u8(u16::from(background[c]), inv);
            out.push(fg.saturating_add(bg));
        }
    }
    out
}

fn unpremultiply(rgba: &[u8]) -> Vec<u8> {
    let mut out = rgba.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/driver.rs"]
mod tests;
