use std::path::{Path, PathBuf};

use crate::build::rig::LIGHT_SLIDER_RANGE;
use crate::foundation::core::Resolution;
use crate::foundation::error::{ForgeError, ForgeResult};
use crate::render::{BackendKind, MAX_SUPERSAMPLE, OutputFormat};

/// Process-wide settings, loaded from JSON. Every field has a default.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForgeConfig {
    pub render: RenderConfig,
    pub output: OutputConfig,
    pub light: LightConfig,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub backend: BackendKind,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub supersample: u32,
    /// Worker threads for the backend; `None` lets rayon decide.
    pub threads: Option<usize>,
    /// Straight-alpha sRGB background.
    pub background_rgba: [u8; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Cpu,
            width: 1000,
            height: 400,
            format: OutputFormat::Png,
            supersample: 2,
            threads: None,
            background_rgba: [13, 13, 13, 255],
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub file_stem: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir().join("torusforge"),
            file_stem: "render".to_owned(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightConfig {
    /// Light slider value used when a request does not carry one.
    pub default_slider: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            default_slider: 1.0,
        }
    }
}

impl ForgeConfig {
    pub fn from_path(path: &Path) -> ForgeResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ForgeError::config(format!("read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
            .map_err(|e| ForgeError::config(format!("config '{}': {e}", path.display())))
    }

    pub fn from_json_str(text: &str) -> ForgeResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| ForgeError::config(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> ForgeResult<()> {
        Resolution::new(self.render.width, self.render.height)?;
        if !(1..=MAX_SUPERSAMPLE).contains(&self.render.supersample) {
            return Err(ForgeError::config(format!(
                "render.supersample must be within 1..={MAX_SUPERSAMPLE}, got {}",
                self.render.supersample
            )));
        }
        if self.render.threads == Some(0) {
            return Err(ForgeError::config("render.threads must be >= 1 when set"));
        }
        validate_file_stem(&self.output.file_stem)?;
        let slider = self.light.default_slider;
        if !slider.is_finite() || !LIGHT_SLIDER_RANGE.contains(&slider) {
            return Err(ForgeError::config(format!(
                "light.default_slider {slider} is outside {LIGHT_SLIDER_RANGE:?}"
            )));
        }
        Ok(())
    }

    pub fn resolution(&self) -> ForgeResult<Resolution> {
        Resolution::new(self.render.width, self.render.height)
    }

    /// Artifact path for `stem` (or the configured default stem) with the format's extension.
    pub fn output_path(&self, stem: Option<&str>) -> ForgeResult<PathBuf> {
        let stem = stem.unwrap_or(&self.output.file_stem);
        validate_file_stem(stem)?;
        Ok(self
            .output
            .dir
            .join(format!("{stem}.{}", self.render.format.extension())))
    }
}

fn validate_file_stem(stem: &str) -> ForgeResult<()> {
    if stem.is_empty()
        || stem.starts_with('.')
        || stem.contains(['/', '\\'])
        || stem.chars().any(char::is_control)
    {
        return Err(ForgeError::config(format!(
            "output file stem '{stem}' must be a plain, non-hidden file name"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
