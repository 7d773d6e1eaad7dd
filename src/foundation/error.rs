use std::path::PathBuf;

/// Result alias used across the crate.
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Failure reasons surfaced by the scene-synthesis pipeline.
///
/// Every variant aborts the current invocation. Only bad user input is recoverable; everything
/// else points at a corrupted base scene, a broken shader topology or a backend failure.
#[derive(thiserror::Error, Debug)]
pub enum ForgeError {
    /// A color specification could not be parsed.
    #[error("invalid color spec: {0}")]
    InvalidColorSpec(String),

    /// A scalar invocation argument was out of range or not finite.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Mesh creation did not leave an active mesh object behind.
    #[error("geometry build failure: {0}")]
    GeometryBuildFailure(String),

    /// A shader graph link referenced a port its node does not have, or the topology is broken.
    #[error("shader link failure: {0}")]
    ShaderLinkFailure(String),

    /// The base scene lacks the camera or the light.
    #[error("missing rig object: {0}")]
    MissingRigObject(String),

    /// The render backend failed.
    #[error("render failure: {0:#}")]
    RenderFailure(#[source] anyhow::Error),

    /// The render claimed success but no usable artifact exists.
    #[error("artifact missing: '{}'", .0.display())]
    ArtifactMissing(PathBuf),

    /// Configuration could not be loaded or is inconsistent.
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ForgeError {
    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColorSpec(msg.into())
    }

    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::GeometryBuildFailure(msg.into())
    }

    pub fn shader_link(msg: impl Into<String>) -> Self {
        Self::ShaderLinkFailure(msg.into())
    }

    pub fn missing_rig(msg: impl Into<String>) -> Self {
        Self::MissingRigObject(msg.into())
    }

    pub fn render(err: impl Into<anyhow::Error>) -> Self {
        Self::RenderFailure(err.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// `true` when the caller should re-prompt for input rather than treat the failure as fatal.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidColorSpec(_) | Self::InvalidParameter(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
