use std::path::{Path, PathBuf};

use crate::foundation::error::{ForgeError, ForgeResult};

/// Confirm a render artifact exists and holds data, and hand back its path.
pub fn resolve_artifact(path: &Path) -> ForgeResult<PathBuf> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(path.to_path_buf()),
        _ => Err(ForgeError::ArtifactMissing(path.to_path_buf())),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/artifact.rs"]
mod tests;
