use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{LumenError, LumenResult};

/// Where a texture's encoded image bytes come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Path relative to the loader's assets root.
    Path(String),
    /// Encoded bytes already in memory. `label` is used in diagnostics only.
    Memory {
        /// Human-readable name for logs and errors.
        label: String,
        /// Encoded image bytes.
        bytes: Arc<[u8]>,
    },
}

impl ImageSource {
    /// Source resolved against the loader's assets root.
    pub fn path(rel: impl Into<String>) -> Self {
        Self::Path(rel.into())
    }

    /// Source backed by in-memory encoded bytes.
    pub fn memory(label: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Memory {
            label: label.into(),
            bytes: bytes.into(),
        }
    }

    /// Identifier used in logs and error messages.
    pub fn label(&self) -> &str {
        match self {
            Self::Path(p) => p,
            Self::Memory { label, .. } => label,
        }
    }

    /// Fetch the encoded bytes, resolving paths under `root`.
    pub fn read_bytes(&self, root: &Path) -> LumenResult<Arc<[u8]>> {
        match self {
            Self::Memory { bytes, .. } => Ok(bytes.clone()),
            Self::Path(rel) => {
                let norm = normalize_rel_path(rel)?;
                let path = root.join(Path::new(&norm));
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("read image bytes from '{}'", path.display()))?;
                Ok(bytes.into())
            }
        }
    }
}

impl From<&str> for ImageSource {
    fn from(rel: &str) -> Self {
        Self::path(rel)
    }
}

impl From<String> for ImageSource {
    fn from(rel: String) -> Self {
        Self::Path(rel)
    }
}

/// Normalize and validate asset-root-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> LumenResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(LumenError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(LumenError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(LumenError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(LumenError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
