use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::types::Skeleton;

/// Seam to the external extraction collaborator. The pipeline never looks
/// at class files itself; it consumes whatever structural skeleton the
/// source hands over.
pub trait SkeletonSource {
    fn skeleton(&self) -> Result<Skeleton>;
}

/// Skeleton source backed by a JSON file, the interchange format written
/// by the bytecode extractor.
pub struct JsonSkeletonSource {
    path: PathBuf,
}

impl JsonSkeletonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SkeletonSource for JsonSkeletonSource {
    fn skeleton(&self) -> Result<Skeleton> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read skeleton '{}'", self.path.display()))?;
        let skeleton: Skeleton = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse skeleton '{}'", self.path.display()))?;
        Ok(skeleton)
    }
}

/// An already-built skeleton is its own source.
impl SkeletonSource for Skeleton {
    fn skeleton(&self) -> Result<Skeleton> {
        Ok(self.clone())
    }
}
