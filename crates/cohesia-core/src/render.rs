use std::collections::BTreeMap;
use std::path::Path;

use crate::error::AnalysisError;
use crate::index::IndexReport;
use crate::matrix::Matrix;

/// Seam to the rendering collaborator: a deterministic transform from
/// validated structured data to human-facing artifacts. The pipeline
/// invokes it only after the schema gate has passed, and treats any
/// failure as fatal.
pub trait Renderer {
    fn render(
        &self,
        report: &IndexReport,
        matrix: &Matrix,
        params: &BTreeMap<String, String>,
        out_dir: &Path,
    ) -> Result<(), AnalysisError>;
}
