pub mod badge;
pub mod html;
pub mod text;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use cohesia_core::{AnalysisError, IndexReport, Matrix, Renderer};

/// Stylesheet published next to the rendered pages.
const STYLESHEET: &str = include_str!("../assets/style.css");

/// Renders the validated index and matrix into static report pages plus
/// the status badge and stylesheet.
#[derive(Debug, Default)]
pub struct PageRenderer;

impl Renderer for PageRenderer {
    fn render(
        &self,
        report: &IndexReport,
        matrix: &Matrix,
        params: &BTreeMap<String, String>,
        out_dir: &Path,
    ) -> Result<(), AnalysisError> {
        write(out_dir.join("index.html"), html::index_page(report, params))?;
        write(out_dir.join("matrix.html"), html::matrix_page(matrix, params))?;
        write(out_dir.join("badge.svg"), badge::render(report.score))?;
        write(out_dir.join("style.css"), STYLESHEET.to_string())?;
        Ok(())
    }
}

fn write(path: PathBuf, content: String) -> Result<(), AnalysisError> {
    fs::write(&path, content).map_err(|source| AnalysisError::Persistence { path, source })
}
