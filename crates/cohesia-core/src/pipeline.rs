use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::error::AnalysisError;
use crate::index::{self, IndexReport};
use crate::matrix::{self, Matrix};
use crate::metric;
use crate::render::Renderer;
use crate::source::SkeletonSource;
use crate::types::{MetricScoreSet, Skeleton};
use crate::validate;

/// States of one analysis run, in order. A run either walks the whole
/// chain to `Done` or stops at the first fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fresh,
    Extracted,
    MetricsComputed,
    Aggregated,
    Validated,
    Rendered,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fresh => "fresh",
            Stage::Extracted => "extracted",
            Stage::MetricsComputed => "metrics-computed",
            Stage::Aggregated => "aggregated",
            Stage::Validated => "validated",
            Stage::Rendered => "rendered",
            Stage::Done => "done",
        };
        write!(f, "{name}")
    }
}

/// The terminal failure state of a run: the underlying error together
/// with the last state the pipeline had reached when it occurred.
#[derive(Debug, Error)]
#[error("analysis failed in state '{stage}'")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub error: AnalysisError,
}

fn fail(stage: Stage) -> impl Fn(AnalysisError) -> StageError {
    move |error| StageError { stage, error }
}

/// What a completed run hands back to the caller.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub report: IndexReport,
    pub matrix: Matrix,
    pub out_dir: PathBuf,
}

/// Coordinates one full analysis run: extraction, concurrent metric
/// computation, aggregation, schema validation, rendering. Owns the
/// ordering and failure propagation across all of them.
pub struct Pipeline<S, R> {
    source: S,
    renderer: R,
    config: Config,
}

impl<S: SkeletonSource, R: Renderer> Pipeline<S, R> {
    pub fn new(source: S, renderer: R, config: Config) -> Self {
        Self {
            source,
            renderer,
            config,
        }
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full analysis into a fresh output directory.
    pub fn run(&self, out_dir: &Path) -> Result<AnalysisOutcome, StageError> {
        let skeleton = self.extract(out_dir).map_err(fail(Stage::Fresh))?;
        log::info!("extracted skeleton with {} classes", skeleton.classes.len());

        let sets = self
            .compute_metrics(&skeleton, out_dir)
            .map_err(fail(Stage::Extracted))?;
        log::info!("computed {} metric score set(s)", sets.len());

        // Both are pure functions of already-immutable inputs.
        let (report, matrix) = rayon::join(
            || index::build_report(&sets, &self.config.thresholds),
            || matrix::build(&skeleton),
        );

        let (index_value, matrix_value) =
            validate_artifacts(&report, &matrix).map_err(fail(Stage::Aggregated))?;
        log::debug!("index and matrix artifacts conform to their schemas");

        self.render(&index_value, &matrix_value, &report, &matrix, out_dir)
            .map_err(fail(Stage::Validated))?;
        log::info!("report rendered to '{}'", out_dir.display());

        Ok(AnalysisOutcome {
            report,
            matrix,
            out_dir: out_dir.to_path_buf(),
        })
    }

    /// Fresh -> Extracted: claim a fresh output location and obtain the
    /// skeleton from the extraction collaborator.
    fn extract(&self, out_dir: &Path) -> Result<Skeleton, AnalysisError> {
        if out_dir.exists() {
            return Err(AnalysisError::Precondition {
                path: out_dir.to_path_buf(),
            });
        }
        fs::create_dir_all(out_dir).map_err(|source| AnalysisError::Persistence {
            path: out_dir.to_path_buf(),
            source,
        })?;

        let skeleton = self
            .source
            .skeleton()
            .map_err(|e| AnalysisError::Source { source: e.into() })?;
        skeleton.verify()?;

        let value = to_value(&skeleton, "skeleton")?;
        write_json(&out_dir.join("skeleton.json"), &value)?;
        Ok(skeleton)
    }

    /// Extracted -> MetricsComputed: one job per configured metric, in
    /// parallel, joined by the collect barrier. The first failure wins;
    /// sibling results are abandoned and their partial artifacts stay in
    /// their own namespace for diagnostics.
    fn compute_metrics(
        &self,
        skeleton: &Skeleton,
        out_dir: &Path,
    ) -> Result<Vec<MetricScoreSet>, AnalysisError> {
        self.config
            .metrics
            .enabled
            .par_iter()
            .map(|name| metric::compute(skeleton, name, out_dir))
            .collect()
    }

    /// Validated -> Rendered: structured artifacts first, then the
    /// human-facing pages from the same validated values.
    fn render(
        &self,
        index_value: &Value,
        matrix_value: &Value,
        report: &IndexReport,
        matrix: &Matrix,
        out_dir: &Path,
    ) -> Result<(), AnalysisError> {
        write_json(&out_dir.join("index.json"), index_value)?;
        write_json(&out_dir.join("matrix.json"), matrix_value)?;
        self.renderer
            .render(report, matrix, &self.config.render.params, out_dir)
    }
}

/// Aggregated -> Validated: serialize both artifacts and hold them
/// against their fixed schemas before anything is rendered.
fn validate_artifacts(
    report: &IndexReport,
    matrix: &Matrix,
) -> Result<(Value, Value), AnalysisError> {
    let index_value = to_value(report, "index")?;
    validate::validate_index(&index_value)?;
    let matrix_value = to_value(matrix, "matrix")?;
    validate::validate_matrix(&matrix_value)?;
    Ok((index_value, matrix_value))
}

fn to_value<T: serde::Serialize>(data: &T, artifact: &str) -> Result<Value, AnalysisError> {
    serde_json::to_value(data).map_err(|e| AnalysisError::SchemaViolation {
        artifact: artifact.to_string(),
        detail: e.to_string(),
    })
}

fn write_json(path: &Path, value: &Value) -> Result<(), AnalysisError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| AnalysisError::Persistence {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })?;
    fs::write(path, json + "\n").map_err(|source| AnalysisError::Persistence {
        path: path.to_path_buf(),
        source,
    })
}
