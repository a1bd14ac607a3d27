use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop an analysis run. No variant is recovered or
/// retried anywhere in the pipeline; the run is deterministic, so a retry
/// is simply running again.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The output location already exists. Raised before any work begins;
    /// a prior run's results are never overwritten.
    #[error("output location '{path}' already exists", path = .path.display())]
    Precondition { path: PathBuf },

    /// The skeleton violates a structural invariant.
    #[error("malformed skeleton: {detail}")]
    StructuralInvariant { detail: String },

    /// The configured metric name is not registered.
    #[error("unknown metric '{metric}'")]
    UnknownMetric { metric: String },

    /// An artifact could not be written. Fail-fast: aggregation assumes a
    /// complete, consistent artifact set.
    #[error("failed to write '{path}'", path = .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An aggregated artifact failed structural validation. Nothing
    /// downstream of the gate is produced.
    #[error("{artifact} artifact failed schema validation: {detail}")]
    SchemaViolation { artifact: String, detail: String },

    /// The skeleton source collaborator failed.
    #[error("skeleton source failed")]
    Source {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
