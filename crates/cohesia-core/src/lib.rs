pub mod config;
pub mod error;
pub mod index;
pub mod matrix;
pub mod metric;
pub mod pipeline;
pub mod render;
pub mod source;
pub mod types;
pub mod validate;

pub use config::{Config, Thresholds};
pub use error::AnalysisError;
pub use index::{Index, IndexEntry, IndexReport};
pub use matrix::{Matrix, MatrixCell};
pub use pipeline::{AnalysisOutcome, Pipeline, Stage, StageError};
pub use render::Renderer;
pub use source::{JsonSkeletonSource, SkeletonSource};
pub use types::*;
