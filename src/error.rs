use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a listing build. Library code returns these; the
/// binary wraps them with anyhow context before printing.
#[derive(Debug, Error)]
pub enum FosError {
    #[error("file {} not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("cannot derive a sample name from {path:?} (listing line {line}): file name shorter than the unitig suffix")]
    MalformedInput { line: usize, path: String },

    #[error("no {0} column found in the multiqc report header")]
    MissingField(&'static str),

    #[error("malformed multiqc record on line {line}: {reason}")]
    MalformedReport { line: usize, reason: String },

    #[error("no multiqc info found for sample '{0}'")]
    NoMatchingRecord(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
